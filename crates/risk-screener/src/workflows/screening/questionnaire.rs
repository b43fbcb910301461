use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scored questions of the screening questionnaire, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    BrcaPositive,
    FirstDegreeRelative,
    AshkenaziAncestry,
    OvarianCancerFamilyHistory,
    MaleRelativeBreastCancer,
    EarlyFirstPeriod,
    LateFirstPregnancy,
    BreastfedSixMonths,
    LongTermHrt,
    BodyMassIndex,
    DailyAlcohol,
    LowPhysicalActivity,
    DenseBreasts,
    PriorBiopsy,
    NewBreastChanges,
    SymptomsOverWeek,
    DelayedCare,
    AfricanAmerican,
}

impl QuestionId {
    pub const fn ordered() -> [Self; 18] {
        [
            Self::BrcaPositive,
            Self::FirstDegreeRelative,
            Self::AshkenaziAncestry,
            Self::OvarianCancerFamilyHistory,
            Self::MaleRelativeBreastCancer,
            Self::EarlyFirstPeriod,
            Self::LateFirstPregnancy,
            Self::BreastfedSixMonths,
            Self::LongTermHrt,
            Self::BodyMassIndex,
            Self::DailyAlcohol,
            Self::LowPhysicalActivity,
            Self::DenseBreasts,
            Self::PriorBiopsy,
            Self::NewBreastChanges,
            Self::SymptomsOverWeek,
            Self::DelayedCare,
            Self::AfricanAmerican,
        ]
    }

    /// Wire name used in JSON payloads.
    pub const fn key(self) -> &'static str {
        match self {
            Self::BrcaPositive => "brca_positive",
            Self::FirstDegreeRelative => "first_degree_relative",
            Self::AshkenaziAncestry => "ashkenazi_ancestry",
            Self::OvarianCancerFamilyHistory => "ovarian_cancer_family_history",
            Self::MaleRelativeBreastCancer => "male_relative_breast_cancer",
            Self::EarlyFirstPeriod => "early_first_period",
            Self::LateFirstPregnancy => "late_first_pregnancy",
            Self::BreastfedSixMonths => "breastfed_six_months",
            Self::LongTermHrt => "long_term_hrt",
            Self::BodyMassIndex => "body_mass_index",
            Self::DailyAlcohol => "daily_alcohol",
            Self::LowPhysicalActivity => "low_physical_activity",
            Self::DenseBreasts => "dense_breasts",
            Self::PriorBiopsy => "prior_biopsy",
            Self::NewBreastChanges => "new_breast_changes",
            Self::SymptomsOverWeek => "symptoms_over_week",
            Self::DelayedCare => "delayed_care",
            Self::AfricanAmerican => "african_american",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ordered()
            .into_iter()
            .find(|question| question.key().eq_ignore_ascii_case(key))
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            Self::BrcaPositive => "Have you tested positive for BRCA1 or BRCA2?",
            Self::FirstDegreeRelative => "Do you have a first-degree relative with breast cancer?",
            Self::AshkenaziAncestry => "Do you have Ashkenazi Jewish ancestry?",
            Self::OvarianCancerFamilyHistory => "Do you have a family history of ovarian cancer?",
            Self::MaleRelativeBreastCancer => "Do you have a male relative who had breast cancer?",
            Self::EarlyFirstPeriod => "Did you have your first period before age 12?",
            Self::LateFirstPregnancy => {
                "Were you over 30 at the time of your first full-term pregnancy?"
            }
            Self::BreastfedSixMonths => "Have you breastfed for 6+ months total?",
            Self::LongTermHrt => {
                "Have you ever used hormone replacement therapy (estrogen + progestin) for more than 5 years?"
            }
            Self::BodyMassIndex => "What is your Body Mass Index (BMI)?",
            Self::DailyAlcohol => "Do you consume alcohol most days (1+ drinks/day)?",
            Self::LowPhysicalActivity => {
                "Do you engage in less than 90 minutes of physical activity per week?"
            }
            Self::DenseBreasts => "Have you ever been told you have dense breasts?",
            Self::PriorBiopsy => "Have you ever had a breast biopsy?",
            Self::NewBreastChanges => {
                "Have you noticed new redness, swelling, or thickening in one breast?"
            }
            Self::SymptomsOverWeek => "Have these symptoms lasted more than 1 week?",
            Self::DelayedCare => {
                "Have you delayed seeing a provider due to cost, fear, or transportation?"
            }
            Self::AfricanAmerican => "Do you identify as African American?",
        }
    }

    pub const fn domain(self) -> AnswerDomain {
        match self {
            Self::BrcaPositive => AnswerDomain::YesNoUnsure,
            Self::LateFirstPregnancy | Self::BreastfedSixMonths => AnswerDomain::YesNoNotApplicable,
            Self::LongTermHrt => AnswerDomain::YesNoNotSure,
            Self::BodyMassIndex => AnswerDomain::BODY_MASS_INDEX,
            _ => AnswerDomain::YesNo,
        }
    }
}

/// Radio-button style answers offered by the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    #[serde(alias = "yes")]
    Yes,
    #[serde(alias = "no")]
    No,
    #[serde(alias = "unsure")]
    Unsure,
    #[serde(rename = "Not applicable", alias = "not_applicable")]
    NotApplicable,
    #[serde(rename = "Not sure", alias = "not_sure")]
    NotSure,
}

impl Choice {
    pub const fn label(self) -> &'static str {
        match self {
            Choice::Yes => "Yes",
            Choice::No => "No",
            Choice::Unsure => "Unsure",
            Choice::NotApplicable => "Not applicable",
            Choice::NotSure => "Not sure",
        }
    }
}

/// Allowed values for a question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnswerDomain {
    YesNo,
    YesNoUnsure,
    YesNoNotApplicable,
    YesNoNotSure,
    Numeric { min: f64, max: f64 },
}

impl AnswerDomain {
    pub const BODY_MASS_INDEX: Self = Self::Numeric {
        min: 10.0,
        max: 60.0,
    };

    pub const fn choices(self) -> &'static [Choice] {
        match self {
            AnswerDomain::YesNo => &[Choice::Yes, Choice::No],
            AnswerDomain::YesNoUnsure => &[Choice::Yes, Choice::No, Choice::Unsure],
            AnswerDomain::YesNoNotApplicable => &[Choice::Yes, Choice::No, Choice::NotApplicable],
            AnswerDomain::YesNoNotSure => &[Choice::Yes, Choice::No, Choice::NotSure],
            AnswerDomain::Numeric { .. } => &[],
        }
    }

    pub fn accepts(self, value: &AnswerValue) -> bool {
        match (self, value) {
            (AnswerDomain::Numeric { min, max }, AnswerValue::Numeric(number)) => {
                number.is_finite() && *number >= min && *number <= max
            }
            (AnswerDomain::Numeric { .. }, _) => false,
            (domain, AnswerValue::Choice(choice)) => domain.choices().contains(choice),
            (_, _) => false,
        }
    }
}

/// A single answer as submitted. Anything unrecognised is kept but never scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(Choice),
    Numeric(f64),
    Unrecognized(serde_json::Value),
}

impl From<Choice> for AnswerValue {
    fn from(value: Choice) -> Self {
        AnswerValue::Choice(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Numeric(value)
    }
}

/// One respondent's answers. Unanswered questions are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, AnswerValue>",
    into = "BTreeMap<String, AnswerValue>"
)]
pub struct AnswerSet {
    answers: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question: QuestionId, value: impl Into<AnswerValue>) -> Self {
        self.insert(question, value);
        self
    }

    pub fn insert(&mut self, question: QuestionId, value: impl Into<AnswerValue>) {
        self.answers.insert(question, value.into());
    }

    pub fn get(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(&question)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl From<BTreeMap<String, AnswerValue>> for AnswerSet {
    fn from(raw: BTreeMap<String, AnswerValue>) -> Self {
        let answers = raw
            .into_iter()
            .filter_map(|(key, value)| QuestionId::from_key(&key).map(|id| (id, value)))
            .collect();
        Self { answers }
    }
}

impl From<AnswerSet> for BTreeMap<String, AnswerValue> {
    fn from(set: AnswerSet) -> Self {
        set.answers
            .into_iter()
            .map(|(id, value)| (id.key().to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_keys_match_serde_names() {
        for question in QuestionId::ordered() {
            let encoded = serde_json::to_value(question).expect("serializes");
            assert_eq!(encoded, json!(question.key()));
            assert_eq!(QuestionId::from_key(question.key()), Some(question));
        }
    }

    #[test]
    fn answer_set_drops_unknown_questions_and_keeps_odd_values() {
        let payload = json!({
            "brca_positive": "Yes",
            "body_mass_index": 31.5,
            "favourite_colour": "blue",
            "dense_breasts": "Maybe",
            "prior_biopsy": true
        });

        let answers: AnswerSet = serde_json::from_value(payload).expect("tolerant parse");

        assert_eq!(answers.len(), 4);
        assert_eq!(
            answers.get(QuestionId::BrcaPositive),
            Some(&AnswerValue::Choice(Choice::Yes))
        );
        assert_eq!(
            answers.get(QuestionId::BodyMassIndex),
            Some(&AnswerValue::Numeric(31.5))
        );
        assert!(matches!(
            answers.get(QuestionId::DenseBreasts),
            Some(AnswerValue::Unrecognized(_))
        ));
        assert!(matches!(
            answers.get(QuestionId::PriorBiopsy),
            Some(AnswerValue::Unrecognized(_))
        ));
    }

    #[test]
    fn choice_labels_accept_original_and_snake_case_spellings() {
        let original: Choice = serde_json::from_value(json!("Not applicable")).expect("label");
        let snake: Choice = serde_json::from_value(json!("not_applicable")).expect("alias");
        assert_eq!(original, Choice::NotApplicable);
        assert_eq!(snake, Choice::NotApplicable);
        assert_eq!(
            serde_json::to_value(Choice::NotSure).expect("serializes"),
            json!("Not sure")
        );
    }

    #[test]
    fn domains_reject_values_they_do_not_offer() {
        let unsure = AnswerValue::Choice(Choice::Unsure);
        assert!(QuestionId::BrcaPositive.domain().accepts(&unsure));
        assert!(!QuestionId::DenseBreasts.domain().accepts(&unsure));

        let bmi = QuestionId::BodyMassIndex.domain();
        assert!(bmi.accepts(&AnswerValue::Numeric(10.0)));
        assert!(bmi.accepts(&AnswerValue::Numeric(60.0)));
        assert!(!bmi.accepts(&AnswerValue::Numeric(60.5)));
        assert!(!bmi.accepts(&AnswerValue::Numeric(f64::NAN)));
        assert!(!bmi.accepts(&AnswerValue::Choice(Choice::Yes)));
    }
}
