use serde::Serialize;

use super::super::questionnaire::{AnswerSet, AnswerValue, Choice, QuestionId};

/// Bumped whenever a rule is added, removed, or re-weighted.
pub const RULE_TABLE_VERSION: u32 = 1;

/// Condition under which a rule contributes its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Trigger {
    Equals(Choice),
    GreaterThan(f64),
}

impl Trigger {
    fn matches(self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Trigger::Equals(expected), AnswerValue::Choice(actual)) => expected == *actual,
            (Trigger::GreaterThan(threshold), AnswerValue::Numeric(actual)) => *actual > threshold,
            _ => false,
        }
    }

    pub fn describe(self) -> String {
        match self {
            Trigger::Equals(choice) => format!("answered \"{}\"", choice.label()),
            Trigger::GreaterThan(threshold) => format!("value above {threshold}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringRule {
    pub question: QuestionId,
    pub trigger: Trigger,
    pub weight: u32,
}

impl ScoringRule {
    const fn yes(question: QuestionId, weight: u32) -> Self {
        Self {
            question,
            trigger: Trigger::Equals(Choice::Yes),
            weight,
        }
    }

    /// Out-of-domain answers never trigger, whatever the predicate says.
    pub fn is_triggered(&self, answers: &AnswerSet) -> bool {
        answers
            .get(self.question)
            .filter(|value| self.question.domain().accepts(value))
            .map(|value| self.trigger.matches(value))
            .unwrap_or(false)
    }
}

// Breastfeeding triggers on "No": the missing protective factor carries the weight.
pub static RULE_TABLE: [ScoringRule; 18] = [
    ScoringRule::yes(QuestionId::BrcaPositive, 10),
    ScoringRule::yes(QuestionId::FirstDegreeRelative, 6),
    ScoringRule::yes(QuestionId::AshkenaziAncestry, 3),
    ScoringRule::yes(QuestionId::OvarianCancerFamilyHistory, 3),
    ScoringRule::yes(QuestionId::MaleRelativeBreastCancer, 4),
    ScoringRule::yes(QuestionId::EarlyFirstPeriod, 3),
    ScoringRule::yes(QuestionId::LateFirstPregnancy, 2),
    ScoringRule {
        question: QuestionId::BreastfedSixMonths,
        trigger: Trigger::Equals(Choice::No),
        weight: 2,
    },
    ScoringRule::yes(QuestionId::LongTermHrt, 3),
    ScoringRule {
        question: QuestionId::BodyMassIndex,
        trigger: Trigger::GreaterThan(30.0),
        weight: 2,
    },
    ScoringRule::yes(QuestionId::DailyAlcohol, 2),
    ScoringRule::yes(QuestionId::LowPhysicalActivity, 2),
    ScoringRule::yes(QuestionId::DenseBreasts, 4),
    ScoringRule::yes(QuestionId::PriorBiopsy, 3),
    ScoringRule::yes(QuestionId::NewBreastChanges, 8),
    ScoringRule::yes(QuestionId::SymptomsOverWeek, 2),
    ScoringRule::yes(QuestionId::DelayedCare, 2),
    ScoringRule::yes(QuestionId::AfricanAmerican, 2),
];

pub(crate) fn triggered<'a>(
    rules: &'a [ScoringRule],
    answers: &'a AnswerSet,
) -> impl Iterator<Item = &'a ScoringRule> + 'a {
    rules.iter().filter(move |rule| rule.is_triggered(answers))
}
