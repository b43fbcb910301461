use serde::Serialize;

use super::location::{EmptyReason, LocationQuery, Provider, ProviderLookup};
use super::questionnaire::{AnswerDomain, QuestionId};
use super::scoring::{RiskAssessment, RiskTier, ScoreComponent, ScoringRule, Trigger};

/// Provider cards shown to the respondent; the lookup itself returns everything.
pub const DISPLAY_PROVIDER_LIMIT: usize = 3;
pub const GAUGE_AXIS_MAX: u32 = 50;
pub const DISCLAIMER: &str =
    "Disclaimer: This tool is educational and does not replace medical advice.";
pub const NO_PROVIDERS_MESSAGE: &str = "No local providers found.";

/// Everything the presentation layer needs to render one result screen.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub risk_score: u32,
    pub tier: RiskTier,
    pub tier_label: &'static str,
    pub headline: &'static str,
    pub next_step: &'static str,
    pub rule_table_version: u32,
    pub components: Vec<ScoreComponent>,
    pub gauge: GaugeView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_query: Option<String>,
    pub providers: Vec<ProviderCard>,
    pub providers_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers_empty_reason: Option<EmptyReason>,
    pub disclaimer: &'static str,
}

impl AssessmentReport {
    pub fn build(
        assessment: &RiskAssessment,
        query: &LocationQuery,
        lookup: &ProviderLookup,
    ) -> Self {
        let tier = assessment.tier;
        let providers = lookup.providers();

        Self {
            risk_score: assessment.risk_score,
            tier,
            tier_label: tier.label(),
            headline: tier.headline(),
            next_step: tier.next_step(),
            rule_table_version: assessment.rule_table_version,
            components: assessment.components.clone(),
            gauge: GaugeView::for_score(assessment.risk_score),
            location_query: query.normalized().map(str::to_string),
            providers: providers
                .iter()
                .take(DISPLAY_PROVIDER_LIMIT)
                .map(ProviderCard::from)
                .collect(),
            providers_found: providers.len(),
            providers_empty_reason: lookup.empty_reason(),
            disclaimer: DISCLAIMER,
        }
    }

    /// Message shown in place of provider cards, if any.
    pub fn provider_notice(&self) -> Option<&'static str> {
        if self.providers.is_empty() {
            Some(NO_PROVIDERS_MESSAGE)
        } else {
            None
        }
    }
}

/// Display-ready provider with the original fallbacks for missing fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderCard {
    pub name: String,
    pub address: String,
    pub rating: String,
}

impl From<&Provider> for ProviderCard {
    fn from(provider: &Provider) -> Self {
        Self {
            name: provider
                .name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            address: provider
                .address
                .clone()
                .unwrap_or_else(|| "Address not available".to_string()),
            rating: provider
                .rating
                .map(|rating| rating.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeView {
    pub value: u32,
    pub axis_max: u32,
    pub bands: Vec<GaugeBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeBand {
    pub tier: RiskTier,
    pub from: u32,
    pub to: u32,
    pub color: &'static str,
}

impl GaugeView {
    /// The axis grows past its usual maximum rather than clipping the needle.
    pub fn for_score(score: u32) -> Self {
        let axis_max = GAUGE_AXIS_MAX.max(score);
        let bands = RiskTier::ordered()
            .into_iter()
            .map(|tier| {
                let (from, to) = tier.bounds();
                GaugeBand {
                    tier,
                    from,
                    to: to.unwrap_or(axis_max),
                    color: tier.gauge_color(),
                }
            })
            .collect();

        Self {
            value: score,
            axis_max,
            bands,
        }
    }
}

/// Question metadata for clients that render the form themselves.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: &'static str,
    pub choices: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl From<QuestionId> for QuestionView {
    fn from(id: QuestionId) -> Self {
        let domain = id.domain();
        let (min, max) = match domain {
            AnswerDomain::Numeric { min, max } => (Some(min), Some(max)),
            _ => (None, None),
        };
        Self {
            id,
            prompt: id.prompt(),
            choices: domain.choices().iter().map(|choice| choice.label()).collect(),
            min,
            max,
        }
    }
}

pub fn questionnaire_view() -> Vec<QuestionView> {
    QuestionId::ordered().into_iter().map(QuestionView::from).collect()
}

/// Audit listing of the rule table.
#[derive(Debug, Clone, Serialize)]
pub struct RuleView {
    pub question: QuestionId,
    pub condition: String,
    pub points: u32,
}

impl From<&ScoringRule> for RuleView {
    fn from(rule: &ScoringRule) -> Self {
        let condition = match rule.trigger {
            Trigger::Equals(choice) => format!("{} = {}", rule.question.key(), choice.label()),
            Trigger::GreaterThan(threshold) => format!("{} > {}", rule.question.key(), threshold),
        };
        Self {
            question: rule.question,
            condition,
            points: rule.weight,
        }
    }
}
