mod rules;
mod tier;

pub use rules::{ScoringRule, Trigger, RULE_TABLE, RULE_TABLE_VERSION};
pub use tier::{RiskTier, HIGH_FLOOR, MODERATE_FLOOR};

use super::questionnaire::{AnswerSet, QuestionId};
use serde::{Deserialize, Serialize};

/// Pure evaluator of the fixed rule table.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    rules: &'static [ScoringRule],
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringEngine {
    pub fn standard() -> Self {
        Self { rules: &RULE_TABLE }
    }

    pub fn rules(&self) -> &'static [ScoringRule] {
        self.rules
    }

    pub fn score(&self, answers: &AnswerSet) -> RiskAssessment {
        let components: Vec<ScoreComponent> = rules::triggered(self.rules, answers)
            .map(|rule| ScoreComponent {
                question: rule.question,
                points: rule.weight,
                notes: rule.trigger.describe(),
            })
            .collect();

        let risk_score = components
            .iter()
            .fold(0u32, |total, component| total.saturating_add(component.points));

        RiskAssessment {
            risk_score,
            tier: RiskTier::from_score(risk_score),
            rule_table_version: RULE_TABLE_VERSION,
            components,
        }
    }
}

/// Scores an answer set against the standard rule table.
pub fn score(answers: &AnswerSet) -> (u32, RiskTier) {
    let assessment = ScoringEngine::standard().score(answers);
    (assessment.risk_score, assessment.tier)
}

/// Points contributed by one triggered rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question: QuestionId,
    pub points: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub tier: RiskTier,
    pub rule_table_version: u32,
    pub components: Vec<ScoreComponent>,
}
