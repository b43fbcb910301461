use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::location::{
    GeocodingGateway, LocationQuery, LocationResolver, PlacesGateway, ProviderFinder,
    ProviderSearch,
};
use super::questionnaire::AnswerSet;
use super::recorder::{record_in_background, AssessmentRecord, AssessmentStore, RecordingTicket};
use super::report::AssessmentReport;
use super::scoring::ScoringEngine;

/// One "Calculate My Risk" submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningSubmission {
    #[serde(default)]
    pub answers: AnswerSet,
    #[serde(default)]
    pub postal_code: LocationQuery,
}

/// Report plus the still-running recording task.
#[derive(Debug)]
pub struct ScreeningOutcome {
    pub report: AssessmentReport,
    pub recording: RecordingTicket,
}

/// Service composing the scoring engine, provider lookup, and assessment store.
pub struct ScreeningService<G, P, S> {
    engine: ScoringEngine,
    finder: ProviderFinder<G, P>,
    store: Arc<S>,
}

impl<G, P, S> ScreeningService<G, P, S>
where
    G: GeocodingGateway + 'static,
    P: PlacesGateway + 'static,
    S: AssessmentStore + 'static,
{
    pub fn new(geocoder: Arc<G>, places: Arc<P>, store: Arc<S>, search: ProviderSearch) -> Self {
        let resolver = LocationResolver::new(geocoder);
        Self {
            engine: ScoringEngine::standard(),
            finder: ProviderFinder::new(resolver, places, search),
            store,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn finder(&self) -> &ProviderFinder<G, P> {
        &self.finder
    }

    /// Scores the answers, dispatches the record, then resolves providers.
    /// Recording runs detached and cannot affect the returned report.
    /// Must be called from within a Tokio runtime.
    pub async fn assess(&self, submission: ScreeningSubmission) -> ScreeningOutcome {
        let ScreeningSubmission {
            answers,
            postal_code,
        } = submission;

        let assessment = self.engine.score(&answers);

        let recording = match postal_code.normalized() {
            Some(query) => record_in_background(
                Arc::clone(&self.store),
                AssessmentRecord::new(query, assessment.risk_score),
            ),
            None => RecordingTicket::skipped(),
        };

        let lookup = self.finder.lookup(&postal_code).await;
        let report = AssessmentReport::build(&assessment, &postal_code, &lookup);

        info!(
            risk_score = report.risk_score,
            tier = report.tier_label,
            answered = answers.len(),
            providers = report.providers_found,
            "assessment completed"
        );

        ScreeningOutcome { report, recording }
    }
}
