//! Breast cancer risk screening: questionnaire scoring, provider lookup, and
//! best-effort recording of finished assessments.

pub mod location;
pub mod questionnaire;
pub mod recorder;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use location::{
    Coordinate, EmptyReason, GatewayError, GeocodingGateway, GoogleMapsClient, LocationQuery,
    NearbySearch, PlacesGateway, Provider, ProviderFinder, ProviderLookup, ProviderSearch,
};
pub use questionnaire::{AnswerDomain, AnswerSet, AnswerValue, Choice, QuestionId};
pub use recorder::{
    record_in_background, AssessmentRecord, AssessmentStore, CsvAssessmentStore, RecorderError,
    RecordingStatus, RecordingTicket,
};
pub use report::{AssessmentReport, ProviderCard, DISPLAY_PROVIDER_LIMIT};
pub use router::screening_router;
pub use scoring::{score, RiskAssessment, RiskTier, ScoreComponent, ScoringEngine};
pub use service::{ScreeningOutcome, ScreeningService, ScreeningSubmission};
