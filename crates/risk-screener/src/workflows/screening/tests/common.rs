use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::screening::location::{
    Coordinate, GatewayError, GeocodingGateway, NearbySearch, PlacesGateway, Provider,
    ProviderSearch,
};
use crate::workflows::screening::questionnaire::{AnswerSet, Choice, QuestionId};
use crate::workflows::screening::recorder::{AssessmentRecord, AssessmentStore, RecorderError};
use crate::workflows::screening::service::ScreeningService;

/// Every question answered with its non-triggering value, BMI 22.0.
pub(super) fn baseline_answers() -> AnswerSet {
    let mut answers = AnswerSet::new();
    for question in QuestionId::ordered() {
        match question {
            QuestionId::BodyMassIndex => answers.insert(question, 22.0),
            QuestionId::LateFirstPregnancy | QuestionId::BreastfedSixMonths => {
                answers.insert(question, Choice::NotApplicable)
            }
            _ => answers.insert(question, Choice::No),
        }
    }
    answers
}

pub(super) fn des_moines() -> Coordinate {
    Coordinate {
        latitude: 41.5868,
        longitude: -93.625,
    }
}

pub(super) fn provider(name: &str, rating: Option<f32>) -> Provider {
    Provider {
        name: Some(name.to_string()),
        address: Some(format!("{name} Clinic Way, Des Moines")),
        rating,
    }
}

pub(super) fn five_providers() -> Vec<Provider> {
    vec![
        provider("Mercy Breast Center", Some(4.7)),
        provider("Iowa Methodist Imaging", Some(4.2)),
        provider("Broadlawns Women's Health", None),
        provider("UnityPoint Breast Health", Some(3.9)),
        provider("Iowa Clinic Surgery", Some(4.9)),
    ]
}

#[derive(Default)]
pub(super) struct FakeGeocoder {
    result: Option<Coordinate>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub(super) fn resolving(coordinate: Coordinate) -> Self {
        Self {
            result: Some(coordinate),
            ..Self::default()
        }
    }

    pub(super) fn missing() -> Self {
        Self::default()
    }

    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("query mutex poisoned").clone()
    }
}

#[async_trait]
impl GeocodingGateway for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push(address.to_string());
        if self.fail {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        Ok(self.result)
    }
}

#[derive(Default)]
pub(super) struct FakePlaces {
    providers: Vec<Provider>,
    fail: bool,
    calls: AtomicUsize,
    searches: Mutex<Vec<NearbySearch>>,
}

impl FakePlaces {
    pub(super) fn returning(providers: Vec<Provider>) -> Self {
        Self {
            providers,
            ..Self::default()
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn searches(&self) -> Vec<NearbySearch> {
        self.searches.lock().expect("search mutex poisoned").clone()
    }
}

#[async_trait]
impl PlacesGateway for FakePlaces {
    async fn nearby(&self, search: &NearbySearch) -> Result<Vec<Provider>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.searches
            .lock()
            .expect("search mutex poisoned")
            .push(search.clone());
        if self.fail {
            return Err(GatewayError::Status(503));
        }
        Ok(self.providers.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<Vec<AssessmentRecord>>,
}

impl MemoryStore {
    pub(super) fn records(&self) -> Vec<AssessmentRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

impl AssessmentStore for MemoryStore {
    fn append(&self, record: &AssessmentRecord) -> Result<(), RecorderError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(())
    }
}

pub(super) struct OfflineStore;

impl AssessmentStore for OfflineStore {
    fn append(&self, _record: &AssessmentRecord) -> Result<(), RecorderError> {
        Err(RecorderError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service<S: AssessmentStore + 'static>(
    geocoder: FakeGeocoder,
    places: FakePlaces,
    store: S,
) -> (
    ScreeningService<FakeGeocoder, FakePlaces, S>,
    Arc<FakeGeocoder>,
    Arc<FakePlaces>,
    Arc<S>,
) {
    let geocoder = Arc::new(geocoder);
    let places = Arc::new(places);
    let store = Arc::new(store);
    let service = ScreeningService::new(
        geocoder.clone(),
        places.clone(),
        store.clone(),
        ProviderSearch::default(),
    );
    (service, geocoder, places, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
