use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use risk_screener::workflows::screening::{
    score, AnswerSet, AssessmentStore, Choice, Coordinate, CsvAssessmentStore, GatewayError,
    GeocodingGateway, LocationQuery, NearbySearch, PlacesGateway, Provider, ProviderSearch,
    QuestionId, RecordingStatus, RiskTier, ScreeningService, ScreeningSubmission,
};

struct CountingGeocoder {
    calls: AtomicUsize,
}

impl CountingGeocoder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GeocodingGateway for CountingGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinate>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Coordinate {
            latitude: 40.7506,
            longitude: -73.9972,
        }))
    }
}

struct StaticPlaces {
    providers: Vec<Provider>,
    calls: AtomicUsize,
}

#[async_trait]
impl PlacesGateway for StaticPlaces {
    async fn nearby(&self, _search: &NearbySearch) -> Result<Vec<Provider>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.providers.clone())
    }
}

fn all_no_answers() -> AnswerSet {
    QuestionId::ordered()
        .into_iter()
        .fold(AnswerSet::new(), |answers, question| match question {
            QuestionId::BodyMassIndex => answers.with(question, 22.0),
            QuestionId::LateFirstPregnancy | QuestionId::BreastfedSixMonths => {
                answers.with(question, Choice::NotApplicable)
            }
            _ => answers.with(question, Choice::No),
        })
}

fn providers(count: usize) -> Vec<Provider> {
    (1..=count)
        .map(|index| Provider {
            name: Some(format!("Breast Care Center {index}")),
            address: Some(format!("{index} Main St")),
            rating: Some(4.0),
        })
        .collect()
}

fn service(
    places: Vec<Provider>,
    store: CsvAssessmentStore,
) -> (
    ScreeningService<CountingGeocoder, StaticPlaces, CsvAssessmentStore>,
    Arc<CountingGeocoder>,
    Arc<StaticPlaces>,
) {
    let geocoder = Arc::new(CountingGeocoder::new());
    let places = Arc::new(StaticPlaces {
        providers: places,
        calls: AtomicUsize::new(0),
    });
    let service = ScreeningService::new(
        geocoder.clone(),
        places.clone(),
        Arc::new(store),
        ProviderSearch::default(),
    );
    (service, geocoder, places)
}

#[test]
fn all_negative_answers_are_low_risk() {
    assert_eq!(score(&all_no_answers()), (0, RiskTier::Low));
}

#[test]
fn brca_positive_alone_is_moderate_risk() {
    let answers = all_no_answers().with(QuestionId::BrcaPositive, Choice::Yes);
    assert_eq!(score(&answers), (10, RiskTier::Moderate));
}

#[test]
fn brca_with_lasting_breast_changes_is_high_risk() {
    let answers = all_no_answers()
        .with(QuestionId::BrcaPositive, Choice::Yes)
        .with(QuestionId::NewBreastChanges, Choice::Yes)
        .with(QuestionId::SymptomsOverWeek, Choice::Yes);
    assert_eq!(score(&answers), (20, RiskTier::High));
}

#[test]
fn not_breastfeeding_adds_two_points() {
    let answers = all_no_answers().with(QuestionId::BreastfedSixMonths, Choice::No);
    assert_eq!(score(&answers), (2, RiskTier::Low));
}

#[tokio::test]
async fn empty_postal_code_makes_no_geocoding_call() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = CsvAssessmentStore::open(dir.path().join("assessments.csv")).expect("store");
    let (service, geocoder, places) = service(providers(5), store);

    let outcome = service
        .assess(ScreeningSubmission {
            answers: all_no_answers(),
            postal_code: LocationQuery::new(""),
        })
        .await;

    assert!(outcome.report.providers.is_empty());
    assert_eq!(outcome.report.providers_found, 0);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(places.calls.load(Ordering::SeqCst), 0);
    assert_eq!(outcome.recording.wait().await, RecordingStatus::Skipped);
}

#[tokio::test]
async fn finder_returns_all_five_and_report_shows_three() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_path = dir.path().join("assessments.csv");
    let store = CsvAssessmentStore::open(&log_path).expect("store");
    let (service, geocoder, _) = service(providers(5), store);

    let lookup = service
        .finder()
        .lookup(&LocationQuery::new("10001"))
        .await;
    assert_eq!(lookup.providers(), providers(5).as_slice());

    let outcome = service
        .assess(ScreeningSubmission {
            answers: all_no_answers().with(QuestionId::DenseBreasts, Choice::Yes),
            postal_code: LocationQuery::new("10001"),
        })
        .await;

    assert_eq!(outcome.report.providers_found, 5);
    let names: Vec<&str> = outcome
        .report
        .providers
        .iter()
        .map(|card| card.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Breast Care Center 1",
            "Breast Care Center 2",
            "Breast Care Center 3"
        ]
    );
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);

    assert_eq!(outcome.recording.wait().await, RecordingStatus::Recorded);
    let log = std::fs::read_to_string(&log_path).expect("log readable");
    let mut reader = csv::Reader::from_reader(log.as_bytes());
    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "10001");
    assert_eq!(&rows[0][1], "4");
}

#[test]
fn csv_store_reports_unwritable_paths() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = CsvAssessmentStore::open(dir.path().join("assessments.csv")).expect("store");
    std::fs::remove_dir_all(dir.path()).expect("remove dir");

    let record = risk_screener::workflows::screening::AssessmentRecord::new("10001", 4);
    assert!(store.append(&record).is_err());
}
