use metrics_exporter_prometheus::PrometheusHandle;
use risk_screener::config::AppConfig;
use risk_screener::error::AppError;
use risk_screener::workflows::screening::{
    AssessmentRecord, AssessmentStore, CsvAssessmentStore, GoogleMapsClient, ProviderSearch,
    RecorderError, ScreeningService,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub(crate) type AppScreeningService =
    ScreeningService<GoogleMapsClient, GoogleMapsClient, ConfiguredStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryAssessmentStore {
    records: Mutex<Vec<AssessmentRecord>>,
}

#[cfg(test)]
impl InMemoryAssessmentStore {
    pub(crate) fn records(&self) -> Vec<AssessmentRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

impl AssessmentStore for InMemoryAssessmentStore {
    fn append(&self, record: &AssessmentRecord) -> Result<(), RecorderError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RecorderError::Unavailable("store mutex poisoned".to_string()))?;
        guard.push(record.clone());
        Ok(())
    }
}

/// Store selected by `ASSESSMENT_LOG_PATH`.
pub(crate) enum ConfiguredStore {
    Csv(CsvAssessmentStore),
    Memory(InMemoryAssessmentStore),
}

impl AssessmentStore for ConfiguredStore {
    fn append(&self, record: &AssessmentRecord) -> Result<(), RecorderError> {
        match self {
            ConfiguredStore::Csv(store) => store.append(record),
            ConfiguredStore::Memory(store) => store.append(record),
        }
    }
}

pub(crate) fn configured_store(config: &AppConfig) -> Result<ConfiguredStore, AppError> {
    match &config.storage.assessment_log {
        Some(path) => {
            let store = CsvAssessmentStore::open(path)?;
            info!(path = %store.path().display(), "recording assessments to CSV log");
            Ok(ConfiguredStore::Csv(store))
        }
        None => {
            info!("ASSESSMENT_LOG_PATH not set; assessments kept in memory only");
            Ok(ConfiguredStore::Memory(InMemoryAssessmentStore::default()))
        }
    }
}

pub(crate) fn build_screening_service(
    config: &AppConfig,
) -> Result<Arc<AppScreeningService>, AppError> {
    if config.maps.api_key.is_none() {
        warn!("GOOGLE_API_KEY not set; provider lookups will return no results");
    }

    let maps = Arc::new(GoogleMapsClient::new(config.maps.clone())?);
    let store = Arc::new(configured_store(config)?);
    let search = ProviderSearch::from_config(&config.maps);

    Ok(Arc::new(ScreeningService::new(
        maps.clone(),
        maps,
        store,
        search,
    )))
}
