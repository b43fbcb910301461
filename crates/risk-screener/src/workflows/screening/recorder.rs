use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Append-only row describing one finished assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub location_query: String,
    pub risk_score: u32,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn new(location_query: impl Into<String>, risk_score: u32) -> Self {
        Self::at(location_query, risk_score, Utc::now())
    }

    pub fn at(location_query: impl Into<String>, risk_score: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            location_query: location_query.into(),
            risk_score,
            created_at,
        }
    }
}

/// Durable sink for finished assessments. Never read back by the screening core.
pub trait AssessmentStore: Send + Sync {
    fn append(&self, record: &AssessmentRecord) -> Result<(), RecorderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("unable to open assessment log: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to write assessment row: {0}")]
    Csv(#[from] csv::Error),
    #[error("assessment store unavailable: {0}")]
    Unavailable(String),
}

/// CSV file store; the header row is written once when the file is created.
#[derive(Debug)]
pub struct CsvAssessmentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvAssessmentStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssessmentStore for CsvAssessmentStore {
    fn append(&self, record: &AssessmentRecord) -> Result<(), RecorderError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RecorderError::Unavailable("assessment log lock poisoned".to_string()))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Outcome of a background recording attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingStatus {
    Recorded,
    Skipped,
    Failed(String),
}

/// Handle on a detached recording task. Dropping it does not cancel the write.
#[derive(Debug)]
pub struct RecordingTicket {
    handle: Option<JoinHandle<RecordingStatus>>,
}

impl RecordingTicket {
    pub fn skipped() -> Self {
        Self { handle: None }
    }

    pub async fn wait(self) -> RecordingStatus {
        match self.handle {
            Some(handle) => handle
                .await
                .unwrap_or_else(|err| RecordingStatus::Failed(err.to_string())),
            None => RecordingStatus::Skipped,
        }
    }
}

/// Hands the record to the store on the blocking pool and returns immediately.
/// Must be called from within a Tokio runtime.
pub fn record_in_background<S>(store: Arc<S>, record: AssessmentRecord) -> RecordingTicket
where
    S: AssessmentStore + ?Sized + 'static,
{
    let handle = tokio::task::spawn_blocking(move || match store.append(&record) {
        Ok(()) => {
            debug!(risk_score = record.risk_score, "assessment recorded");
            RecordingStatus::Recorded
        }
        Err(error) => {
            warn!(%error, "failed to record assessment; result already returned");
            RecordingStatus::Failed(error.to_string())
        }
    });

    RecordingTicket {
        handle: Some(handle),
    }
}
