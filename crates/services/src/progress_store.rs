use std::sync::Arc;

use course_core::model::{ProgressRecord, ProgressState};
use storage::repository::KeyValueStore;

/// Store key the progress blob lives under.
pub const PROGRESS_KEY: &str = "courseProgress";

/// Reads and writes the persisted progress blob.
///
/// Neither direction fails for the caller: unreadable data loads as a fresh
/// state and write failures are logged.
#[derive(Clone)]
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: PROGRESS_KEY.to_string(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted state, falling back to an empty state when the blob
    /// is missing, unreadable or malformed.
    pub async fn load(&self) -> ProgressState {
        let raw = match self.kv.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("no stored progress under {:?}, starting fresh", self.key);
                return ProgressState::new();
            }
            Err(err) => {
                log::warn!("failed to read progress under {:?}: {err}", self.key);
                return ProgressState::new();
            }
        };

        let record: ProgressRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                log::warn!(
                    "stored progress under {:?} is malformed, starting fresh: {err}",
                    self.key
                );
                return ProgressState::new();
            }
        };

        let (state, rejected) = ProgressState::from_record(record);
        if !rejected.is_empty() {
            log::warn!("ignoring unrecognised progress keys: {rejected:?}");
        }
        state
    }

    /// Persist `state` with the bootstrap keys filled in.
    ///
    /// Returns `false` if the write failed; the failure is logged.
    pub async fn save(&self, state: &ProgressState) -> bool {
        let mut state = state.clone();
        state.ensure_bootstrap();

        let json = match serde_json::to_string(&state.to_record()) {
            Ok(json) => json,
            Err(err) => {
                log::error!("failed to encode progress: {err}");
                return false;
            }
        };

        match self.kv.put(&self.key, &json).await {
            Ok(()) => true,
            Err(err) => {
                log::error!("failed to save progress under {:?}: {err}", self.key);
                false
            }
        }
    }
}
