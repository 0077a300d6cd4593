use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::analysis::GapAnalysisResult;
use crate::models::resume::ResumeData;
use crate::storage::{KeyValueStorage, StorageError};

pub const RESUME_DATA_KEY: &str = "resumeData";
pub const GAP_ANALYSIS_KEY: &str = "gapAnalysis";
pub const TARGET_ROLE_KEY: &str = "targetRole";
pub const USER_NAME_KEY: &str = "userName";
pub const USER_PROGRESS_KEY: &str = "userProgress";
pub const USER_ROLE_KEY: &str = "userRole";

/// Individual keys other flows read for cross-flow handoff.
///
/// Every read is optional: missing or corrupt values come back as `None`.
/// Values are stored as JSON, so a name is stored as `"Asha"` with quotes.
#[derive(Clone)]
pub struct Handoff {
    storage: Arc<dyn KeyValueStorage>,
}

impl Handoff {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn resume_data(&self) -> Option<ResumeData> {
        self.read(RESUME_DATA_KEY)
    }

    pub fn set_resume_data(&self, resume: &ResumeData) -> Result<(), StorageError> {
        self.write(RESUME_DATA_KEY, resume)
    }

    /// Raw gap analysis JSON, forwarded as-is to the chat backend.
    pub fn gap_analysis(&self) -> Option<Value> {
        self.read(GAP_ANALYSIS_KEY)
    }

    pub fn set_gap_analysis(&self, result: &GapAnalysisResult) -> Result<(), StorageError> {
        self.write(GAP_ANALYSIS_KEY, result)
    }

    pub fn target_role(&self) -> Option<String> {
        self.read::<String>(TARGET_ROLE_KEY)
            .filter(|r| !r.trim().is_empty())
    }

    pub fn set_target_role(&self, role: &str) -> Result<(), StorageError> {
        self.write(TARGET_ROLE_KEY, &role)
    }

    pub fn user_name(&self) -> Option<String> {
        self.read(USER_NAME_KEY)
    }

    pub fn set_user_name(&self, name: &str) -> Result<(), StorageError> {
        self.write(USER_NAME_KEY, &name)
    }

    pub fn user_progress(&self) -> Option<Value> {
        self.read(USER_PROGRESS_KEY)
    }

    pub fn is_recruiter(&self) -> bool {
        self.read::<String>(USER_ROLE_KEY).as_deref() == Some("recruiter")
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read '{key}': {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Ignoring corrupt '{key}' entry: {e}");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn handoff() -> (Arc<MemoryStorage>, Handoff) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), Handoff::new(storage))
    }

    #[test]
    fn test_target_role_round_trip_and_blank() {
        let (_, handoff) = handoff();
        assert_eq!(handoff.target_role(), None);
        handoff.set_target_role("Data Scientist").unwrap();
        assert_eq!(handoff.target_role().as_deref(), Some("Data Scientist"));
        handoff.set_target_role("  ").unwrap();
        assert_eq!(handoff.target_role(), None);
    }

    #[test]
    fn test_corrupt_entries_read_as_none() {
        let (storage, handoff) = handoff();
        storage.set(GAP_ANALYSIS_KEY, "{oops").unwrap();
        storage.set(USER_ROLE_KEY, "recruiter").unwrap();
        assert!(handoff.gap_analysis().is_none());
        assert!(!handoff.is_recruiter());

        storage.set(USER_ROLE_KEY, "\"recruiter\"").unwrap();
        assert!(handoff.is_recruiter());
    }

    #[test]
    fn test_gap_analysis_is_forwarded_raw() {
        let (_, handoff) = handoff();
        let result = GapAnalysisResult {
            match_percentage: 40.0,
            ..Default::default()
        };
        handoff.set_gap_analysis(&result).unwrap();
        let raw = handoff.gap_analysis().unwrap();
        assert_eq!(raw["match_percentage"], 40.0);
    }

    #[test]
    fn test_resume_data_round_trip() {
        let (_, handoff) = handoff();
        assert!(handoff.resume_data().is_none());
        let resume = ResumeData {
            skills: vec!["Python".into(), "SQL".into()],
            name: Some("Asha".into()),
            ..Default::default()
        };
        handoff.set_resume_data(&resume).unwrap();
        assert_eq!(handoff.resume_data(), Some(resume));
    }
}
