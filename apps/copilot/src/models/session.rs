use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::analysis::GapAnalysisResult;
use crate::models::resume::{ResumeData, ResumeFeedback};

/// How the target for a gap analysis is described.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMethod {
    JobDescription,
    #[default]
    MarketData,
}

/// How a job description is supplied in `JobDescription` mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobDescInput {
    #[default]
    Text,
    Pdf,
}

/// The analyzer wizard state that survives restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub analysis_method: AnalysisMethod,
    pub job_desc_input_method: JobDescInput,
    pub job_description: String,
    pub target_role: String,
    pub resume_data: Option<ResumeData>,
    pub resume_feedback: Option<ResumeFeedback>,
    pub gap_analysis: Option<GapAnalysisResult>,
}

impl Session {
    /// Restores a session field by field from a stored JSON object.
    ///
    /// Fields that are missing, null, or of the wrong shape keep their
    /// defaults; the remaining fields are still restored.
    pub fn restore(value: &Value) -> Self {
        let mut session = Session::default();
        let Some(obj) = value.as_object() else {
            warn!("Stored session is not a JSON object; using defaults");
            return session;
        };

        if let Some(v) = field(obj, "analysisMethod") {
            session.analysis_method = v;
        }
        if let Some(v) = field(obj, "jobDescInputMethod") {
            session.job_desc_input_method = v;
        }
        if let Some(v) = field(obj, "jobDescription") {
            session.job_description = v;
        }
        if let Some(v) = field(obj, "targetRole") {
            session.target_role = v;
        }
        session.resume_data = field(obj, "resumeData");
        session.resume_feedback = field(obj, "resumeFeedback");
        session.gap_analysis = field(obj, "gapAnalysis");
        session
    }

    pub fn skills(&self) -> &[String] {
        self.resume_data
            .as_ref()
            .map(|r| r.skills.as_slice())
            .unwrap_or_default()
    }
}

fn field<T: DeserializeOwned>(obj: &serde_json::Map<String, Value>, key: &str) -> Option<T> {
    let raw = obj.get(key).filter(|v| !v.is_null())?;
    match serde_json::from_value(raw.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Dropping stored session field '{key}': {e}");
            None
        }
    }
}
