use std::sync::Arc;

use tracing::{info, warn};

use crate::api_client::{CareerApi, UploadFile};
use crate::errors::AppError;
use crate::flows::resume_intake::IntakeState;
use crate::models::session::{AnalysisMethod, JobDescInput, Session};
use crate::storage::{Handoff, SessionStore};

/// The analyzer wizard: resume intake followed by gap analysis.
///
/// Owns the in-memory `Session` and writes it through the `SessionStore`
/// after every change, so a restarted process resumes where it left off.
/// The intake half lives in `resume_intake.rs`, the analysis half in
/// `gap_analysis.rs`.
pub struct GapAnalyzer {
    pub(crate) api: Arc<dyn CareerApi>,
    store: Arc<dyn SessionStore>,
    pub(crate) handoff: Handoff,
    pub(crate) session: Session,
    pub(crate) resume_file: Option<UploadFile>,
    pub(crate) job_desc_file: Option<UploadFile>,
    pub(crate) intake: IntakeState,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
}

impl GapAnalyzer {
    /// Reads the stored session once; later changes only ever write.
    pub fn new(api: Arc<dyn CareerApi>, store: Arc<dyn SessionStore>, handoff: Handoff) -> Self {
        let session = store.load();
        let intake = IntakeState::restored(&session);
        Self {
            api,
            store,
            handoff,
            session,
            resume_file: None,
            job_desc_file: None,
            intake,
            loading: false,
            error: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn intake(&self) -> &IntakeState {
        &self.intake
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn resume_file(&self) -> Option<&UploadFile> {
        self.resume_file.as_ref()
    }

    pub fn job_desc_file(&self) -> Option<&UploadFile> {
        self.job_desc_file.as_ref()
    }

    pub fn set_analysis_method(&mut self, method: AnalysisMethod) {
        self.session.analysis_method = method;
        self.persist();
    }

    pub fn set_job_desc_input(&mut self, input: JobDescInput) {
        self.session.job_desc_input_method = input;
        self.persist();
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.session.job_description = text.into();
        self.persist();
    }

    pub fn set_target_role(&mut self, role: impl Into<String>) {
        self.session.target_role = role.into();
        self.persist();
    }

    /// Restores every default, forgets both files and deletes the stored blob.
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.resume_file = None;
        self.job_desc_file = None;
        self.intake = IntakeState::Idle;
        self.loading = false;
        self.error = None;

        if let Err(e) = self.store.reset() {
            warn!("Failed to clear saved analyzer state: {e}");
        }
        info!("Analyzer state reset");
    }

    /// Writes the whole session. Storage failures are logged, never surfaced.
    pub(crate) fn persist(&self) {
        if let Err(e) = self.store.save(&self.session) {
            warn!("Failed to persist analyzer state: {e}");
        }
    }

    /// Records a failure as the page banner and hands the error back.
    pub(crate) fn fail(&mut self, err: AppError, fallback: &str) -> AppError {
        self.error = Some(err.banner(fallback));
        err
    }
}
