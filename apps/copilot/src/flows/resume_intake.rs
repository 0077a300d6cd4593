//! Resume intake: pick a file, upload it for parsing, then optionally fetch
//! quality feedback on the parsed resume.

use tracing::{debug, info, warn};

use crate::api_client::UploadFile;
use crate::errors::AppError;
use crate::flows::analyzer::GapAnalyzer;
use crate::models::resume::{ResumeData, ResumeFeedbackRequest};
use crate::models::session::Session;

pub const RESUME_EXTENSIONS: [&str; 2] = [".pdf", ".docx"];
const UPLOAD_FALLBACK: &str = "Failed to parse resume";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    FileSelected,
    Uploading,
    Parsed,
    FeedbackPending,
    FeedbackReady,
    FeedbackSkipped,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    FileAccepted,
    UploadStarted,
    UploadSucceeded,
    UploadFailed(String),
    FeedbackStarted,
    FeedbackNotNeeded,
    FeedbackSucceeded,
    FeedbackFailed,
    Reset,
}

impl IntakeState {
    /// State for a session read back from storage.
    pub fn restored(session: &Session) -> Self {
        match (&session.resume_data, &session.resume_feedback) {
            (Some(_), Some(_)) => IntakeState::FeedbackReady,
            (Some(_), None) => IntakeState::FeedbackSkipped,
            (None, _) => IntakeState::Idle,
        }
    }

    /// Pure transition function. Events that make no sense in the current
    /// state leave it unchanged.
    pub fn on(self, event: IntakeEvent) -> Self {
        use IntakeEvent as E;
        use IntakeState as S;

        match (self, event) {
            (_, E::Reset) => S::Idle,
            (S::Uploading, E::UploadSucceeded) => S::Parsed,
            (S::Uploading, E::UploadFailed(msg)) => S::Error(msg),
            (S::Uploading, _) => S::Uploading,
            (_, E::FileAccepted) => S::FileSelected,
            (_, E::UploadStarted) => S::Uploading,
            (S::Parsed, E::FeedbackStarted) => S::FeedbackPending,
            (S::Parsed, E::FeedbackNotNeeded) => S::FeedbackSkipped,
            (S::FeedbackPending, E::FeedbackSucceeded) => S::FeedbackReady,
            (S::FeedbackPending, E::FeedbackFailed) => S::FeedbackSkipped,
            (state, event) => {
                debug!("Ignoring intake event {event:?} in state {state:?}");
                state
            }
        }
    }

    /// True once a parse result exists, whatever happened to feedback.
    pub fn is_parsed(&self) -> bool {
        matches!(
            self,
            IntakeState::Parsed
                | IntakeState::FeedbackPending
                | IntakeState::FeedbackReady
                | IntakeState::FeedbackSkipped
        )
    }
}

impl GapAnalyzer {
    /// Accepts `.pdf` / `.docx` resumes. Anything else is rejected and the
    /// previously selected file, if any, stays selected.
    pub fn select_resume(&mut self, file: UploadFile) -> Result<(), AppError> {
        if !file.has_extension(&RESUME_EXTENSIONS) {
            let err = AppError::validation("Please upload a PDF or DOCX file");
            return Err(self.fail(err, UPLOAD_FALLBACK));
        }
        debug!("Resume selected: {}", file.file_name);
        self.resume_file = Some(file);
        self.error = None;
        self.transition(IntakeEvent::FileAccepted);
        Ok(())
    }

    pub fn can_upload(&self) -> bool {
        self.resume_file.is_some() && !self.loading
    }

    /// Uploads the selected resume. On success the parse result replaces the
    /// stored one; feedback is fetched afterwards when the parse has both
    /// skills and raw text, and a feedback failure does not fail the upload.
    pub async fn upload_resume(&mut self) -> Result<&ResumeData, AppError> {
        let Some(file) = self.resume_file.clone() else {
            return Err(self.fail(
                AppError::validation("Please select a resume file"),
                UPLOAD_FALLBACK,
            ));
        };

        self.loading = true;
        self.error = None;
        self.transition(IntakeEvent::UploadStarted);
        info!("Uploading resume {}", file.file_name);

        let parsed = match self.api.upload_resume(&file).await {
            Ok(parsed) => parsed,
            Err(e) => {
                let err = self.fail(e.into(), UPLOAD_FALLBACK);
                let message = self.error.clone().unwrap_or_default();
                self.transition(IntakeEvent::UploadFailed(message));
                self.loading = false;
                return Err(err);
            }
        };

        info!("Resume parsed: {} skills", parsed.skills.len());
        self.session.resume_data = Some(parsed.clone());
        self.session.resume_feedback = None;
        self.persist();
        self.hand_off_resume(&parsed);
        self.transition(IntakeEvent::UploadSucceeded);

        if parsed.qualifies_for_feedback() {
            self.transition(IntakeEvent::FeedbackStarted);
            self.fetch_feedback(&parsed).await;
        } else {
            debug!("Skipping resume feedback: parse has no skills or no text");
            self.transition(IntakeEvent::FeedbackNotNeeded);
        }

        self.loading = false;
        self.session
            .resume_data
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("parsed resume vanished")))
    }

    async fn fetch_feedback(&mut self, parsed: &ResumeData) {
        let target_role = self.session.target_role.trim();
        let req = ResumeFeedbackRequest {
            resume_text: parsed.resume_text().unwrap_or_default().to_string(),
            skills: parsed.skills.clone(),
            target_role: (!target_role.is_empty()).then(|| target_role.to_string()),
        };

        match self.api.resume_feedback(&req).await {
            Ok(feedback) => {
                info!("Resume feedback score: {}", feedback.overall_score);
                self.session.resume_feedback = Some(feedback);
                self.persist();
                self.transition(IntakeEvent::FeedbackSucceeded);
            }
            Err(e) => {
                warn!("Resume feedback analysis skipped: {e}");
                self.transition(IntakeEvent::FeedbackFailed);
            }
        }
    }

    fn hand_off_resume(&self, parsed: &ResumeData) {
        if let Err(e) = self.handoff.set_resume_data(parsed) {
            warn!("Failed to store resume handoff: {e}");
        }
        if let Some(name) = parsed.name.as_deref().filter(|n| !n.trim().is_empty()) {
            if let Err(e) = self.handoff.set_user_name(name) {
                warn!("Failed to store user name: {e}");
            }
        }
    }

    fn transition(&mut self, event: IntakeEvent) {
        let current = std::mem::replace(&mut self.intake, IntakeState::Idle);
        self.intake = current.on(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::fake::{Call, FakeCareerApi};
    use crate::api_client::{RESUME_FEEDBACK, UPLOAD_RESUME};
    use crate::flows::analyzer::tests::Harness;
    use crate::storage::SessionStore;
    use serde_json::json;

    fn pdf(name: &str) -> UploadFile {
        UploadFile::new(name, b"%PDF".to_vec())
    }

    #[test]
    fn test_transition_table() {
        let s = IntakeState::Idle
            .on(IntakeEvent::FileAccepted)
            .on(IntakeEvent::UploadStarted);
        assert_eq!(s, IntakeState::Uploading);
        assert_eq!(s.clone().on(IntakeEvent::FileAccepted), IntakeState::Uploading);

        let parsed = s.on(IntakeEvent::UploadSucceeded);
        assert!(parsed.is_parsed());
        assert_eq!(
            parsed.clone().on(IntakeEvent::FeedbackNotNeeded),
            IntakeState::FeedbackSkipped
        );
        assert_eq!(
            parsed
                .on(IntakeEvent::FeedbackStarted)
                .on(IntakeEvent::FeedbackFailed),
            IntakeState::FeedbackSkipped
        );
        assert_eq!(
            IntakeState::Uploading.on(IntakeEvent::UploadFailed("nope".into())),
            IntakeState::Error("nope".into())
        );
        assert_eq!(
            IntakeState::Idle.on(IntakeEvent::FeedbackSucceeded),
            IntakeState::Idle
        );
    }

    #[test]
    fn test_rejects_unsupported_extension_and_keeps_prior_file() {
        let harness = Harness::new(FakeCareerApi::new());
        let mut analyzer = harness.analyzer();

        analyzer.select_resume(pdf("cv.pdf")).unwrap();
        let err = analyzer
            .select_resume(UploadFile::new("cv.txt", b"plain".to_vec()))
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(analyzer.error(), Some("Please upload a PDF or DOCX file"));
        assert_eq!(analyzer.resume_file().unwrap().file_name, "cv.pdf");
        assert_eq!(analyzer.intake(), &IntakeState::FileSelected);
    }

    #[tokio::test]
    async fn test_upload_without_file_is_validation_error() {
        let harness = Harness::new(FakeCareerApi::new());
        let mut analyzer = harness.analyzer();
        let err = analyzer.upload_resume().await.unwrap_err();
        assert!(err.is_validation());
        assert!(harness.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_skills_skip_feedback() {
        let harness = Harness::new(
            FakeCareerApi::new().json(UPLOAD_RESUME, json!({"skills": [], "raw_text": "hi"})),
        );
        let mut analyzer = harness.analyzer();
        analyzer.select_resume(pdf("cv.pdf")).unwrap();

        analyzer.upload_resume().await.unwrap();

        assert_eq!(harness.api.endpoints(), vec![UPLOAD_RESUME]);
        assert_eq!(analyzer.intake(), &IntakeState::FeedbackSkipped);
    }

    #[tokio::test]
    async fn test_feedback_follows_successful_parse() {
        let harness = Harness::new(
            FakeCareerApi::new()
                .json(
                    UPLOAD_RESUME,
                    json!({"skills": ["Python"], "raw_text": "Python dev", "name": "Asha"}),
                )
                .json(RESUME_FEEDBACK, json!({"overall_score": 81})),
        );
        let mut analyzer = harness.analyzer();
        analyzer.set_target_role("Data Scientist");
        analyzer.select_resume(pdf("cv.pdf")).unwrap();

        analyzer.upload_resume().await.unwrap();

        let calls = harness.api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            Call::ResumeFeedback(ResumeFeedbackRequest {
                resume_text: "Python dev".into(),
                skills: vec!["Python".into()],
                target_role: Some("Data Scientist".into()),
            })
        );
        assert_eq!(analyzer.intake(), &IntakeState::FeedbackReady);
        let stored = harness.store().load();
        assert_eq!(stored.resume_feedback.unwrap().overall_score, 81.0);
        assert_eq!(analyzer.handoff.user_name().as_deref(), Some("Asha"));
        assert!(!analyzer.is_loading());
    }

    #[tokio::test]
    async fn test_feedback_failure_is_absorbed() {
        let harness = Harness::new(
            FakeCareerApi::new()
                .json(UPLOAD_RESUME, json!({"skills": ["SQL"], "raw_text": "SQL"}))
                .fail(RESUME_FEEDBACK, 503, None),
        );
        let mut analyzer = harness.analyzer();
        analyzer.select_resume(pdf("cv.docx")).unwrap();

        let parsed = analyzer.upload_resume().await.unwrap();
        assert_eq!(parsed.skills, vec!["SQL"]);

        assert!(analyzer.error().is_none());
        assert_eq!(analyzer.intake(), &IntakeState::FeedbackSkipped);
        assert!(analyzer.session().resume_feedback.is_none());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous_resume() {
        let harness = Harness::new(
            FakeCareerApi::new()
                .json(UPLOAD_RESUME, json!({"skills": ["Go"]}))
                .fail(UPLOAD_RESUME, 422, Some("Could not extract text")),
        );
        let mut analyzer = harness.analyzer();
        analyzer.select_resume(pdf("first.pdf")).unwrap();
        analyzer.upload_resume().await.unwrap();

        analyzer.select_resume(pdf("second.pdf")).unwrap();
        let err = analyzer.upload_resume().await.unwrap_err();

        assert!(!err.is_validation());
        assert_eq!(analyzer.error(), Some("Could not extract text"));
        assert_eq!(
            analyzer.intake(),
            &IntakeState::Error("Could not extract text".into())
        );
        assert_eq!(analyzer.session().skills(), ["Go".to_string()]);
        assert_eq!(analyzer.resume_file().unwrap().file_name, "second.pdf");
        assert!(!analyzer.is_loading());
    }

    #[tokio::test]
    async fn test_upload_needs_a_file_and_an_idle_flow() {
        let harness = Harness::new(
            FakeCareerApi::new().json(UPLOAD_RESUME, json!({"skills": ["Rust"]})),
        );
        let mut analyzer = harness.analyzer();
        assert!(!analyzer.can_upload());

        analyzer.select_resume(pdf("cv.pdf")).unwrap();
        assert!(analyzer.can_upload());

        analyzer.loading = true;
        assert!(!analyzer.can_upload());
        analyzer.loading = false;

        analyzer.upload_resume().await.unwrap();
        assert!(analyzer.can_upload());
    }
}
