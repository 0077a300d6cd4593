//! Gap analysis: validate the wizard inputs, choose exactly one request
//! shape, dispatch it, and replace the stored result on success.

use serde_json::Value;
use tracing::{info, warn};

use crate::api_client::{PdfGapAnalysisRequest, UploadFile};
use crate::errors::AppError;
use crate::flows::analyzer::GapAnalyzer;
use crate::models::analysis::{GapAnalysisRequest, GapAnalysisResult};
use crate::models::session::{AnalysisMethod, JobDescInput, Session};

pub const DEFAULT_PDF_TARGET_ROLE: &str = "Target Role";
const ANALYSIS_FALLBACK: &str = "Failed to perform gap analysis";

/// The one request a gap analysis run will send.
#[derive(Debug, Clone, PartialEq)]
pub enum GapRequest {
    Json(GapAnalysisRequest),
    Pdf(PdfGapAnalysisRequest),
}

/// Validates the session and picks the request to send.
///
/// Checks run in a fixed order and the first failure is returned:
/// resume skills, then the market-data role, then the pasted description,
/// then the uploaded description file.
pub fn plan_gap_request(
    session: &Session,
    job_desc_file: Option<&UploadFile>,
) -> Result<GapRequest, AppError> {
    let skills = session.skills();
    if skills.is_empty() {
        return Err(AppError::validation("Please upload a resume first"));
    }

    let role = session.target_role.trim();
    match (session.analysis_method, session.job_desc_input_method) {
        (AnalysisMethod::MarketData, _) if role.is_empty() => {
            return Err(AppError::validation("Please provide a target job role"));
        }
        (AnalysisMethod::JobDescription, JobDescInput::Text)
            if session.job_description.trim().is_empty() =>
        {
            return Err(AppError::validation("Please provide a job description"));
        }
        (AnalysisMethod::JobDescription, JobDescInput::Pdf) => {
            let Some(file) = job_desc_file else {
                return Err(AppError::validation("Please upload a job description PDF"));
            };
            return Ok(GapRequest::Pdf(PdfGapAnalysisRequest {
                user_skills: skills.to_vec(),
                target_role: if role.is_empty() {
                    DEFAULT_PDF_TARGET_ROLE.to_string()
                } else {
                    role.to_string()
                },
                job_description_file: file.clone(),
            }));
        }
        _ => {}
    }

    Ok(GapRequest::Json(GapAnalysisRequest {
        user_skills: skills.to_vec(),
        target_role: (!role.is_empty()).then(|| role.to_string()),
        job_description: (session.analysis_method == AnalysisMethod::JobDescription)
            .then(|| session.job_description.clone()),
        use_saved_market_data: false,
    }))
}

impl GapAnalyzer {
    /// Accepts only `.pdf` job descriptions.
    pub fn select_job_description_file(&mut self, file: UploadFile) -> Result<(), AppError> {
        if !file.has_extension(&[".pdf"]) {
            let err = AppError::validation("Please upload a PDF file for job description");
            return Err(self.fail(err, ANALYSIS_FALLBACK));
        }
        self.job_desc_file = Some(file);
        self.error = None;
        Ok(())
    }

    pub fn can_analyze(&self) -> bool {
        !self.session.skills().is_empty() && !self.loading
    }

    /// Runs one gap analysis. Validation failures issue no request.
    pub async fn analyze(&mut self) -> Result<&GapAnalysisResult, AppError> {
        let request = match plan_gap_request(&self.session, self.job_desc_file.as_ref()) {
            Ok(request) => request,
            Err(e) => return Err(self.fail(e, ANALYSIS_FALLBACK)),
        };

        self.loading = true;
        self.error = None;

        let outcome = match &request {
            GapRequest::Pdf(req) => {
                info!(
                    "Running gap analysis from job description file {}",
                    req.job_description_file.file_name
                );
                self.api.gap_analysis_with_pdf(req).await
            }
            GapRequest::Json(req) => {
                info!(
                    "Running gap analysis for {} skills (role: {:?})",
                    req.user_skills.len(),
                    req.target_role
                );
                self.api.gap_analysis(req).await
            }
        };
        self.loading = false;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => return Err(self.fail(e.into(), ANALYSIS_FALLBACK)),
        };

        info!("Gap analysis complete: {}% match", result.match_display());
        self.hand_off_analysis(&result);
        self.session.gap_analysis = Some(result);
        self.persist();

        self.session
            .gap_analysis
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("gap analysis result vanished")))
    }

    /// Roles the backend has market data for.
    pub async fn available_roles(&self) -> Result<Vec<String>, AppError> {
        Ok(self.api.roles().await?)
    }

    pub async fn market_skills(&self, role: &str) -> Result<Value, AppError> {
        Ok(self.api.market_skills(role).await?)
    }

    fn hand_off_analysis(&self, result: &GapAnalysisResult) {
        if let Err(e) = self.handoff.set_gap_analysis(result) {
            warn!("Failed to store gap analysis handoff: {e}");
        }
        let role = self.session.target_role.trim();
        if !role.is_empty() {
            if let Err(e) = self.handoff.set_target_role(role) {
                warn!("Failed to store target role handoff: {e}");
            }
        }
    }
}
