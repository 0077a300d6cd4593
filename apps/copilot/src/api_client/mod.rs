//! Career API client: the single point of entry for all backend calls.
//!
//! Flows never build HTTP requests themselves; they talk to `dyn CareerApi`,
//! which `HttpCareerApi` implements over reqwest. Tests swap in a recording fake.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::analysis::{GapAnalysisRequest, GapAnalysisResult};
use crate::models::chat::{ChatbotReply, ChatbotRequest};
use crate::models::job::{JobSearchRequest, JobSearchResponse};
use crate::models::resume::{ResumeData, ResumeFeedback, ResumeFeedbackRequest};
use crate::models::roadmap::{AvailabilityResponse, Roadmap, RoadmapRequest};

#[cfg(test)]
pub mod fake;

pub const UPLOAD_RESUME: &str = "/api/upload-resume";
pub const RESUME_FEEDBACK: &str = "/api/resume-feedback";
pub const GAP_ANALYSIS: &str = "/api/gap-analysis";
pub const GAP_ANALYSIS_WITH_PDF: &str = "/api/gap-analysis-with-pdf";
pub const ROADMAP_AVAILABILITY: &str = "/api/roadmap/check-availability";
pub const GENERATE_ROADMAP: &str = "/api/generate-roadmap";
pub const SEARCH_JOBS: &str = "/api/search-jobs";
pub const CHATBOT_MESSAGE: &str = "/api/chatbot/message";
pub const CHATBOT_CLEAR: &str = "/api/chatbot/clear";
pub const CHATBOT_HISTORY: &str = "/api/chatbot/history";
pub const ROLES: &str = "/api/roles";
pub const MARKET_SKILLS: &str = "/api/market-skills";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(String),
}

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Case-insensitive check against extensions such as `".pdf"`.
    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        let name = self.file_name.to_lowercase();
        extensions.iter().any(|ext| name.ends_with(ext))
    }

    fn part(&self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)?)
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let name = file_name.to_lowercase();
    if name.ends_with(".pdf") {
        "application/pdf"
    } else if name.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else {
        "application/octet-stream"
    }
}

/// Multipart body of `POST /api/gap-analysis-with-pdf`.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfGapAnalysisRequest {
    pub user_skills: Vec<String>,
    pub target_role: String,
    pub job_description_file: UploadFile,
}

impl PdfGapAnalysisRequest {
    /// The skill list travels as a JSON string inside the form.
    pub fn user_skills_field(&self) -> Result<String, ApiError> {
        Ok(serde_json::to_string(&self.user_skills)?)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RolesResponse {
    #[serde(default)]
    roles: Vec<String>,
}

/// One method per backend endpoint.
#[async_trait]
pub trait CareerApi: Send + Sync {
    async fn upload_resume(&self, file: &UploadFile) -> Result<ResumeData, ApiError>;

    async fn resume_feedback(&self, req: &ResumeFeedbackRequest)
        -> Result<ResumeFeedback, ApiError>;

    async fn gap_analysis(&self, req: &GapAnalysisRequest) -> Result<GapAnalysisResult, ApiError>;

    async fn gap_analysis_with_pdf(
        &self,
        req: &PdfGapAnalysisRequest,
    ) -> Result<GapAnalysisResult, ApiError>;

    async fn check_roadmap_availability(&self) -> Result<AvailabilityResponse, ApiError>;

    async fn generate_roadmap(&self, req: &RoadmapRequest) -> Result<Roadmap, ApiError>;

    async fn search_jobs(&self, req: &JobSearchRequest) -> Result<JobSearchResponse, ApiError>;

    async fn chatbot_message(&self, req: &ChatbotRequest) -> Result<ChatbotReply, ApiError>;

    async fn clear_chatbot_history(&self) -> Result<(), ApiError>;

    async fn chatbot_history(&self) -> Result<Value, ApiError>;

    async fn roles(&self) -> Result<Vec<String>, ApiError>;

    async fn market_skills(&self, role: &str) -> Result<Value, ApiError>;
}

/// reqwest-backed `CareerApi`.
#[derive(Clone)]
pub struct HttpCareerApi {
    client: Client,
    base_url: String,
}

impl HttpCareerApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: impl reqwest::IntoUrl) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {url}");
        let response = self.client.post(&url).json(body).send().await?;
        decode(response).await
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("POST {url} (multipart)");
        let response = self.client.post(&url).multipart(form).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl CareerApi for HttpCareerApi {
    async fn upload_resume(&self, file: &UploadFile) -> Result<ResumeData, ApiError> {
        let form = Form::new().part("file", file.part()?);
        self.post_form(UPLOAD_RESUME, form).await
    }

    async fn resume_feedback(
        &self,
        req: &ResumeFeedbackRequest,
    ) -> Result<ResumeFeedback, ApiError> {
        self.post_json(RESUME_FEEDBACK, req).await
    }

    async fn gap_analysis(&self, req: &GapAnalysisRequest) -> Result<GapAnalysisResult, ApiError> {
        self.post_json(GAP_ANALYSIS, req).await
    }

    async fn gap_analysis_with_pdf(
        &self,
        req: &PdfGapAnalysisRequest,
    ) -> Result<GapAnalysisResult, ApiError> {
        let form = Form::new()
            .text("user_skills", req.user_skills_field()?)
            .text("target_role", req.target_role.clone())
            .part("job_description_file", req.job_description_file.part()?);
        self.post_form(GAP_ANALYSIS_WITH_PDF, form).await
    }

    async fn check_roadmap_availability(&self) -> Result<AvailabilityResponse, ApiError> {
        self.get_json(self.url(ROADMAP_AVAILABILITY)).await
    }

    async fn generate_roadmap(&self, req: &RoadmapRequest) -> Result<Roadmap, ApiError> {
        self.post_json(GENERATE_ROADMAP, req).await
    }

    async fn search_jobs(&self, req: &JobSearchRequest) -> Result<JobSearchResponse, ApiError> {
        self.post_json(SEARCH_JOBS, req).await
    }

    async fn chatbot_message(&self, req: &ChatbotRequest) -> Result<ChatbotReply, ApiError> {
        self.post_json(CHATBOT_MESSAGE, req).await
    }

    async fn clear_chatbot_history(&self) -> Result<(), ApiError> {
        let response = self.client.post(self.url(CHATBOT_CLEAR)).send().await?;
        decode::<Value>(response).await.map(|_| ())
    }

    async fn chatbot_history(&self) -> Result<Value, ApiError> {
        self.get_json(self.url(CHATBOT_HISTORY)).await
    }

    async fn roles(&self) -> Result<Vec<String>, ApiError> {
        let body: RolesResponse = self.get_json(self.url(ROLES)).await?;
        Ok(body.roles)
    }

    async fn market_skills(&self, role: &str) -> Result<Value, ApiError> {
        let mut url = Url::parse(&self.url(MARKET_SKILLS)).map_err(|e| ApiError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(self.base_url.clone()))?
            .push(role);
        self.get_json(url).await
    }
}

/// Decodes a 2xx body as `T`, or turns the response into `ApiError::Api`
/// carrying the server's `detail` string when the body has one.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Backend returned {status}: {body}");
        return Err(ApiError::Api {
            status: status.as_u16(),
            detail: extract_detail(&body),
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Pulls a human-readable `detail` out of an error body, if there is one.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
