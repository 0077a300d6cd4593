//! Recording `CareerApi` for flow tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::*;

/// A request as the fake received it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UploadResume { file_name: String },
    ResumeFeedback(ResumeFeedbackRequest),
    GapAnalysis(GapAnalysisRequest),
    GapAnalysisWithPdf {
        user_skills: String,
        target_role: String,
        file_name: String,
    },
    CheckAvailability,
    GenerateRoadmap(RoadmapRequest),
    SearchJobs(JobSearchRequest),
    ChatbotMessage(ChatbotRequest),
    ClearChat,
    ChatHistory,
    Roles,
    MarketSkills(String),
}

impl Call {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Call::UploadResume { .. } => UPLOAD_RESUME,
            Call::ResumeFeedback(_) => RESUME_FEEDBACK,
            Call::GapAnalysis(_) => GAP_ANALYSIS,
            Call::GapAnalysisWithPdf { .. } => GAP_ANALYSIS_WITH_PDF,
            Call::CheckAvailability => ROADMAP_AVAILABILITY,
            Call::GenerateRoadmap(_) => GENERATE_ROADMAP,
            Call::SearchJobs(_) => SEARCH_JOBS,
            Call::ChatbotMessage(_) => CHATBOT_MESSAGE,
            Call::ClearChat => CHATBOT_CLEAR,
            Call::ChatHistory => CHATBOT_HISTORY,
            Call::Roles => ROLES,
            Call::MarketSkills(_) => MARKET_SKILLS,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, Option<String>),
}

/// Replies are queued per endpoint; the last queued reply keeps being served.
/// An endpoint with nothing queued answers 500 without detail.
#[derive(Default)]
pub struct FakeCareerApi {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<&'static str, VecDeque<Reply>>>,
}

impl FakeCareerApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, endpoint: &'static str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn json(self, endpoint: &'static str, body: Value) -> Self {
        self.reply(endpoint, Reply::Json(body))
    }

    pub fn fail(self, endpoint: &'static str, status: u16, detail: Option<&str>) -> Self {
        self.reply(endpoint, Reply::Status(status, detail.map(str::to_string)))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::endpoint).collect()
    }

    fn answer<T: DeserializeOwned>(&self, call: Call) -> Result<T, ApiError> {
        let endpoint = call.endpoint();
        self.calls.lock().unwrap().push(call);

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(endpoint) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Json(body)) => Ok(serde_json::from_value(body)?),
            Some(Reply::Status(status, detail)) => Err(ApiError::Api { status, detail }),
            None => Err(ApiError::Api {
                status: 500,
                detail: None,
            }),
        }
    }
}

#[async_trait]
impl CareerApi for FakeCareerApi {
    async fn upload_resume(&self, file: &UploadFile) -> Result<ResumeData, ApiError> {
        self.answer(Call::UploadResume {
            file_name: file.file_name.clone(),
        })
    }

    async fn resume_feedback(
        &self,
        req: &ResumeFeedbackRequest,
    ) -> Result<ResumeFeedback, ApiError> {
        self.answer(Call::ResumeFeedback(req.clone()))
    }

    async fn gap_analysis(&self, req: &GapAnalysisRequest) -> Result<GapAnalysisResult, ApiError> {
        self.answer(Call::GapAnalysis(req.clone()))
    }

    async fn gap_analysis_with_pdf(
        &self,
        req: &PdfGapAnalysisRequest,
    ) -> Result<GapAnalysisResult, ApiError> {
        self.answer(Call::GapAnalysisWithPdf {
            user_skills: req.user_skills_field()?,
            target_role: req.target_role.clone(),
            file_name: req.job_description_file.file_name.clone(),
        })
    }

    async fn check_roadmap_availability(&self) -> Result<AvailabilityResponse, ApiError> {
        self.answer(Call::CheckAvailability)
    }

    async fn generate_roadmap(&self, req: &RoadmapRequest) -> Result<Roadmap, ApiError> {
        self.answer(Call::GenerateRoadmap(req.clone()))
    }

    async fn search_jobs(&self, req: &JobSearchRequest) -> Result<JobSearchResponse, ApiError> {
        self.answer(Call::SearchJobs(req.clone()))
    }

    async fn chatbot_message(&self, req: &ChatbotRequest) -> Result<ChatbotReply, ApiError> {
        self.answer(Call::ChatbotMessage(req.clone()))
    }

    async fn clear_chatbot_history(&self) -> Result<(), ApiError> {
        self.answer::<Value>(Call::ClearChat).map(|_| ())
    }

    async fn chatbot_history(&self) -> Result<Value, ApiError> {
        self.answer(Call::ChatHistory)
    }

    async fn roles(&self) -> Result<Vec<String>, ApiError> {
        self.answer(Call::Roles)
    }

    async fn market_skills(&self, role: &str) -> Result<Value, ApiError> {
        self.answer(Call::MarketSkills(role.to_string()))
    }
}
