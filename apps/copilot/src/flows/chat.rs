use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::api_client::CareerApi;
use crate::errors::AppError;
use crate::models::chat::{ChatMessage, ChatbotRequest};
use crate::storage::Handoff;

pub const WELCOME: &str = "👋 Welcome to AI Career Copilot! I'm here to help you understand \
your skill gaps, guide your learning, and assess your interview readiness. What would you \
like to know?";

pub const APOLOGY: &str =
    "Sorry, I encountered an error processing your message. Please try again.";

/// What the assistant knows about the user, read from the handoff keys once
/// when the chat opens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatContext {
    pub gap_analysis: Option<Value>,
    pub user_progress: Option<Value>,
    pub user_name: Option<String>,
    pub is_recruiter: bool,
}

impl ChatContext {
    pub fn from_handoff(handoff: &Handoff) -> Self {
        Self {
            gap_analysis: handoff.gap_analysis(),
            user_progress: handoff.user_progress(),
            user_name: handoff.user_name(),
            is_recruiter: handoff.is_recruiter(),
        }
    }

    fn request(&self, message: String) -> ChatbotRequest {
        ChatbotRequest {
            message,
            gap_analysis: self.gap_analysis.clone().unwrap_or_else(|| json!({})),
            user_progress: self.user_progress.clone(),
            user_name: self.user_name.clone(),
            is_recruiter: self.is_recruiter,
        }
    }
}

pub struct ChatAssistant {
    api: Arc<dyn CareerApi>,
    context: ChatContext,
    messages: Vec<ChatMessage>,
    input: String,
    loading: bool,
}

impl ChatAssistant {
    pub fn new(api: Arc<dyn CareerApi>, handoff: &Handoff) -> Self {
        Self::with_context(api, ChatContext::from_handoff(handoff))
    }

    pub fn with_context(api: Arc<dyn CareerApi>, context: ChatContext) -> Self {
        Self {
            api,
            context,
            messages: vec![ChatMessage::assistant(WELCOME, None)],
            input: String::new(),
            loading: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    pub fn has_gap_analysis(&self) -> bool {
        self.context.gap_analysis.is_some()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sends the current input. The user's message is shown immediately and
    /// stays even if the backend fails; a failure adds [`APOLOGY`] instead of
    /// a reply. Blank input does nothing.
    pub async fn send(&mut self) -> Option<&ChatMessage> {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.loading {
            return None;
        }

        self.messages.push(ChatMessage::user(text.clone()));
        self.input.clear();
        self.loading = true;

        let req = self.context.request(text);
        debug!("Chat request: {} chars", req.message.len());
        let reply = match self.api.chatbot_message(&req).await {
            Ok(reply) => {
                debug!(
                    "Chat reply category={:?} in_scope={:?}",
                    reply.category, reply.is_in_scope
                );
                ChatMessage::assistant(reply.response, reply.category)
            }
            Err(e) => {
                warn!("Chat message failed: {e}");
                ChatMessage::assistant(APOLOGY, None)
            }
        };
        self.loading = false;
        self.messages.push(reply);
        self.messages.last()
    }

    /// Asks the backend to forget the conversation, then starts over locally
    /// whatever it answered.
    pub async fn clear(&mut self) {
        if let Err(e) = self.api.clear_chatbot_history().await {
            warn!("Failed to clear chat history on the server: {e}");
        }
        self.messages = vec![ChatMessage::assistant(WELCOME, None)];
        self.input.clear();
        info!("Chat cleared");
    }

    pub async fn history(&self) -> Result<Value, AppError> {
        Ok(self.api.chatbot_history().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::fake::{Call, FakeCareerApi};
    use crate::api_client::{CHATBOT_CLEAR, CHATBOT_HISTORY, CHATBOT_MESSAGE};
    use crate::models::chat::ChatRole;

    fn assistant(api: FakeCareerApi, context: ChatContext) -> (Arc<FakeCareerApi>, ChatAssistant) {
        let api = Arc::new(api);
        (api.clone(), ChatAssistant::with_context(api, context))
    }

    #[tokio::test]
    async fn test_starts_with_welcome_and_ignores_blank_input() {
        let (api, mut chat) = assistant(FakeCareerApi::new(), ChatContext::default());
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, ChatRole::Assistant);
        assert!(chat.messages()[0]
            .content
            .starts_with("👋 Welcome to AI Career Copilot!"));

        chat.set_input("   ");
        assert!(chat.send().await.is_none());
        assert_eq!(chat.messages().len(), 1);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_send_forwards_context_and_appends_reply() {
        let context = ChatContext {
            gap_analysis: Some(json!({"match_percentage": 40.0})),
            user_name: Some("Asha".into()),
            is_recruiter: true,
            ..Default::default()
        };
        let (api, mut chat) = assistant(
            FakeCareerApi::new().json(
                CHATBOT_MESSAGE,
                json!({"response": "Start with SQL joins.", "category": "learning"}),
            ),
            context,
        );

        chat.set_input("  What should I learn first? ");
        let reply = chat.send().await.unwrap();
        assert_eq!(reply.content, "Start with SQL joins.");
        assert_eq!(reply.category.as_deref(), Some("learning"));
        assert_eq!(chat.input(), "");
        assert_eq!(chat.messages().len(), 3);

        assert_eq!(
            api.calls(),
            vec![Call::ChatbotMessage(ChatbotRequest {
                message: "What should I learn first?".into(),
                gap_analysis: json!({"match_percentage": 40.0}),
                user_progress: None,
                user_name: Some("Asha".into()),
                is_recruiter: true,
            })]
        );
    }

    #[tokio::test]
    async fn test_missing_gap_analysis_sends_empty_object() {
        let (api, mut chat) = assistant(
            FakeCareerApi::new().json(CHATBOT_MESSAGE, json!({"response": "Hello"})),
            ChatContext::default(),
        );
        assert!(!chat.has_gap_analysis());
        chat.set_input("hi");
        chat.send().await;

        match &api.calls()[0] {
            Call::ChatbotMessage(req) => assert_eq!(req.gap_analysis, json!({})),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_user_message_and_apologises() {
        let (_, mut chat) = assistant(
            FakeCareerApi::new().fail(CHATBOT_MESSAGE, 503, Some("model overloaded")),
            ChatContext::default(),
        );
        chat.set_input("Review my resume");
        let reply = chat.send().await.unwrap();
        assert_eq!(reply.content, APOLOGY);

        let roles: Vec<_> = chat.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, [ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]);
        assert_eq!(chat.messages()[1].content, "Review my resume");
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_clear_leaves_one_welcome_even_when_purge_fails() {
        let (api, mut chat) = assistant(
            FakeCareerApi::new()
                .json(CHATBOT_MESSAGE, json!({"response": "Sure"}))
                .fail(CHATBOT_CLEAR, 500, None),
            ChatContext::default(),
        );
        chat.set_input("one");
        chat.send().await;
        chat.set_input("two");
        chat.send().await;
        assert_eq!(chat.messages().len(), 5);

        chat.clear().await;
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, ChatRole::Assistant);
        assert_eq!(chat.messages()[0].content, WELCOME);
        assert_eq!(api.endpoints().last(), Some(&CHATBOT_CLEAR));
    }

    #[tokio::test]
    async fn test_history_is_passed_through() {
        let (_, chat) = assistant(
            FakeCareerApi::new().json(CHATBOT_HISTORY, json!({"history": [], "count": 0})),
            ChatContext::default(),
        );
        assert_eq!(chat.history().await.unwrap()["count"], 0);
    }

    #[test]
    fn test_context_is_read_from_handoff() {
        use crate::models::analysis::GapAnalysisResult;
        use crate::storage::{KeyValueStorage, MemoryStorage};

        let storage = Arc::new(MemoryStorage::new());
        let handoff = Handoff::new(storage.clone());
        handoff
            .set_gap_analysis(&GapAnalysisResult {
                match_percentage: 55.0,
                ..Default::default()
            })
            .unwrap();
        handoff.set_user_name("Ravi").unwrap();
        storage.set("userRole", "\"recruiter\"").unwrap();

        let chat = ChatAssistant::new(Arc::new(FakeCareerApi::new()), &handoff);
        let context = chat.context();
        assert!(chat.has_gap_analysis());
        assert_eq!(context.gap_analysis.as_ref().unwrap()["match_percentage"], 55.0);
        assert_eq!(context.user_name.as_deref(), Some("Ravi"));
        assert!(context.user_progress.is_none());
        assert!(context.is_recruiter);
    }
}
