use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub category: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into(), None)
    }

    pub fn assistant(content: impl Into<String>, category: Option<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into(), category)
    }

    fn new(role: ChatRole, content: String, category: Option<String>) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            role,
            content,
            category,
            timestamp: Utc::now(),
        }
    }
}

/// Body of `POST /api/chatbot/message`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatbotRequest {
    pub message: String,
    pub gap_analysis: Value,
    pub user_progress: Option<Value>,
    pub user_name: Option<String>,
    pub is_recruiter: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatbotReply {
    pub response: String,
    pub category: Option<String>,
    pub confidence: Option<f64>,
    pub is_in_scope: Option<bool>,
}
