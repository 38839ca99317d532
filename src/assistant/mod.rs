//! Text-generation capability.
//!
//! The engine consumes generation as an opaque capability behind
//! [`TextGenerator`]; [`Assistant`] wraps a generator and fails closed,
//! returning a safe fallback message instead of propagating transport
//! errors into the caller's state.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Fallback when a lesson explanation cannot be produced.
const EXPLAIN_FALLBACK: &str =
    "Sorry, the explanation service is unavailable right now. Please try again later.";

/// Fallback when the conversational assistant cannot be reached.
const CHAT_FALLBACK: &str =
    "The assistant could not be reached. Please try again in a moment.";

/// Errors from the text-generation upstream.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("malformed quiz payload: {0}")]
    MalformedQuiz(#[from] serde_json::Error),
}

impl AssistantError {
    pub fn kind(&self) -> crate::error::ErrorKind {
        crate::error::ErrorKind::Upstream
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_error",
            Self::EmptyResponse => "empty_response",
            Self::MalformedQuiz(_) => "malformed_quiz",
        }
    }
}

/// An uploaded file passed alongside an explanation request.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Base64-encoded file content.
    pub data: String,
    pub mime_type: String,
}

/// One side of an assistant conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

/// A prior conversation turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

/// A generated multiple-choice quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
}

/// Opaque text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Explain a topic for a student at the given proficiency level,
    /// optionally grounded in an uploaded file.
    async fn explain(
        &self,
        prompt: &str,
        level: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, AssistantError>;

    /// Generate a multiple-choice quiz from source text.
    async fn generate_quiz(&self, source: &str) -> Result<Quiz, AssistantError>;

    /// Continue an assistant conversation.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, AssistantError>;
}

/// Fail-closed front to a [`TextGenerator`].
///
/// Transport failures degrade to user-facing apology strings (or `None`
/// for quizzes) and are logged; they never reach the caller as errors.
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn explain(
        &self,
        prompt: &str,
        level: &str,
        attachment: Option<&Attachment>,
    ) -> String {
        match self.generator.explain(prompt, level, attachment).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Explanation request failed");
                EXPLAIN_FALLBACK.to_string()
            }
        }
    }

    pub async fn generate_quiz(&self, source: &str) -> Option<Quiz> {
        match self.generator.generate_quiz(source).await {
            Ok(quiz) => Some(quiz),
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Quiz generation failed");
                None
            }
        }
    }

    pub async fn chat(&self, history: &[ChatTurn], message: &str) -> String {
        match self.generator.chat(history, message).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Assistant chat failed");
                CHAT_FALLBACK.to_string()
            }
        }
    }
}
