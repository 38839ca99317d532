//! Gemini `generateContent` client.
//!
//! Speaks the REST API directly over HTTPS with a bounded per-request
//! timeout. Quiz generation pins a JSON response schema so the payload
//! deserializes straight into [`Quiz`].

use super::{AssistantError, Attachment, ChatTurn, Quiz, TextGenerator, TurnRole};
use crate::config::AssistantConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const CHAT_SYSTEM_PROMPT: &str = "You are the study assistant for the Study Hall platform. \
    Speak in an encouraging, helpful tone and keep answers focused on the \
    student's coursework and study questions.";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn text_part(text: impl Into<String>) -> Part {
    Part {
        text: Some(text.into()),
        inline_data: None,
    }
}

fn user_content(parts: Vec<Part>) -> Content {
    Content {
        role: Some("user".to_string()),
        parts,
    }
}

/// Response schema for quiz generation, mirrored by [`Quiz`].
fn quiz_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "correctAnswer": {
                            "type": "INTEGER",
                            "description": "Index of the correct option (0-3)"
                        }
                    }
                }
            }
        }
    })
}

/// HTTP client for the Gemini generateContent endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client from the assistant config block.
    pub fn new(config: &AssistantConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("studyhall/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: API_BASE.to_string(),
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, AssistantError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let response: GenerateResponse = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        debug!(model = %self.model, chars = text.len(), "Generation complete");
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn explain(
        &self,
        prompt: &str,
        level: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, AssistantError> {
        let mut parts = Vec::new();
        if let Some(file) = attachment {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: file.mime_type.clone(),
                    data: file.data.clone(),
                }),
            });
        }
        parts.push(text_part(format!(
            "You are an expert tutor for students in grade {level}.\n\
             \n\
             Task: Analyze the provided content (text or file) and explain the \
             specific topic requested below. If a file is provided, look for the \
             specific page number or lesson topic mentioned.\n\
             \n\
             Student request (page no / topic): {prompt}\n\
             \n\
             Output requirements:\n\
             1. Explain clearly and simply.\n\
             2. Use bullet points for key concepts.\n\
             3. Highlight important definitions."
        )));

        self.generate(&GenerateRequest {
            contents: vec![user_content(parts)],
            system_instruction: None,
            generation_config: None,
        })
        .await
    }

    async fn generate_quiz(&self, source: &str) -> Result<Quiz, AssistantError> {
        let text = self
            .generate(&GenerateRequest {
                contents: vec![user_content(vec![text_part(format!(
                    "Generate a multiple-choice quiz (5 questions) based on the \
                     following text. Return ONLY JSON.\nText: {source}"
                ))])],
                system_instruction: None,
                generation_config: Some(GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: quiz_schema(),
                }),
            })
            .await?;

        Ok(serde_json::from_str(&text)?)
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, AssistantError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content {
                role: Some(
                    match turn.role {
                        TurnRole::User => "user",
                        TurnRole::Model => "model",
                    }
                    .to_string(),
                ),
                parts: vec![text_part(turn.text.clone())],
            })
            .collect();
        contents.push(user_content(vec![text_part(message)]));

        self.generate(&GenerateRequest {
            contents,
            system_instruction: Some(Content {
                role: None,
                parts: vec![text_part(CHAT_SYSTEM_PROMPT)],
            }),
            generation_config: None,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_schema_names_match_the_quiz_type() {
        let schema = quiz_schema();
        assert!(schema["properties"]["title"].is_object());
        let question = &schema["properties"]["questions"]["items"]["properties"];
        assert!(question["correctAnswer"].is_object());
        assert!(question["options"].is_object());
    }

    #[test]
    fn response_text_parts_concatenate() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"there"}]}}]}"#,
        )
        .unwrap();
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        assert_eq!(text, "Hello there");
    }
}
