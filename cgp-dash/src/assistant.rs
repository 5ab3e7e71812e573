//! Generative-AI sales assistant
//!
//! Two single-turn requests against the Gemini `generateContent` endpoint:
//! an executive insight over the course and seller figures, and a coaching
//! chat grounded on the course/instructor catalog. Conversation history is
//! kept by the client. Failures never reach the caller as errors; they are
//! logged and replaced by a fixed apology text.

use cgp_common::config::AiSettings;
use cgp_common::{Course, Instructor, Seller};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("cgp-dash/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const NOT_CONFIGURED_TEXT: &str = "API key not configured.";
pub const INSIGHTS_EMPTY_TEXT: &str = "Could not generate insights right now.";
pub const INSIGHTS_FAILED_TEXT: &str = "Error connecting to the AI for analysis.";
pub const CHAT_EMPTY_TEXT: &str = "Sorry, I could not process your request.";
pub const CHAT_FAILED_TEXT: &str = "Sorry, I am facing a temporary technical issue.";

/// Gemini client errors
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Response contained no text")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Minimal `generateContent` client
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user turn, optionally with a system instruction
    ///
    /// Returns the first candidate's text parts joined.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending generateContent request");

        let response = self
            .http_client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(status.as_u16(), error_text));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        info!(model = %self.model, response_chars = text.len(), "Gemini response received");
        Ok(text)
    }
}

/// Prompt for the executive insight panel
pub fn insights_prompt(courses: &[Course], sellers: &[Seller]) -> String {
    let course_lines: Vec<String> = courses
        .iter()
        .map(|c| {
            format!(
                "{} ({}/{}): revenue R${} (target R${})",
                c.title, c.city, c.state, c.revenue_to_date, c.revenue_target
            )
        })
        .collect();
    let seller_lines: Vec<String> = sellers
        .iter()
        .map(|s| format!("{}: sold R${}", s.name, s.total_sales))
        .collect();

    format!(
        "Act as a senior data analyst for CGP (Centro de Capacitação em Gestão Pública).\n\
         Analyse the summarized data below and give a short executive insight \
         (at most 3 paragraphs) focused on improvement opportunities and positive highlights.\n\
         Use simple Markdown formatting and answer in Brazilian Portuguese.\n\n\
         Course data:\n{}\n\nSeller data:\n{}\n",
        course_lines.join("\n"),
        seller_lines.join("\n")
    )
}

/// System instruction for the sales-coaching chat
pub fn chat_instruction(courses: &[Course], instructors: &[Instructor]) -> String {
    let context = json!({
        "courses": courses.iter().map(|c| json!({
            "title": c.title,
            "city": c.city,
            "startDate": c.start_date,
            "seatPrice": c.seat_price,
            "status": c.status,
        })).collect::<Vec<_>>(),
        "instructors": instructors.iter().map(|i| json!({
            "name": i.name,
            "specialty": i.specialty,
        })).collect::<Vec<_>>(),
    });

    format!(
        "You are 'CGP Sales Mentor', an AI assistant supporting the sales team of CGP \
         (Centro de Capacitação em Gestão Pública).\n\n\
         YOUR GOALS:\n\
         1. Give quick facts about the courses (dates, places, prices).\n\
         2. Build sales strategies, outreach scripts and persuasion arguments.\n\
         3. Help overcome client objections (e.g. \"too expensive\", \"no time\").\n\n\
         CURRENT DATA:\n{}\n\n\
         GUIDELINES:\n\
         - Be direct, motivating and professional.\n\
         - Use Markdown (bold, lists) for readability.\n\
         - When asked about a specific course, use the data above.\n\
         - When asked for a strategy, suggest techniques such as SPIN Selling, mental triggers \
         or AIDA adapted to the public sector.\n\
         - Always answer in Brazilian Portuguese.\n",
        context
    )
}

/// Insight and chat front end with fixed fallbacks
pub struct Assistant {
    client: Option<GeminiClient>,
}

impl Assistant {
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    /// Build from settings; no key means the assistant is disabled
    pub fn from_settings(settings: &AiSettings) -> Self {
        let client = settings.api_key.as_deref().and_then(|key| {
            GeminiClient::new(key, &settings.model, &settings.base_url)
                .map_err(|e| warn!("Gemini client unavailable: {}", e))
                .ok()
        });
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn generate_insights(&self, courses: &[Course], sellers: &[Seller]) -> String {
        let Some(client) = &self.client else {
            return NOT_CONFIGURED_TEXT.to_string();
        };
        match client.generate(&insights_prompt(courses, sellers), None).await {
            Ok(text) => text,
            Err(AiError::EmptyResponse) => INSIGHTS_EMPTY_TEXT.to_string(),
            Err(e) => {
                warn!("Error generating insights: {}", e);
                INSIGHTS_FAILED_TEXT.to_string()
            }
        }
    }

    pub async fn chat(&self, message: &str, courses: &[Course], instructors: &[Instructor]) -> String {
        let Some(client) = &self.client else {
            return NOT_CONFIGURED_TEXT.to_string();
        };
        let instruction = chat_instruction(courses, instructors);
        match client.generate(message, Some(&instruction)).await {
            Ok(text) => text,
            Err(AiError::EmptyResponse) => CHAT_EMPTY_TEXT.to_string(),
            Err(e) => {
                warn!("AI chat error: {}", e);
                CHAT_FAILED_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgp_common::fixtures;

    #[test]
    fn test_insights_prompt_lines() {
        let prompt = insights_prompt(&fixtures::courses()[..1], &fixtures::sellers()[..1]);
        assert!(prompt.contains(
            "Nova Lei de Licitações 14.133 (São Paulo/SP): revenue R$112500 (target R$100000)"
        ));
        assert!(prompt.contains("Ana: sold R$154000"));
    }

    #[test]
    fn test_chat_instruction_embeds_catalog() {
        let instruction = chat_instruction(&fixtures::courses(), &fixtures::instructors());
        assert!(instruction.contains("\"title\":\"Auditoria e Controle Interno\""));
        assert!(instruction.contains("\"specialty\":\"Licitações\""));
        assert!(instruction.contains("\"status\":\"Agendado\""));
    }

    #[tokio::test]
    async fn test_unconfigured_assistant() {
        let assistant = Assistant::from_settings(&AiSettings::default());
        assert!(!assistant.is_configured());
        let text = assistant.chat("oi", &[], &[]).await;
        assert_eq!(text, NOT_CONFIGURED_TEXT);
        let text = assistant.generate_insights(&[], &[]).await;
        assert_eq!(text, NOT_CONFIGURED_TEXT);
    }
}
