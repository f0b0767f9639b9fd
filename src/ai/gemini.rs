use serde::{Deserialize, Serialize};

use crate::ai::TextGenerator;
use crate::ai::errors::{AiError, AiResult};
use crate::config::AiConfig;

/// Human-readable name reported in errors and status responses.
pub const SERVICE_NAME: &str = "Gemini Direct";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Public Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Blocking client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from the AI settings. The API key is mandatory.
    pub fn new(config: &AiConfig) -> AiResult<Self> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(AiError::Configuration(
                "GOOGLE_API_KEY is required for the Gemini service".to_string(),
            ));
        }

        Ok(Self {
            agent: ureq::AgentBuilder::new().build(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl TextGenerator for GeminiClient {
    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> AiResult<Option<String>> {
        let request = GenerateContentRequest::new(prompt);

        let response = self
            .agent
            .post(&self.endpoint())
            .set("x-goog-api-key", &self.api_key)
            .send_json(&request)
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => {
                    let body = response.into_string().unwrap_or_default();
                    AiError::generation(
                        SERVICE_NAME,
                        format!("content generation failed with status {status}: {body}"),
                    )
                }
                ureq::Error::Transport(transport) => AiError::generation_caused_by(
                    SERVICE_NAME,
                    "content generation request failed",
                    transport,
                ),
            })?;

        let body: GenerateContentResponse = response.into_json().map_err(|err| {
            AiError::generation_caused_by(SERVICE_NAME, "malformed response payload", err)
        })?;

        Ok(body.into_text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, or `None` when the model returned nothing.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.is_empty() { None } else { Some(text) }
    }
}
