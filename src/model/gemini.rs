use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{json, Value};

use super::{GenerationError, GenerationErrorKind, TextGenerator};
use crate::config::{AppConfig, GenerationConfig, SafetySetting};

// Client for the Gemini generateContent endpoint
pub struct GeminiModel {
    client: Client,
    endpoint: String,
    api_key: String,
    generation: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiModel {
    pub fn new(config: &AppConfig) -> Self {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.api_base, config.model
        );
        info!("Using Gemini model {} at {}", config.model, config.api_base);

        Self {
            client: Client::new(),
            endpoint,
            api_key: config.api_key.clone(),
            generation: config.generation.clone(),
            safety_settings: config.safety_settings.clone(),
        }
    }

    fn payload(&self, prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": self.generation,
            "safetySettings": self.safety_settings,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = self.payload(prompt);
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Gemini API request failed with status {}", status);
            return Err(GenerationError::from_api_response(status.as_u16(), &body));
        }

        let response_json: Value = serde_json::from_str(&body).map_err(|e| {
            GenerationError::new(
                GenerationErrorKind::InvalidResponse,
                format!("Response is not valid JSON: {}", e),
            )
        })?;
        debug!("Response JSON: {}", response_json);

        let text = extract_text(&response_json)?;
        info!("Response length: {} characters", text.len());
        Ok(text)
    }
}

/// Pulls the generated text out of a successful reply, concatenating the parts
/// of the first candidate.
fn extract_text(response_json: &Value) -> Result<String, GenerationError> {
    if let Some(reason) = response_json
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(GenerationError::new(
            GenerationErrorKind::Blocked,
            format!("Prompt blocked: {}", reason),
        ));
    }

    let candidate = response_json
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .ok_or_else(|| {
            GenerationError::new(
                GenerationErrorKind::InvalidResponse,
                "Response contained no candidates",
            )
        })?;

    let text: String = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    match candidate.get("finishReason").and_then(Value::as_str) {
        Some("SAFETY") => Err(GenerationError::new(
            GenerationErrorKind::Blocked,
            "Candidate blocked by safety filters",
        )),
        _ => Err(GenerationError::new(
            GenerationErrorKind::InvalidResponse,
            "Failed to extract text from response",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            "GEMINI_API_BASE" => Some(server.uri()),
            _ => None,
        })
        .unwrap()
    }

    const ENDPOINT: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    #[tokio::test]
    async fn joins_text_parts_of_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "hola" }] }],
                "generationConfig": { "topK": 40 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Hola, " }, { "text": "soy Angel." }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = GeminiModel::new(&config_for(&server));
        let text = model.generate("hola").await.unwrap();
        assert_eq!(text, "Hola, soy Angel.");
    }

    #[tokio::test]
    async fn rate_limit_maps_to_quota() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
            })))
            .mount(&server)
            .await;

        let model = GeminiModel::new(&config_for(&server));
        let err = model.generate("hola").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::QuotaExceeded);
        assert_eq!(err.status, Some(429));
    }

    #[tokio::test]
    async fn forbidden_maps_to_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED" }
            })))
            .mount(&server)
            .await;

        let model = GeminiModel::new(&config_for(&server));
        let err = model.generate("hola").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Auth);
    }

    #[tokio::test]
    async fn blocked_prompt_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let model = GeminiModel::new(&config_for(&server));
        let err = model.generate("algo").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Blocked);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = AppConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            "GEMINI_API_BASE" => Some(format!("http://127.0.0.1:{}", port)),
            _ => None,
        })
        .unwrap();

        let err = GeminiModel::new(&config).generate("hola").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Transport);
        assert_eq!(err.status, None);
    }

    #[test]
    fn empty_safety_candidate_is_blocked() {
        let reply = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let err = extract_text(&reply).unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Blocked);
    }

    #[test]
    fn missing_candidates_is_invalid() {
        let err = extract_text(&json!({})).unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::InvalidResponse);
    }
}
