use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    QuotaExceeded,
    Auth,
    Blocked,
    Transport,
    InvalidResponse,
    Upstream,
}

#[derive(Debug, Error)]
#[error("{kind:?} (status {status:?}): {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    /// Builds an error from a non-2xx API reply.
    ///
    /// Gemini reports failures as `{"error": {"code", "message", "status", "details"}}`.
    /// The HTTP status decides first; the `status` string and `details[].reason`
    /// refine it (an invalid key comes back as a plain 400).
    pub fn from_api_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let error = parsed.as_ref().and_then(|v| v.get("error"));

        let api_status = error
            .and_then(|e| e.get("status"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        let key_invalid = error
            .and_then(|e| e.get("details"))
            .and_then(Value::as_array)
            .map(|details| {
                details.iter().any(|d| {
                    d.get("reason").and_then(Value::as_str) == Some("API_KEY_INVALID")
                })
            })
            .unwrap_or(false);

        let kind = match (status, api_status) {
            (429, _) | (_, "RESOURCE_EXHAUSTED") => GenerationErrorKind::QuotaExceeded,
            (401 | 403, _) | (_, "UNAUTHENTICATED" | "PERMISSION_DENIED") => {
                GenerationErrorKind::Auth
            }
            _ if key_invalid => GenerationErrorKind::Auth,
            _ => GenerationErrorKind::Upstream,
        };

        Self {
            kind,
            status: Some(status),
            message,
        }
    }
}

// Bodies are read as text and parsed separately, so reqwest only fails on the wire
impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            kind: GenerationErrorKind::Transport,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
