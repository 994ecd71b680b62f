//! Gateway to the text-generation backend.
//!
//! The backend is a proxy that holds the provider credentials. One call is
//! one exchange:
//!
//! ```text
//! POST {api_url}/chat   {"prompt": "...", "systemInstruction": "..."}
//!   200 {"text": "..."}                  -> Ok(text)
//!   200 {"error": "..."}                 -> Err(Backend)
//!   200 {"success": false, ...}          -> Err(Backend)
//!   200 {} / {"text": ""} / not JSON     -> Err(Malformed)
//!   non-2xx                              -> Err(Status)
//!   no response / timeout                -> Err(Transport)
//! ```
//!
//! The persona block travels as `systemInstruction` and the task sections as
//! `prompt`; the backend joins them with a blank line.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AssistantConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::prompt::Prompt;

/// Upper bound on how much of an error body is quoted in a failure cause.
const MAX_ERROR_BODY: usize = 200;

/// Sends a prompt to the generation backend.
///
/// Implementations issue exactly one request per `send` and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generate text for a fully built prompt.
    async fn send(&self, prompt: &Prompt) -> GatewayResult<String>;

    /// Whether the backend is reachable and healthy.
    async fn probe(&self) -> bool {
        false
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    prompt: &'a str,
    system_instruction: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP gateway to the generation proxy.
pub struct HttpGateway {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &AssistantConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, prompt: &Prompt) -> GatewayResult<String> {
        let url = self.endpoint("chat");
        debug!(url = %url, prompt_len = prompt.body.len(), "Sending generation request");

        let response = self
            .authorize(self.client.post(&url))
            .json(&GenerateRequest {
                prompt: &prompt.body,
                system_instruction: &prompt.system,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| truncate(&body, MAX_ERROR_BODY));
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Malformed(format!("response is not valid JSON: {}", e)))?;
        interpret(parsed)
    }

    async fn probe(&self) -> bool {
        let url = self.endpoint("test");
        let response = match self.authorize(self.client.get(&url)).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Nexus connection failed: {}", e);
                return false;
            }
        };

        match response.json::<ProbeResponse>().await {
            Ok(probe) if probe.success => {
                debug!(
                    "Nexus AI connected: {}",
                    probe.message.as_deref().unwrap_or("ok")
                );
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("Nexus connection check returned an unexpected body: {}", e);
                false
            }
        }
    }
}

/// Gateway that is never reachable, for running fully offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGateway;

#[async_trait]
impl Gateway for OfflineGateway {
    async fn send(&self, _prompt: &Prompt) -> GatewayResult<String> {
        Err(GatewayError::Transport("offline mode".to_string()))
    }
}

fn interpret(response: GenerateResponse) -> GatewayResult<String> {
    if let Some(error) = response.error.filter(|e| !e.trim().is_empty()) {
        return Err(GatewayError::Backend(error));
    }
    if response.success == Some(false) {
        return Err(GatewayError::Backend("backend reported failure".to_string()));
    }
    match response.text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(GatewayError::Malformed("text field is empty".to_string())),
        None => Err(GatewayError::Malformed("text field is missing".to_string())),
    }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Transport(format!("request timed out: {}", error))
    } else {
        GatewayError::Transport(error.to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_interpret_success() {
        assert_eq!(interpret(response(r#"{"text": "Plan it"}"#)).unwrap(), "Plan it");
        assert_eq!(
            interpret(response(r#"{"success": true, "text": "ok"}"#)).unwrap(),
            "ok"
        );
    }

    #[test]
    fn test_interpret_backend_error() {
        assert_eq!(
            interpret(response(r#"{"error": "AI Service Temporarily Unavailable"}"#)),
            Err(GatewayError::Backend("AI Service Temporarily Unavailable".to_string()))
        );
        assert!(matches!(
            interpret(response(r#"{"success": false, "text": "ignored"}"#)),
            Err(GatewayError::Backend(_))
        ));
    }

    #[test]
    fn test_interpret_malformed() {
        assert!(matches!(interpret(response("{}")), Err(GatewayError::Malformed(_))));
        assert!(matches!(
            interpret(response(r#"{"text": "   "}"#)),
            Err(GatewayError::Malformed(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let config = AssistantConfig {
            api_url: "http://localhost:3001/api/".to_string(),
            ..Default::default()
        };
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.api_url(), "http://localhost:3001/api");
        assert_eq!(gateway.endpoint("chat"), "http://localhost:3001/api/chat");
    }

    #[test]
    fn test_request_body_field_names() {
        let body = serde_json::to_value(GenerateRequest {
            prompt: "TASK",
            system_instruction: "You are Nexus AI",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"prompt": "TASK", "systemInstruction": "You are Nexus AI"})
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("  short ", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }

    #[tokio::test]
    async fn test_offline_gateway() {
        let gateway = OfflineGateway;
        let prompt = Prompt {
            system: "persona".to_string(),
            body: "x".to_string(),
        };
        assert!(matches!(gateway.send(&prompt).await, Err(GatewayError::Transport(_))));
        assert!(!gateway.probe().await);
    }
}
