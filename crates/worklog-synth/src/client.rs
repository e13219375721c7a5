use crate::{SynthesisError, SynthesisResult};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use tracing::{debug, info, warn};
use worklog_core::{EndpointConfig, PromptPair};

/// Longest slice of an error body quoted back to the user
const MAX_ERROR_DETAIL_CHARS: usize = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// One request per [`synthesize`](Self::synthesize) call: no retries, no batching.
pub struct ReportClient {
    http: reqwest::Client,
    endpoint: EndpointConfig,
}

impl ReportClient {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, SynthesisError> {
        let http = reqwest::Client::builder()
            .timeout(endpoint.timeout())
            .build()
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;
        Ok(Self::with_http(endpoint, http))
    }

    /// Use a preconfigured HTTP client (proxy, TLS and timeout settings are the caller's)
    pub fn with_http(endpoint: EndpointConfig, http: reqwest::Client) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Send `prompt` and return the cleaned report, or a failure message as data
    pub async fn synthesize(&self, prompt: &PromptPair) -> SynthesisResult {
        match self.complete(prompt).await {
            Ok(raw) => {
                info!(model = %self.endpoint.model, chars = raw.len(), "report synthesized");
                SynthesisResult::success(raw)
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint.endpoint_url, error = %e, "report synthesis failed");
                SynthesisResult::failure(e)
            }
        }
    }

    async fn complete(&self, prompt: &PromptPair) -> Result<String, SynthesisError> {
        let body = self.request_body(prompt)?;
        debug!(
            endpoint = %self.endpoint.endpoint_url,
            model = %self.endpoint.model,
            bytes = body.len(),
            "sending chat completion request"
        );

        let mut request = self
            .http
            .post(&self.endpoint.endpoint_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(key) = &self.endpoint.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SynthesisError::Transport(describe_transport_error(&e, &self.endpoint)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SynthesisError::Transport(describe_transport_error(&e, &self.endpoint)))?;
        debug!(status = status.as_u16(), bytes = text.len(), "received response");

        if !status.is_success() {
            return Err(SynthesisError::HttpStatus {
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }

        parse_content(&text)
    }

    fn request_body(&self, prompt: &PromptPair) -> Result<Vec<u8>, SynthesisError> {
        let request = ChatRequest {
            model: &self.endpoint.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.endpoint.max_tokens,
            temperature: self.endpoint.temperature,
        };
        serde_json::to_vec(&request).map_err(|e| SynthesisError::Serialization(e.to_string()))
    }
}

/// Extract `choices[0].message.content` from a chat-completion body
fn parse_content(body: &str) -> Result<String, SynthesisError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SynthesisError::ResponseShape(format!("{} in body {}", e, snippet(body))))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SynthesisError::ResponseShape("response has no choices".to_string()))?;

    choice.message.content.ok_or_else(|| {
        SynthesisError::ResponseShape("first choice has no message content".to_string())
    })
}

/// Prefer the API's own `error.message`, else the start of the body
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v["error"]["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                snippet(body)
            }
        })
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_DETAIL_CHARS {
        let cut: String = trimmed.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

fn describe_transport_error(error: &reqwest::Error, endpoint: &EndpointConfig) -> String {
    if error.is_timeout() {
        return format!(
            "no response from {} within {}s",
            endpoint.endpoint_url, endpoint.timeout_secs
        );
    }

    let mut message = if error.is_connect() {
        format!("could not connect to {}", endpoint.endpoint_url)
    } else {
        error.to_string()
    };
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> PromptPair {
        PromptPair {
            system: "write a report".to_string(),
            user: "2025-02-10: fixed bug A".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let client = ReportClient::new(EndpointConfig::new()).unwrap();
        let body: serde_json::Value =
            serde_json::from_slice(&client.request_body(&prompt()).unwrap()).unwrap();

        assert_eq!(body["model"], EndpointConfig::new().model.as_str());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "write a report");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "2025-02-10: fixed bug A");
        assert_eq!(body["max_tokens"], 2000);
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_omits_unset_temperature() {
        let mut endpoint = EndpointConfig::new();
        endpoint.temperature = None;
        let client = ReportClient::new(endpoint).unwrap();
        let body: serde_json::Value =
            serde_json::from_slice(&client.request_body(&prompt()).unwrap()).unwrap();
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_parse_content_success() {
        let body = r##"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"# Report"}}],"usage":{}}"##;
        assert_eq!(parse_content(body).unwrap(), "# Report");
    }

    #[test]
    fn test_parse_content_missing_choices() {
        let err = parse_content(r#"{"id":"c1","object":"chat.completion"}"#).unwrap_err();
        assert!(matches!(err, SynthesisError::ResponseShape(_)));
        assert!(err.to_string().contains("choices"));
    }

    #[test]
    fn test_parse_content_empty_choices() {
        let err = parse_content(r#"{"choices":[]}"#).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::ResponseShape("response has no choices".to_string())
        );
    }

    #[test]
    fn test_parse_content_null_content() {
        let err = parse_content(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, SynthesisError::ResponseShape(_)));
    }

    #[test]
    fn test_parse_content_not_json() {
        let err = parse_content("<html>gateway</html>").unwrap_err();
        assert!(err.to_string().contains("<html>gateway</html>"));
    }

    #[test]
    fn test_error_detail_prefers_api_message() {
        assert_eq!(
            error_detail(r#"{"error":{"message":"model not found","type":"invalid_request"}}"#),
            "model not found"
        );
        assert_eq!(error_detail(r#"{"error":"model not found"}"#), "model not found");
        assert_eq!(error_detail(""), "empty response body");
        assert!(error_detail(&"x".repeat(1000)).ends_with("..."));
    }
}
