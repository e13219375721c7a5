use worklog_core::cleanup_response;

/// Why a synthesis call produced no report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// Network unreachable, DNS, TLS, timeout
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned HTTP {status}: {detail}")]
    HttpStatus { status: u16, detail: String },

    /// Body arrived but is not a chat completion with text content
    #[error("could not parse model response: {0}")]
    ResponseShape(String),

    #[error("could not encode request: {0}")]
    Serialization(String),
}

/// Outcome of one synthesis call. Failures are carried as data, never raised.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Content exactly as the model returned it (empty on failure)
    pub raw: String,
    /// Cleaned report text, or a human-readable failure message
    pub text: String,
    pub failure: Option<SynthesisError>,
}

impl SynthesisResult {
    pub fn success(raw: String) -> Self {
        let text = cleanup_response(&raw);
        Self {
            raw,
            text,
            failure: None,
        }
    }

    pub fn failure(error: SynthesisError) -> Self {
        Self {
            raw: String::new(),
            text: format!("Report generation failed: {}", error),
            failure: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}
