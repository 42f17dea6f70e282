//! # Narrative Error Types
//!
//! Failures of the generative text service.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Narrative Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │   Response      │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ GenerationFailed│  │ MalformedResp.  │  │  Disabled               │ │
//! │  │ Timeout         │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  None of these reach the dashboard user: NarrativeAdvisor logs them    │
//! │  and answers with the rule-based fallback instead.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for narrative operations.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

#[derive(Debug, Error)]
pub enum NarrativeError {
    /// The service could not be reached or answered with an error status.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// No answer within the configured time.
    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),

    /// The answer was not the JSON object we asked for.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Narrative generation is turned off in the configuration.
    #[error("Narrative service is disabled")]
    Disabled,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for NarrativeError {
    fn from(err: serde_json::Error) -> Self {
        NarrativeError::MalformedResponse(err.to_string())
    }
}

impl From<reqwest::Error> for NarrativeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NarrativeError::MalformedResponse(err.to_string())
        } else {
            NarrativeError::GenerationFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            NarrativeError::Timeout(15).to_string(),
            "Generation timed out after 15 seconds"
        );
        assert_eq!(NarrativeError::Disabled.to_string(), "Narrative service is disabled");
    }

    #[test]
    fn test_json_error_is_malformed_response() {
        let err: NarrativeError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, NarrativeError::MalformedResponse(_)));
    }
}
