//! # HTTP Narrative Client
//!
//! Talks to the generation endpoint over JSON.
//!
//! ## Exchange
//! ```text
//! POST {endpoint}
//! Authorization: Bearer {api_token}          (only when configured)
//! {
//!   "model":   "stockroom-analyst",
//!   "task":    "inventory_analysis" | "pricing_suggestion" | "sales_analysis",
//!   "payload": { ...InventoryRequest | PricingRequest | SalesRequest... }
//! }
//!
//! 200 OK
//! { "text": "```json\n{ ...InventoryAnalysis... }\n```" }
//! ```
//!
//! The model's text usually wraps the JSON object in a Markdown code fence;
//! [`extract_json`] strips it before parsing.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::NarrativeConfig;
use crate::contract::{
    InventoryAnalysis, InventoryRequest, NarrativeTask, PricingRequest, PricingSuggestion,
    SalesAnalysis, SalesRequest,
};
use crate::error::{NarrativeError, NarrativeResult};
use crate::service::NarrativeService;

#[derive(Serialize)]
struct GenerationEnvelope<'a, P: Serialize> {
    model: &'a str,
    task: NarrativeTask,
    payload: &'a P,
}

#[derive(Deserialize)]
struct GenerationReply {
    text: String,
}

/// [`NarrativeService`] backed by the configured HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpNarrativeClient {
    http: reqwest::Client,
    config: NarrativeConfig,
}

impl HttpNarrativeClient {
    pub fn new(config: NarrativeConfig) -> NarrativeResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(HttpNarrativeClient { http, config })
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    async fn generate<P, R>(&self, task: NarrativeTask, payload: &P) -> NarrativeResult<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let started = Instant::now();

        let mut request = self.http.post(&self.config.endpoint).json(&GenerationEnvelope {
            model: &self.config.model,
            task,
            payload,
        });
        if let Some(token) = &self.config.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                NarrativeError::Timeout(self.config.timeout_secs)
            } else {
                e.into()
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NarrativeError::GenerationFailed(format!(
                "{} request returned {}",
                task, status
            )));
        }

        let reply: GenerationReply = response.json().await?;
        debug!(
            %task,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = reply.text.len(),
            "Narrative generated"
        );

        parse_generated(&reply.text)
    }
}

#[async_trait]
impl NarrativeService for HttpNarrativeClient {
    async fn analyze_inventory(&self, request: &InventoryRequest) -> NarrativeResult<InventoryAnalysis> {
        self.generate(NarrativeTask::InventoryAnalysis, request).await
    }

    async fn suggest_pricing(&self, request: &PricingRequest) -> NarrativeResult<PricingSuggestion> {
        let mut suggestion: PricingSuggestion =
            self.generate(NarrativeTask::PricingSuggestion, request).await?;
        suggestion.current_price = request.current_price;
        Ok(suggestion)
    }

    async fn analyze_sales(&self, request: &SalesRequest) -> NarrativeResult<SalesAnalysis> {
        self.generate(NarrativeTask::SalesAnalysis, request).await
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

/// Returns the JSON object inside generated text.
///
/// Strips a surrounding ```` ```json ```` / ```` ``` ```` fence and any prose
/// before the first `{` or after the last `}`.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| {
            let rest = rest.trim_end();
            rest.strip_suffix("```").unwrap_or(rest)
        })
        .unwrap_or(trimmed)
        .trim();

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}

/// Parses generated text into a contract type.
pub fn parse_generated<R: DeserializeOwned>(text: &str) -> NarrativeResult<R> {
    let json = extract_json(text);
    if json.is_empty() {
        return Err(NarrativeError::MalformedResponse("empty response".to_string()));
    }
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_fence() {
        let text = "```json\n{\"summary\": \"ok\"}\n```";
        assert_eq!(extract_json(text), "{\"summary\": \"ok\"}");

        let text = "```\n{\"a\": 1}\n```\n";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_with_prose() {
        let text = "Here is the analysis:\n{\"a\": {\"b\": 2}}\nHope it helps.";
        assert_eq!(extract_json(text), "{\"a\": {\"b\": 2}}");
        assert_eq!(extract_json("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_generated() {
        let analysis: InventoryAnalysis =
            parse_generated("```json\n{\"summary\": \"Stock is fine\"}\n```").unwrap();
        assert_eq!(analysis.summary, "Stock is fine");
        assert!(analysis.alerts.is_empty());

        let err = parse_generated::<InventoryAnalysis>("I cannot help with that").unwrap_err();
        assert!(matches!(err, NarrativeError::MalformedResponse(_)));

        let err = parse_generated::<InventoryAnalysis>("   ").unwrap_err();
        assert!(matches!(err, NarrativeError::MalformedResponse(_)));
    }

    #[test]
    fn test_envelope_shape() {
        let payload = serde_json::json!({"today": "2025-01-16"});
        let envelope = GenerationEnvelope {
            model: "stockroom-analyst",
            task: NarrativeTask::SalesAnalysis,
            payload: &payload,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["task"], "sales_analysis");
        assert_eq!(value["payload"]["today"], "2025-01-16");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails() {
        let client = HttpNarrativeClient::new(NarrativeConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9/generate".to_string(),
            timeout_secs: 2,
            ..NarrativeConfig::default()
        })
        .unwrap();

        let request = SalesRequest::new(&[], chrono::NaiveDate::from_ymd_opt(2025, 1, 16).unwrap());
        assert!(client.analyze_sales(&request).await.is_err());
    }
}
