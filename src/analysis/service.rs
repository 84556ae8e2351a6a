use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::extractor::{JsonBlockExtractor, StructuredExtractor};

/// At most this many added/removed lines are embedded in the prompt.
const MAX_PROMPT_LINES: usize = 20;

const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Natural-language reading of a detected change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub summary: String,
    pub intent: String,
    pub suggestions: Vec<String>,
}

impl AiAnalysis {
    /// Fixed result used whenever the external model is unavailable or
    /// returns something unparseable. The pipeline always has a
    /// displayable analysis when changes exist.
    pub fn fallback() -> Self {
        Self {
            summary: "Changes were detected, but the detailed analysis failed.".to_string(),
            intent: "The intent could not be analyzed.".to_string(),
            suggestions: vec!["Check the competitor site directly.".to_string()],
        }
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("analysis endpoint returned non-success status: {0}")]
    Status(StatusCode),
    #[error("model response contained no text")]
    EmptyResponse,
    #[error("no structured payload found in model response")]
    MissingPayload,
    #[error("failed to parse structured payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Analysis port. Implementations never fail; any upstream problem is
/// absorbed into the fallback result.
#[async_trait]
pub trait DiffAnalyzer: Send + Sync {
    async fn analyze(&self, site_name: &str, added: &[String], removed: &[String]) -> AiAnalysis;
}

// Request/response shapes of the generateContent API, reduced to the
// fields we touch.

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for a Gemini-style text completion endpoint.
pub struct GeminiAnalyzer {
    client: Client,
    endpoint: String,
    api_key: String,
    extractor: Box<dyn StructuredExtractor>,
}

impl GeminiAnalyzer {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            extractor: Box::new(JsonBlockExtractor),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn StructuredExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    fn build_prompt(site_name: &str, added: &[String], removed: &[String]) -> String {
        let added_block = added
            .iter()
            .take(MAX_PROMPT_LINES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        let removed_block = removed
            .iter()
            .take(MAX_PROMPT_LINES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a web marketing expert.

Below are changes detected on the competitor site "{site_name}".

[Added content]
{added_block}

[Removed content]
{removed_block}

Analyze the following three things:

1. Summary of the changes (at most 3 bullet points)
   - What changed, concisely, with minimal jargon

2. The likely marketing intent behind the changes
   - Why the competitor probably made them, in 1-2 sentences

3. Actions we should take (at most 3)
   - Concrete steps, prioritizing what can be done immediately

Respond with JSON in this exact shape:
{{
  "summary": "change 1\nchange 2\nchange 3",
  "intent": "inferred intent",
  "suggestions": ["action 1", "action 2", "action 3"]
}}"#
        )
    }

    async fn request_analysis(
        &self,
        site_name: &str,
        added: &[String],
        removed: &[String],
    ) -> Result<AiAnalysis, AnalysisError> {
        let prompt = Self::build_prompt(site_name, added, removed);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .timeout(ANALYSIS_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        let payload = self
            .extractor
            .extract(text)
            .ok_or(AnalysisError::MissingPayload)?;

        Ok(serde_json::from_str(payload)?)
    }
}

#[async_trait]
impl DiffAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, site_name: &str, added: &[String], removed: &[String]) -> AiAnalysis {
        match self.request_analysis(site_name, added, removed).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(site_name, error = %e, "analysis failed, using fallback result");
                AiAnalysis::fallback()
            }
        }
    }
}
