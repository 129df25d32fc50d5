use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    TravelError,
    model::{GroundingChunk, GroundingSource, ProviderResponse},
    prompt::build_prompt,
};

use super::TravelProvider;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` with Google Search grounding enabled.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_key: String,
    model: String,
    endpoint: String,
    http: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            api_key,
            model,
            endpoint,
            http: Client::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderResponse> {
        let res = self
            .http
            .post(self.url())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&GcRequest::grounded(prompt))
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Gemini response body")?;

        decode_response(status, &body)
    }
}

#[derive(Debug, Serialize)]
struct GcPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GcContent<'a> {
    role: &'static str,
    parts: Vec<GcPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GcGoogleSearch {}

#[derive(Debug, Serialize)]
struct GcTool {
    google_search: GcGoogleSearch,
}

#[derive(Debug, Serialize)]
struct GcRequest<'a> {
    contents: Vec<GcContent<'a>>,
    tools: Vec<GcTool>,
}

impl<'a> GcRequest<'a> {
    fn grounded(prompt: &'a str) -> Self {
        Self {
            contents: vec![GcContent {
                role: "user",
                parts: vec![GcPart { text: prompt }],
            }],
            tools: vec![GcTool {
                google_search: GcGoogleSearch {},
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GcResponse {
    #[serde(default)]
    candidates: Vec<GcCandidate>,
    prompt_feedback: Option<GcPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GcCandidate {
    content: Option<GcCandidateContent>,
    grounding_metadata: Option<GcGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GcCandidateContent {
    #[serde(default)]
    parts: Vec<GcCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GcCandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GcGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GcGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GcGroundingChunk {
    web: Option<GcSource>,
    maps: Option<GcSource>,
}

#[derive(Debug, Deserialize)]
struct GcSource {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GcPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GcErrorEnvelope {
    error: GcError,
}

#[derive(Debug, Deserialize)]
struct GcError {
    message: String,
    status: Option<String>,
}

impl From<GcSource> for GroundingSource {
    fn from(source: GcSource) -> Self {
        Self {
            uri: source.uri,
            title: source.title,
        }
    }
}

impl GcGroundingChunk {
    fn into_chunk(self) -> Option<GroundingChunk> {
        match (self.web, self.maps) {
            (Some(web), _) => Some(GroundingChunk::Web(web.into())),
            (None, Some(maps)) => Some(GroundingChunk::Maps(maps.into())),
            (None, None) => None,
        }
    }
}

/// Turn a raw `generateContent` reply into text plus grounding chunks.
fn decode_response(status: StatusCode, body: &str) -> Result<ProviderResponse> {
    if !status.is_success() {
        let detail = match serde_json::from_str::<GcErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.status {
                Some(code) => format!("{code}: {}", envelope.error.message),
                None => envelope.error.message,
            },
            Err(_) => truncate_body(body),
        };
        return Err(anyhow!(
            "Gemini request failed with status {}: {}",
            status,
            detail
        ));
    }

    let parsed: GcResponse =
        serde_json::from_str(body).context("Failed to parse Gemini response JSON")?;

    let block_reason = parsed
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let candidate = parsed.candidates.into_iter().next();

    let text: String = candidate
        .as_ref()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(match block_reason {
            Some(reason) => anyhow!("Gemini blocked the request ({reason})."),
            None => anyhow!("Received an empty response from the API."),
        });
    }

    let grounding_chunks = candidate
        .and_then(|c| c.grounding_metadata)
        .map(|meta| {
            meta.grounding_chunks
                .into_iter()
                .filter_map(GcGroundingChunk::into_chunk)
                .collect()
        })
        .unwrap_or_default();

    Ok(ProviderResponse {
        text,
        grounding_chunks,
    })
}

#[async_trait]
impl TravelProvider for GeminiProvider {
    async fn fetch(&self, location: &str) -> Result<ProviderResponse, TravelError> {
        let prompt = build_prompt(location);
        debug!(model = %self.model, location, "requesting travel brief");

        match self.generate(&prompt).await {
            Ok(response) => {
                debug!(
                    chars = response.text.len(),
                    sources = response.grounding_chunks.len(),
                    "received travel brief"
                );
                Ok(response)
            }
            Err(err) => {
                warn!("Error fetching travel info: {err:#}");
                Err(TravelError::from_fetch_chain(&err))
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUNDED_REPLY: &str = r##"{
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "# Weather\n- **Temperature:** 21°C\n"},
                    {"text": "# Air Quality Index (AQI)\n- **AQI Value:** 30\n"}
                ]
            },
            "groundingMetadata": {
                "webSearchQueries": ["paris weather"],
                "groundingChunks": [
                    {"web": {"uri": "https://weather.example/paris", "title": "weather.example"}},
                    {"maps": {"uri": "https://maps.example/1", "title": "Eiffel Tower"}},
                    {"retrievedContext": {"uri": "gs://bucket/doc"}}
                ]
            }
        }]
    }"##;

    #[test]
    fn request_enables_google_search() {
        let json = serde_json::to_value(GcRequest::grounded("hello")).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["tools"][0]["google_search"], serde_json::json!({}));
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let provider = GeminiProvider::new(
            "KEY".into(),
            DEFAULT_MODEL.into(),
            format!("{DEFAULT_ENDPOINT}/"),
        );

        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn decodes_text_and_grounding_chunks() {
        let response = decode_response(StatusCode::OK, GROUNDED_REPLY).unwrap();

        assert!(response.text.starts_with("# Weather"));
        assert!(response.text.contains("**AQI Value:** 30"));
        assert_eq!(
            response.grounding_chunks,
            vec![
                GroundingChunk::Web(GroundingSource {
                    uri: "https://weather.example/paris".into(),
                    title: "weather.example".into(),
                }),
                GroundingChunk::Maps(GroundingSource {
                    uri: "https://maps.example/1".into(),
                    title: "Eiffel Tower".into(),
                }),
            ]
        );
    }

    #[test]
    fn missing_grounding_metadata_yields_no_chunks() {
        let body = r##"{"candidates":[{"content":{"parts":[{"text":"# Weather"}]}}]}"##;
        let response = decode_response(StatusCode::OK, body).unwrap();

        assert_eq!(response.text, "# Weather");
        assert!(response.grounding_chunks.is_empty());
    }

    #[test]
    fn empty_text_is_a_failure() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#;
        let err = decode_response(StatusCode::OK, body).unwrap_err();
        assert!(err.to_string().contains("empty response"));

        let err = decode_response(StatusCode::OK, "{}").unwrap_err();
        assert!(err.to_string().contains("empty response"));
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let err = decode_response(StatusCode::OK, body).unwrap_err();

        assert!(err.to_string().contains("blocked"));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn error_envelope_is_surfaced() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let err = decode_response(StatusCode::BAD_REQUEST, body).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("INVALID_ARGUMENT: API key not valid."));
    }

    #[test]
    fn non_json_error_body_is_truncated() {
        let body = "x".repeat(500);
        let err = decode_response(StatusCode::BAD_GATEWAY, &body).unwrap_err();

        assert!(err.to_string().ends_with("..."));
        assert!(err.to_string().len() < 300);
    }

    #[test]
    fn invalid_json_is_a_failure() {
        let err = decode_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(err.to_string().contains("Failed to parse Gemini response JSON"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(250);
        let truncated = truncate_body(&body);

        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
    }
}
