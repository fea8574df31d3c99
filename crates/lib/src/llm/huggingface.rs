//! Hugging Face Inference API client (POST {base}/{model} with `{"inputs": prompt}`).
//!
//! Providers answer in several shapes; [`InferencePayload`] decodes them in a fixed
//! precedence order. The public entry point never fails: any error is logged and
//! replaced with [`INFERENCE_ERROR_REPLY`].

use crate::config::InferenceConfig;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Reply used for every failed inference call.
pub const INFERENCE_ERROR_REPLY: &str = "⚠️ Error getting AI reply.";

/// Longest fallback rendering of an unrecognized payload, in characters.
const RAW_PAYLOAD_LIMIT: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("inference api error: {0} {1}")]
    Api(reqwest::StatusCode, String),
}

/// Decoded inference response, variants in precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum InferencePayload {
    /// `[{"generated_text": "..."}, ...]` with a non-empty first text.
    Sequence(String),
    /// `{"generated_text": "..."}` with a non-empty text.
    Object(String),
    /// A bare JSON string (or a body that is not JSON at all).
    Text(String),
    /// Anything else.
    Other(Value),
}

fn generated_text(value: &Value) -> Option<&str> {
    value
        .get("generated_text")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl InferencePayload {
    pub fn decode(value: Value) -> Self {
        if let Some(text) = value
            .as_array()
            .and_then(|items| items.first())
            .and_then(generated_text)
        {
            return Self::Sequence(text.to_string());
        }
        if let Some(text) = value.as_object().and_then(|_| generated_text(&value)) {
            return Self::Object(text.to_string());
        }
        match value {
            Value::String(s) => Self::Text(s),
            other => Self::Other(other),
        }
    }

    /// Decode a raw response body. Bodies that are not JSON are taken verbatim as text.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::decode(value),
            Err(_) => Self::Text(body.to_string()),
        }
    }

    /// Display string: the generated text, or the compact JSON cut to 2000 characters.
    pub fn into_text(self) -> String {
        match self {
            Self::Sequence(s) | Self::Object(s) | Self::Text(s) => s,
            Self::Other(value) => value.to_string().chars().take(RAW_PAYLOAD_LIMIT).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Client for one configured Hugging Face model.
#[derive(Clone)]
pub struct InferenceClient {
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Self {
        let endpoint = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.model.trim_matches('/')
        );
        Self {
            endpoint,
            token: config.token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            client: reqwest::Client::new(),
        }
    }

    /// Full model endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the prompt and decode the reply.
    pub async fn try_generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&InferenceRequest { inputs: prompt });
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(InferenceError::Api(status, body));
        }
        let body = res.text().await?;
        Ok(InferencePayload::from_body(&body).into_text())
    }

    /// Generated text for `prompt`, or [`INFERENCE_ERROR_REPLY`] on any failure.
    pub async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("inference: {}", e);
                INFERENCE_ERROR_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer, token: Option<&str>, timeout_secs: u64) -> InferenceClient {
        InferenceClient::new(&InferenceConfig {
            token: token.map(str::to_string),
            model: "org/model".to_string(),
            base_url: server.base_url(),
            timeout_secs,
        })
    }

    #[test]
    fn sequence_wins_over_other_shapes() {
        let payload = InferencePayload::decode(json!([{ "generated_text": "X" }, { "generated_text": "Z" }]));
        assert_eq!(payload, InferencePayload::Sequence("X".to_string()));
        assert_eq!(payload.into_text(), "X");
    }

    #[test]
    fn object_with_text() {
        let payload = InferencePayload::decode(json!({ "generated_text": "hello", "score": 1 }));
        assert_eq!(payload, InferencePayload::Object("hello".to_string()));
    }

    #[test]
    fn bare_string_is_verbatim() {
        assert_eq!(InferencePayload::decode(json!("Y")).into_text(), "Y");
        assert_eq!(
            InferencePayload::from_body("plain text, not json").into_text(),
            "plain text, not json"
        );
    }

    #[test]
    fn empty_generated_text_falls_through_to_json() {
        let payload = InferencePayload::decode(json!([{ "generated_text": "" }]));
        assert_eq!(payload.into_text(), r#"[{"generated_text":""}]"#);
    }

    #[test]
    fn unknown_shape_is_serialized_and_capped() {
        let long = "a".repeat(5000);
        let text = InferencePayload::decode(json!({ "error": long })).into_text();
        assert_eq!(text.chars().count(), 2000);
        assert!(text.starts_with(r#"{"error":"aaa"#));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let c = InferenceClient::new(&InferenceConfig {
            base_url: "https://example.test/models/".to_string(),
            ..InferenceConfig::default()
        });
        assert_eq!(c.endpoint(), "https://example.test/models/google/flan-t5-large");
    }

    #[tokio::test]
    async fn generate_posts_prompt_with_bearer() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/org/model")
                .header("authorization", "Bearer hf-secret")
                .json_body(json!({ "inputs": "tell me a joke" }));
            then.status(200)
                .json_body(json!([{ "generated_text": "a joke" }]));
        });

        let reply = client(&server, Some("hf-secret"), 5)
            .generate("tell me a joke")
            .await;

        assert_eq!(reply, "a joke");
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn generate_returns_sentinel_on_http_error() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/org/model");
            then.status(503).body("model loading");
        });

        let c = client(&server, None, 5);
        let err = c.try_generate("hi").await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert_eq!(c.generate("hi").await, INFERENCE_ERROR_REPLY);
        mock.assert_calls(2);
    }

    #[tokio::test]
    async fn generate_returns_sentinel_on_timeout() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/org/model");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!("too late"));
        });

        let reply = client(&server, None, 1).generate("hi").await;
        assert_eq!(reply, INFERENCE_ERROR_REPLY);
    }
}
