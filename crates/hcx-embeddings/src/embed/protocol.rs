//! Wire format of the CLOVA Studio embedding endpoint
//!
//! Request: `POST {base}/{stage}/v1/api-tools/embedding/{model}/{app_id}` with
//! body `{"text": "..."}`.
//!
//! Response: `{"status": {"code": "20000", "message": "OK"},
//! "result": {"embedding": [...], "inputTokens": 4}}`. Errors reuse the same
//! envelope with a non-`20000` code and no `result`.

use crate::error::{HcxError, Result};
use serde::{Deserialize, Serialize};

pub const API_KEY_HEADER: &str = "X-NCP-CLOVASTUDIO-API-KEY";
pub const APIGW_KEY_HEADER: &str = "X-NCP-APIGW-API-KEY";

/// Vendor status code for a successful call
pub const SUCCESS_CODE: &str = "20000";

/// Longest body excerpt carried in an error message
const MAX_BODY_EXCERPT: usize = 512;

#[derive(Debug, Serialize)]
pub(crate) struct EmbedRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: Status,
    #[serde(default)]
    result: Option<EmbedResult>,
}

#[derive(Debug, Deserialize)]
struct Status {
    code: serde_json::Value,
    #[serde(default)]
    message: String,
}

impl Status {
    // Code may arrive as a JSON string or a bare number.
    fn code(&self) -> String {
        match &self.code {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmbedResult {
    embedding: Vec<f32>,
}

/// Reject inputs the endpoint cannot embed, before any request is sent.
/// Whitespace-only text is still sent.
pub(crate) fn validate_text(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(HcxError::InvalidInput(
            "cannot embed empty text".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_batch(texts: &[String]) -> Result<()> {
    if texts.is_empty() {
        return Err(HcxError::InvalidInput(
            "cannot embed an empty batch".to_string(),
        ));
    }
    for (idx, text) in texts.iter().enumerate() {
        validate_text(text)
            .map_err(|_| HcxError::InvalidInput(format!("text at index {} is empty", idx)))?;
    }
    Ok(())
}

/// Turn an HTTP status and raw body into an embedding of `expected_dims` floats
pub(crate) fn parse_response(status: u16, body: &str, expected_dims: usize) -> Result<Vec<f32>> {
    let http_ok = (200..300).contains(&status);

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if http_ok => {
            return Err(HcxError::remote(
                status,
                None,
                format!("malformed response body: {}", e),
            ))
        }
        Err(_) => return Err(HcxError::remote(status, None, excerpt(body))),
    };

    let code = envelope.status.code();
    if !http_ok || code != SUCCESS_CODE {
        let message = if envelope.status.message.is_empty() {
            excerpt(body)
        } else {
            envelope.status.message
        };
        return Err(HcxError::remote(status, Some(code), message));
    }

    let embedding = envelope
        .result
        .map(|r| r.embedding)
        .ok_or_else(|| HcxError::remote(status, Some(code.clone()), "response has no result"))?;

    if embedding.len() != expected_dims {
        return Err(HcxError::remote(
            status,
            Some(code),
            format!(
                "expected {}-dimensional embedding, got {}",
                expected_dims,
                embedding.len()
            ),
        ));
    }

    Ok(embedding)
}

fn excerpt(body: &str) -> String {
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
