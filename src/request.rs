//! Request body interpretation
//!
//! A conversion request is either raw HTML or a JSON envelope
//! `{"html": "...", "options": {...}}`. The shape is decided once from the
//! `Content-Type` header.

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::options::OptionsPatch;

/// A decoded conversion request
#[derive(Debug)]
pub enum RenderRequest {
    /// The request body is the document itself
    Raw { html: Bytes },
    /// JSON envelope with optional per-request options
    Json {
        html: Bytes,
        options: Option<OptionsPatch>,
    },
}

#[derive(Deserialize)]
struct JsonEnvelope {
    html: Option<serde_json::Value>,
    #[serde(default)]
    options: Option<serde_json::Value>,
}

impl RenderRequest {
    pub fn from_parts(headers: &HeaderMap, body: Bytes) -> Result<Self> {
        if is_json(headers) {
            Self::from_json(&body)
        } else {
            if body.is_empty() {
                return Err(AppError::BadRequest("No HTML content provided".to_string()));
            }
            Ok(RenderRequest::Raw { html: body })
        }
    }

    fn from_json(body: &[u8]) -> Result<Self> {
        let envelope: JsonEnvelope = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

        let html = match envelope.html {
            Some(serde_json::Value::String(html)) => html,
            Some(_) => {
                return Err(AppError::BadRequest("'html' must be a string".to_string()));
            }
            None => {
                return Err(AppError::BadRequest("Missing 'html' field".to_string()));
            }
        };
        if html.is_empty() {
            return Err(AppError::BadRequest("No HTML content provided".to_string()));
        }

        let options = match envelope.options {
            None | Some(serde_json::Value::Null) => None,
            Some(value @ serde_json::Value::Object(_)) => Some(
                serde_json::from_value::<OptionsPatch>(value)
                    .map_err(|e| AppError::BadRequest(format!("Invalid options: {}", e)))?,
            ),
            Some(_) => {
                return Err(AppError::BadRequest("'options' must be an object".to_string()));
            }
        };

        Ok(RenderRequest::Json {
            html: Bytes::from(html),
            options,
        })
    }

    pub fn options(&self) -> Option<&OptionsPatch> {
        match self {
            RenderRequest::Raw { .. } => None,
            RenderRequest::Json { options, .. } => options.as_ref(),
        }
    }

    pub fn into_html(self) -> Bytes {
        match self {
            RenderRequest::Raw { html } | RenderRequest::Json { html, .. } => html,
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_raw_body() {
        let req = RenderRequest::from_parts(&headers("text/html"), Bytes::from("<h1>Hi</h1>")).unwrap();
        assert!(matches!(req, RenderRequest::Raw { .. }));
        assert!(req.options().is_none());
        assert_eq!(req.into_html().as_ref(), b"<h1>Hi</h1>");
    }

    #[test]
    fn test_raw_without_content_type() {
        let req = RenderRequest::from_parts(&HeaderMap::new(), Bytes::from("<p>x</p>")).unwrap();
        assert!(matches!(req, RenderRequest::Raw { .. }));
    }

    #[test]
    fn test_empty_raw_body_rejected() {
        let err = RenderRequest::from_parts(&headers("text/html"), Bytes::new()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_json_envelope() {
        let body = r#"{"html": "<p>doc</p>", "options": {"margin-top": "10mm", "extra": 1}}"#;
        let req = RenderRequest::from_parts(
            &headers("Application/JSON; charset=utf-8"),
            Bytes::from(body),
        )
        .unwrap();

        let options = req.options().unwrap();
        assert!(options.margin_top.is_some());
        assert!(options.page_size.is_none());
        assert_eq!(req.into_html().as_ref(), b"<p>doc</p>");
    }

    #[test]
    fn test_json_without_options() {
        let req = RenderRequest::from_parts(&headers("application/json"), Bytes::from(r#"{"html":"x"}"#)).unwrap();
        assert!(matches!(req, RenderRequest::Json { options: None, .. }));
    }

    #[test]
    fn test_json_errors() {
        let json = headers("application/json");
        for body in [
            r#"{"options": {}}"#,
            r#"{"html": ""}"#,
            r#"{"html": 42}"#,
            r#"{"html": "x", "options": "A4"}"#,
            r#"{"html": "x", "options": {"background": [1]}}"#,
            "not json",
            "",
        ] {
            let err = RenderRequest::from_parts(&json, Bytes::from(body)).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "body {:?} gave {:?}", body, err);
        }
    }

    #[test]
    fn test_json_as_raw_when_not_declared() {
        // Without the JSON content type the envelope is just markup
        let body = r#"{"html":"x"}"#;
        let req = RenderRequest::from_parts(&headers("text/plain"), Bytes::from(body)).unwrap();
        assert_eq!(req.into_html().as_ref(), body.as_bytes());
    }
}
