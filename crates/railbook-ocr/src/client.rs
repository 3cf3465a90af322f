// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the captcha recognition backend.
//!
//! Provides [`OcrClient`], which ships challenge image bytes to the
//! backend as unpadded base64url and returns the recognized text.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use railbook_core::{CaptchaResolver, RailbookError};
use tracing::debug;

use crate::types::{OcrRequest, OcrResponse};

/// Captcha recognition client.
///
/// The backend is an opaque oracle: image bytes in, text out. Every
/// failure maps to [`RailbookError::Recognition`], which the
/// orchestrator retries within its bounded budget.
#[derive(Debug, Clone)]
pub struct OcrClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OcrClient {
    /// Creates a new recognition client against the given endpoint.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, RailbookError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RailbookError::Recognition {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, endpoint })
    }

    /// Overrides the endpoint (for testing with wiremock).
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl CaptchaResolver for OcrClient {
    fn name(&self) -> &str {
        "http-ocr"
    }

    async fn resolve(&self, image: &[u8]) -> Result<String, RailbookError> {
        let payload = OcrRequest {
            base64_str: URL_SAFE_NO_PAD.encode(image),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RailbookError::Recognition {
                message: format!("recognition request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RailbookError::Recognition {
                message: format!("recognition backend returned {status}: {body}"),
                source: None,
            });
        }

        let body: OcrResponse =
            response.json().await.map_err(|e| RailbookError::Recognition {
                message: format!("failed to parse recognition response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let text = body.data.trim().to_string();
        if text.is_empty() {
            return Err(RailbookError::Recognition {
                message: "recognition backend returned empty text".into(),
                source: None,
            });
        }

        debug!(text = %text, "captcha recognized");
        Ok(text)
    }
}
