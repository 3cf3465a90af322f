// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Captcha recognition collaborator contract.

use async_trait::async_trait;

use crate::error::RailbookError;

/// Turns a captcha challenge image into text.
///
/// The backend is treated as untrusted and unreliable: failures and
/// malformed text are expected, surface as
/// [`RailbookError::Recognition`], and are retried by the orchestrator
/// up to its bounded attempt budget.
#[async_trait]
pub trait CaptchaResolver: Send + Sync {
    /// Human-readable name of this resolver, for logs.
    fn name(&self) -> &str;

    /// Recognizes the text in the given challenge image bytes.
    async fn resolve(&self, image: &[u8]) -> Result<String, RailbookError>;
}
