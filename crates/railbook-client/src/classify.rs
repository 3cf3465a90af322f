// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response classification for form submissions.
//!
//! The site reports failures as localized error-panel text, which is
//! inherently fragile to match; the phrase tables live only here so
//! they can be updated without touching the state machine.

use tracing::debug;

use crate::markup::ParsedPage;

/// Error-panel phrases that end the whole run: sold out, and the travel
/// date outside the open booking window.
const UNAVAILABLE_PHRASES: [&str; 2] = ["售完", "選擇的日期超過目前開放預訂之日期"];

/// Phrase reported when the submitted captcha text was wrong.
const CAPTCHA_MISMATCH_PHRASE: &str = "檢測碼輸入錯誤";

/// Classification of a form-submission response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// The workflow advanced to the expected next page.
    Advance,
    /// The captcha text was rejected; refresh and retry.
    CaptchaMismatch,
    /// Sold out or booking window closed. Terminal.
    Unavailable(String),
    /// Any other remote-reported form error. Retryable within bounds.
    ValidationError(String),
}

/// Classifies a submission response against the expected landing URL.
pub fn classify(page: &ParsedPage, expected_url: &str) -> PageKind {
    if page.url == expected_url {
        return PageKind::Advance;
    }

    let panels = page.error_panels();
    debug!(url = %page.url, panels = panels.len(), "submission did not advance");

    for panel in &panels {
        if UNAVAILABLE_PHRASES.iter().any(|p| panel.contains(p)) {
            return PageKind::Unavailable(panel.clone());
        }
    }
    for panel in &panels {
        if panel.contains(CAPTCHA_MISMATCH_PHRASE) {
            return PageKind::CaptchaMismatch;
        }
    }
    // The mismatch notice is not always rendered inside a feedback panel.
    if page.contains(CAPTCHA_MISMATCH_PHRASE) {
        return PageKind::CaptchaMismatch;
    }

    PageKind::ValidationError(
        panels
            .first()
            .cloned()
            .unwrap_or_else(|| "submission rejected without an error panel".to_string()),
    )
}
