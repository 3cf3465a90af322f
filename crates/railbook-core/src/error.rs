// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Railbook booking agent.

use thiserror::Error;

/// The primary error type used across the Railbook workspace.
///
/// Variants divide into retryable kinds (transport hiccups, captcha
/// mismatches, remote-reported validation errors, recognition backend
/// failures) and terminal kinds (no availability, markup contract
/// breaks). The orchestrator consults [`RailbookError::retryable`] and
/// owns the bounded attempt counters; nothing below it loops.
#[derive(Debug, Error)]
pub enum RailbookError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-level failures: connection errors, timeouts, non-success
    /// HTTP status with no parseable page.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote site rejected the submitted captcha text.
    #[error("captcha text rejected by the booking site")]
    CaptchaMismatch,

    /// Captcha recognition backend failure (transport or non-success response).
    #[error("captcha recognition failed: {message}")]
    Recognition {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A form error reported by the remote site, or a locally rejected
    /// field value (e.g. ticket total over the configured maximum).
    #[error("validation error: {0}")]
    Validation(String),

    /// Sold out, booking window closed, or no trains listed. Terminal.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// An expected markup anchor is missing from a response page.
    /// Terminal: the remote form revision has changed.
    #[error("markup parse error: {0}")]
    Parse(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RailbookError {
    /// Whether the orchestrator may retry after this error, subject to
    /// its bounded attempt budget for the kind.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            RailbookError::Transport { .. }
                | RailbookError::CaptchaMismatch
                | RailbookError::Recognition { .. }
                | RailbookError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_partition_matches_taxonomy() {
        assert!(RailbookError::CaptchaMismatch.retryable());
        assert!(
            RailbookError::Transport {
                message: "timed out".into(),
                source: None,
            }
            .retryable()
        );
        assert!(
            RailbookError::Recognition {
                message: "backend 500".into(),
                source: None,
            }
            .retryable()
        );
        assert!(RailbookError::Validation("bad field".into()).retryable());

        assert!(!RailbookError::Unavailable("sold out".into()).retryable());
        assert!(!RailbookError::Parse("missing anchor".into()).retryable());
        assert!(!RailbookError::Config("bad toml".into()).retryable());
        assert!(!RailbookError::Internal("oops".into()).retryable());
    }
}
