// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as recognized log levels, sane retry bounds, and a
//! coherent station table.

use std::collections::HashSet;
use std::str::FromStr;

use railbook_codec::SchemaVersion;

use crate::diagnostic::ConfigError;
use crate::model::RailbookConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &RailbookConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for (key, url) in [
        ("site.base_url", &config.site.base_url),
        ("ocr.endpoint", &config.ocr.endpoint),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{url}` must be an http(s) URL"),
            });
        }
    }

    if let Some(proxy) = &config.site.proxy
        && proxy.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "site.proxy must not be empty when set".to_string(),
        });
    }

    for (key, secs) in [
        ("site.timeout_secs", config.site.timeout_secs),
        ("ocr.timeout_secs", config.ocr.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be at least 1"),
            });
        }
    }

    if config.booking.max_tickets == 0 || config.booking.max_tickets > 10 {
        errors.push(ConfigError::Validation {
            message: format!(
                "booking.max_tickets must be in 1..=10, got {}",
                config.booking.max_tickets
            ),
        });
    }

    for (key, bound) in [
        ("booking.max_captcha_retries", config.booking.max_captcha_retries),
        ("booking.max_form_retries", config.booking.max_form_retries),
    ] {
        if bound == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be at least 1"),
            });
        }
    }

    if SchemaVersion::from_str(&config.booking.form_schema).is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "booking.form_schema `{}` is not a known revision (v4, v5)",
                config.booking.form_schema
            ),
        });
    }

    if config.stations.is_empty() {
        errors.push(ConfigError::Validation {
            message: "stations table must not be empty".to_string(),
        });
    }

    let mut seen_ids = HashSet::new();
    for (name, id) in &config.stations {
        if *id < 1 || *id > 12 {
            errors.push(ConfigError::Validation {
                message: format!("stations.{name} id {id} outside 1..=12"),
            });
        }
        if !seen_ids.insert(id) {
            errors.push(ConfigError::Validation {
                message: format!("stations.{name} duplicates id {id}"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
