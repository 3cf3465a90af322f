// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Railbook booking agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject
//! unrecognized config keys at startup with an actionable error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Railbook configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to the
/// values the public booking site currently expects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RailbookConfig {
    /// Agent behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Remote booking site settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Captcha recognition backend settings.
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Booking workflow settings.
    #[serde(default)]
    pub booking: BookingConfig,

    /// Station name to form id. Defaults to the twelve stations of the line.
    #[serde(default = "default_stations")]
    pub stations: BTreeMap<String, u8>,
}

impl Default for RailbookConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            site: SiteConfig::default(),
            ocr: OcrConfig::default(),
            booking: BookingConfig::default(),
            stations: default_stations(),
        }
    }
}

fn default_stations() -> BTreeMap<String, u8> {
    railbook_codec::stations::default_table()
}

/// Agent behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Remote booking site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Base URL of the booking site.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_site_timeout")]
    pub timeout_secs: u64,

    /// Optional proxy URL for all site traffic.
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_site_timeout(),
            proxy: None,
        }
    }
}

fn default_base_url() -> String {
    "https://irs.thsrc.com.tw".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/116.0.0.0 Safari/537.36"
        .to_string()
}

fn default_site_timeout() -> u64 {
    120
}

/// Captcha recognition backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OcrConfig {
    /// Recognition endpoint receiving the challenge image.
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ocr_endpoint(),
            timeout_secs: default_ocr_timeout(),
        }
    }
}

fn default_ocr_endpoint() -> String {
    "https://ocr.holey.cc/thsrc".to_string()
}

fn default_ocr_timeout() -> u64 {
    120
}

/// Booking workflow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Maximum tickets per reservation, as enforced by the site.
    #[serde(default = "default_max_tickets")]
    pub max_tickets: u32,

    /// Bounded retry budget for captcha mismatches.
    #[serde(default = "default_retries")]
    pub max_captcha_retries: u32,

    /// Bounded retry budget per recoverable failure kind (transport,
    /// remote validation, recognition).
    #[serde(default = "default_retries")]
    pub max_form_retries: u32,

    /// Active form-schema revision ("v4" or "v5").
    #[serde(default = "default_form_schema")]
    pub form_schema: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_tickets: default_max_tickets(),
            max_captcha_retries: default_retries(),
            max_form_retries: default_retries(),
            form_schema: default_form_schema(),
        }
    }
}

fn default_max_tickets() -> u32 {
    10
}

fn default_retries() -> u32 {
    5
}

fn default_form_schema() -> String {
    "v5".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_twelve_stations() {
        let config = RailbookConfig::default();
        assert_eq!(config.stations.len(), 12);
        assert_eq!(config.stations.get("Taipei"), Some(&2));
        assert_eq!(config.stations.get("Zuoying"), Some(&12));
    }

    #[test]
    fn toml_overrides_merge_over_defaults() {
        let toml_str = r#"
[booking]
max_tickets = 4

[site]
timeout_secs = 200
"#;
        let config: RailbookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.booking.max_tickets, 4);
        assert_eq!(config.booking.max_captcha_retries, 5);
        assert_eq!(config.site.timeout_secs, 200);
        assert_eq!(config.site.base_url, "https://irs.thsrc.com.tw");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[booking]
max_tikets = 4
"#;
        assert!(toml::from_str::<RailbookConfig>(toml_str).is_err());
    }
}
