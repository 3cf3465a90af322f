// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Railbook configuration system.

use railbook_config::diagnostic::suggest_key;
use railbook_config::{load_and_validate_str, load_config_from_str, ConfigError};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_railbook_config() {
    let toml = r#"
[agent]
log_level = "debug"

[site]
base_url = "https://booking.example.test"
user_agent = "test-agent/1.0"
timeout_secs = 150
proxy = "http://127.0.0.1:8080"

[ocr]
endpoint = "https://ocr.example.test/solve"
timeout_secs = 30

[booking]
max_tickets = 6
max_captcha_retries = 3
max_form_retries = 4
form_schema = "v4"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.site.base_url, "https://booking.example.test");
    assert_eq!(config.site.user_agent, "test-agent/1.0");
    assert_eq!(config.site.timeout_secs, 150);
    assert_eq!(config.site.proxy.as_deref(), Some("http://127.0.0.1:8080"));
    assert_eq!(config.ocr.endpoint, "https://ocr.example.test/solve");
    assert_eq!(config.ocr.timeout_secs, 30);
    assert_eq!(config.booking.max_tickets, 6);
    assert_eq!(config.booking.max_captcha_retries, 3);
    assert_eq!(config.booking.max_form_retries, 4);
    assert_eq!(config.booking.form_schema, "v4");
    // Station defaults are carried even with no [stations] section.
    assert_eq!(config.stations.get("Nangang"), Some(&1));
}

/// Unknown field in a section produces an UnknownField error.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[booking]
max_tikets = 4
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_tikets"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.site.base_url, "https://irs.thsrc.com.tw");
    assert_eq!(config.site.timeout_secs, 120);
    assert!(config.site.proxy.is_none());
    assert_eq!(config.booking.max_tickets, 10);
    assert_eq!(config.booking.max_captcha_retries, 5);
    assert_eq!(config.booking.form_schema, "v5");
    assert_eq!(config.stations.len(), 12);
}

/// Environment variables override TOML values.
#[test]
fn env_var_overrides_toml() {
    use figment::providers::{Format, Serialized, Toml};
    use figment::Figment;
    use railbook_config::RailbookConfig;

    figment::Jail::expect_with(|jail| {
        jail.set_env("RAILBOOK_BOOKING_MAX_TICKETS", "3");
        jail.set_env("RAILBOOK_SITE_TIMEOUT_SECS", "90");

        let config: RailbookConfig = Figment::new()
            .merge(Serialized::defaults(RailbookConfig::default()))
            .merge(Toml::string("[booking]\nmax_tickets = 8"))
            .merge(
                figment::providers::Env::prefixed("RAILBOOK_").map(|key| {
                    key.as_str()
                        .replacen("site_", "site.", 1)
                        .replacen("booking_", "booking.", 1)
                        .into()
                }),
            )
            .extract()?;

        assert_eq!(config.booking.max_tickets, 3);
        assert_eq!(config.site.timeout_secs, 90);
        Ok(())
    });
}

/// Validation failures surface as ConfigError::Validation.
#[test]
fn semantic_validation_failures_are_collected() {
    let toml = r#"
[agent]
log_level = "loud"

[booking]
max_captcha_retries = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.len() >= 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// Typo suggestions surface the closest valid key.
#[test]
fn typo_suggestion_points_at_closest_key() {
    let valid = &["max_tickets", "max_captcha_retries", "max_form_retries"];
    assert_eq!(
        suggest_key("max_form_retris", valid),
        Some("max_form_retries".to_string())
    );
}
