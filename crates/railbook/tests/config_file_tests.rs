// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Smoke tests for explicit `--config <path>` loading.

use std::fs;

use railbook_config::load_and_validate_path;

#[test]
fn explicit_config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("railbook.toml");
    fs::write(
        &path,
        r#"
[site]
timeout_secs = 200

[booking]
max_tickets = 4
form_schema = "v4"
"#,
    )
    .unwrap();

    let config = load_and_validate_path(&path).expect("config should load");
    assert_eq!(config.site.timeout_secs, 200);
    assert_eq!(config.booking.max_tickets, 4);
    assert_eq!(config.booking.form_schema, "v4");
    // Untouched sections keep their defaults.
    assert_eq!(config.ocr.timeout_secs, 120);
}

#[test]
fn invalid_config_file_reports_all_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("railbook.toml");
    let toml_body = toml::toml! {
        [agent]
        log_level = "loud"

        [booking]
        max_form_retries = 0
    };
    fs::write(&path, toml_body.to_string()).unwrap();

    let errors = load_and_validate_path(&path).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
}
