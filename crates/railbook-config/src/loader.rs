// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./railbook.toml` > `~/.config/railbook/railbook.toml`
//! > `/etc/railbook/railbook.toml` with environment variable overrides
//! via the `RAILBOOK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RailbookConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/railbook/railbook.toml` (system-wide)
/// 3. `~/.config/railbook/railbook.toml` (user XDG config)
/// 4. `./railbook.toml` (local directory)
/// 5. `RAILBOOK_*` environment variables
pub fn load_config() -> Result<RailbookConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<RailbookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RailbookConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RailbookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RailbookConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RailbookConfig::default()))
        .merge(Toml::file("/etc/railbook/railbook.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("railbook/railbook.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("railbook.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that key names
/// containing underscores stay intact: `RAILBOOK_BOOKING_MAX_TICKETS`
/// must map to `booking.max_tickets`, not `booking.max.tickets`.
fn env_provider() -> Env {
    Env::prefixed("RAILBOOK_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("site_", "site.", 1)
            .replacen("ocr_", "ocr.", 1)
            .replacen("booking_", "booking.", 1)
            .replacen("stations_", "stations.", 1);
        mapped.into()
    })
}
