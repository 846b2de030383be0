// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./prospecta.toml` >
//! `~/.config/prospecta/prospecta.toml` > `/etc/prospecta/prospecta.toml`
//! with environment variable overrides via the `PROSPECTA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ProspectaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/prospecta/prospecta.toml` (system-wide)
/// 3. `~/.config/prospecta/prospecta.toml` (user XDG config)
/// 4. `./prospecta.toml` (local directory)
/// 5. `PROSPECTA_*` environment variables
pub fn load_config() -> Result<ProspectaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ProspectaConfig::default()))
        .merge(Toml::file("/etc/prospecta/prospecta.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("prospecta/prospecta.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("prospecta.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and for loading config from an explicit string.
pub fn load_config_from_str(toml_content: &str) -> Result<ProspectaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ProspectaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ProspectaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ProspectaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PROSPECTA_SERVER_BEARER_TOKEN` must map
/// to `server.bearer_token`, not `server.bearer.token`.
fn env_provider() -> Env {
    Env::prefixed("PROSPECTA_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
