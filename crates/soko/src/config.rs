//! CLI configuration: thin wrapper around `soko_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use soko_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use soko_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
///
/// CLI flags take priority over profile values. Without a profile the
/// flags alone must supply the site URL.
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut client = match cfg.profiles.get(&profile_name) {
        Some(profile) => soko_config::profile_to_client_config(profile, &profile_name, &cfg.defaults)?,
        None => {
            // An explicitly requested profile must exist.
            if global.profile.is_some() {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(cfg),
                });
            }
            let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            let mut client = ClientConfig::new(soko_config::parse_api_url(url_str)?);
            client.timeout = Duration::from_secs(cfg.defaults.timeout);
            client
        }
    };

    // 1. Site URL (flag > env > profile)
    if let Some(ref url_str) = global.api_url {
        client.url = soko_config::parse_api_url(url_str)?;
    }

    // 2. Session token (flag > env > profile chain)
    if let Some(ref token) = global.token {
        if !token.trim().is_empty() {
            client.token = Some(SecretString::from(token.clone()));
        }
    }

    // 3. TLS verification
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }

    // 4. Timeout
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    Ok(client)
}
