//! CLI configuration: thin wrapper around `fritzly_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--address, --username, --password, --timeout).

use secrecy::SecretString;

use fritzly_config::{Config, ConfigError};
use fritzly_core::RouterConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Translate the active profile plus global flags into a `RouterConfig`.
///
/// An unknown profile is fine when `--address` names the router anyway.
pub fn build_router_config(global: &GlobalOpts, cfg: &Config) -> Result<RouterConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profile(&profile_name) {
        Ok(profile) => profile,
        Err(ConfigError::UnknownProfile { .. }) if global.address.is_some() => {
            fritzly_config::Profile::default()
        }
        Err(ConfigError::UnknownProfile { name }) => {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref address) = global.address {
        profile.address.clone_from(address);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let password = global.password.clone().map(SecretString::from);
    let config = fritzly_config::profile_to_router_config(
        &profile,
        &profile_name,
        cfg.defaults.timeout,
        password,
    )?;
    tracing::debug!(url = %config.url, user = %config.username, profile = %profile_name, "router config resolved");
    Ok(config)
}
