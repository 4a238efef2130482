//! Config subcommand handlers.

use dialoguer::{Input, Select};

use fritzly_config::{Config, DEFAULT_USERNAME, Profile};
use fritzly_core::config::DEFAULT_ADDRESS;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = write!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out, "\n");
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = write!(out, "address = \"{}\"", p.address);
        if let Some(ref u) = p.username {
            let _ = write!(out, "\nusername = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = write!(out, "\npassword = \"{MASK}\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = write!(out, "\npassword_env = \"{env}\"");
        }
        if p.verify_tls {
            let _ = write!(out, "\nverify_tls = true");
        }
        if let Some(timeout) = p.timeout {
            let _ = write!(out, "\ntimeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask where a password should live. Returns it when it belongs in the file.
fn prompt_password_storage(profile_name: &str, password: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        fritzly_config::store_password(profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = fritzly_config::config_path();
            eprintln!("fritzly configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = fritzly_config::load_config_or_default();

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(active_profile_name(global, &cfg))
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Router address
            let address: String = Input::new()
                .with_prompt("Router address")
                .default(DEFAULT_ADDRESS.into())
                .interact_text()
                .map_err(prompt_err)?;
            fritzly_core::router_url(&address).map_err(|e| CliError::Validation {
                field: "address".into(),
                reason: e.to_string(),
            })?;

            // 3. User name
            let username: String = Input::new()
                .with_prompt("User name")
                .default(DEFAULT_USERNAME.into())
                .interact_text()
                .map_err(prompt_err)?;

            // 4. Password; empty means none
            let password =
                rpassword::prompt_password("Password (empty for none): ").map_err(prompt_err)?;
            let password = if password.is_empty() {
                None
            } else {
                prompt_password_storage(&profile_name, password)?
            };

            // 5. Build profile and config
            let profile = Profile {
                address,
                username: (username != DEFAULT_USERNAME).then_some(username),
                password,
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }

            // 6. Write config
            let written = fritzly_config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: fritzly --profile {profile_name} myip");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&fritzly_config::load_config()?);
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                fritzly_config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            let path = fritzly_config::config_path();
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set the keyring password ────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = fritzly_config::load_config_or_default();
            let profile_name = active_profile_name(global, &cfg);

            let password = match global.password.clone() {
                Some(password) => password,
                None => rpassword::prompt_password(format!("Password for '{profile_name}': "))
                    .map_err(prompt_err)?,
            };
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            fritzly_config::store_password(&profile_name, &password)?;
            eprintln!("✓ Password for profile '{profile_name}' stored in system keyring");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = fritzly_config::load_config_or_default();
            let default = cfg.profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fritzly config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    output::print_output(&format!("{name}{marker}"), global.quiet);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = fritzly_config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            fritzly_config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}
