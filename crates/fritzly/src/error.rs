//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fritzly_config::ConfigError;
use fritzly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    /// A name or goal the command could not resolve (unknown Wi-Fi, no new IP).
    pub const UNRESOLVED: i32 = -1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to router at {url}")]
    #[diagnostic(
        code(fritzly::connection_failed),
        help(
            "Check that the router is reachable and TR-064 is enabled\n\
             (Home Network > Network > Network Settings > Allow access for applications).\n\
             Reason: {reason}\n\
             Use --address or FRITZ_ADDRESS for a different router."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the router timed out")]
    #[diagnostic(
        code(fritzly::timeout),
        help("Increase the timeout with --timeout or check the router's load.")
    )]
    Timeout,

    #[error("No usable network connection on this machine")]
    #[diagnostic(
        code(fritzly::network_unavailable),
        help("Port forwards point at this machine's LAN address. {reason}")
    )]
    NetworkUnavailable { reason: String },

    // ── Authorization ────────────────────────────────────────────────
    #[error("Authorization failed for user '{username}'")]
    #[diagnostic(
        code(fritzly::auth_failed),
        help(
            "Check the password. Pass it with --password or the $FRITZ_PASSWORD\n\
             environment variable, or store it with: fritzly config set-password"
        )
    )]
    AuthFailed { username: String },

    // ── Router capabilities ──────────────────────────────────────────
    #[error("The router does not provide {service}")]
    #[diagnostic(
        code(fritzly::service_unavailable),
        help("This feature depends on the router model, firmware, or connection type.")
    )]
    ServiceUnavailable { service: String },

    #[error("Router rejected the request: {description} (error {code})")]
    #[diagnostic(code(fritzly::rejected))]
    Rejected { code: u16, description: String },

    #[error("Unexpected answer from the router: {message}")]
    #[diagnostic(code(fritzly::api_error))]
    Api { message: String },

    // ── Command outcomes ─────────────────────────────────────────────
    #[error("unknown wlan name: {names}")]
    #[diagnostic(code(fritzly::unknown_wlan), help("Known names: {known}"))]
    UnknownWlanName { names: String, known: String },

    #[error("could not get a new IP")]
    #[diagnostic(
        code(fritzly::reconnect_exhausted),
        help("Still {ip} after {attempts} attempt(s). Try more --attempts or a longer --delay.")
    )]
    ReconnectExhausted { ip: String, attempts: u32 },

    #[error("The router has no external IP address")]
    #[diagnostic(
        code(fritzly::offline),
        help("The internet connection is down or still being established.")
    )]
    NoExternalIp,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fritzly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fritzly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fritzly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fritzly::config))]
    Config { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(fritzly::render))]
    Render { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownWlanName { .. } | Self::ReconnectExhausted { .. } => {
                exit_code::UNRESOLVED
            }
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthorizationFailed { username } => CliError::AuthFailed { username },
            CoreError::Timeout => CliError::Timeout,
            CoreError::NetworkUnavailable { reason } => CliError::NetworkUnavailable { reason },
            CoreError::ServiceUnavailable { service } => CliError::ServiceUnavailable { service },
            CoreError::Unsupported { service, action } => CliError::ServiceUnavailable {
                service: format!("{service}.{action}"),
            },
            CoreError::RadioNotFound { name } => CliError::ServiceUnavailable {
                service: format!("the {name} Wi-Fi network"),
            },
            CoreError::Rejected { code, description } => CliError::Rejected { code, description },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Api { message, status } => CliError::Api {
                message: match status {
                    Some(status) => format!("{message} (HTTP {status})"),
                    None => message,
                },
            },
            CoreError::InvalidResponse { message } => CliError::Api { message },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
