use thiserror::Error;

/// UPnP error code returned for an action the service does not implement.
pub const FAULT_INVALID_ACTION: u16 = 401;

/// Top-level error type for the `fritzly-api` crate.
///
/// Covers discovery, transport, authentication, and SOAP-level failures.
/// `fritzly-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Connection ──────────────────────────────────────────────────
    /// The router could not be reached (refused, DNS failure, timeout).
    #[error("Could not connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    /// The router rejected the credentials (HTTP 401 after digest replay).
    #[error("Authorization failed for user '{username}'")]
    Authorization { username: String },

    // ── Discovery ───────────────────────────────────────────────────
    /// The device description does not list the requested service.
    #[error("Unknown service: {service}")]
    UnknownService { service: String },

    /// The service exists but does not implement the action (UPnP 401).
    #[error("Unknown action {action} on service {service}")]
    UnknownAction { service: String, action: String },

    // ── SOAP ────────────────────────────────────────────────────────
    /// A SOAP fault with a UPnP error code.
    #[error("UPnP fault {code}: {description}")]
    Fault { code: u16, description: String },

    /// Unexpected HTTP status outside the SOAP contract.
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error that is not a plain connect failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The response body is not well-formed XML or lacks the SOAP body.
    #[error("Malformed XML: {message}")]
    Xml { message: String },

    /// A response field the caller needs is absent.
    #[error("Missing field {field} in response")]
    MissingField { field: String },

    /// A response field could not be converted to the requested type.
    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: String, value: String },
}

impl Error {
    /// Build the right variant for a failed `send()`.
    ///
    /// Connect failures and timeouts both mean "device unreachable".
    pub(crate) fn from_send(url: &url::Url, err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Connection {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            Self::Transport(err)
        }
    }

    /// Returns `true` if the router was unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` if the router rejected the credentials.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }

    /// Returns `true` if the requested service is not present on the device.
    pub fn is_unknown_service(&self) -> bool {
        matches!(self, Self::UnknownService { .. })
    }

    /// The UPnP error code of a SOAP fault, if this is one.
    pub fn fault_code(&self) -> Option<u16> {
        match self {
            Self::Fault { code, .. } => Some(*code),
            Self::UnknownAction { .. } => Some(FAULT_INVALID_ACTION),
            _ => None,
        }
    }
}
