// ── Core error types ──
//
// User-facing errors from fritzly-core. Consumers never see SOAP envelopes
// or HTTP statuses directly; the `From<fritzly_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authorization failed for user '{username}'")]
    AuthorizationFailed { username: String },

    #[error("Request timed out")]
    Timeout,

    /// No usable outbound IPv4 address on this host.
    #[error("Network unavailable: {reason}")]
    NetworkUnavailable { reason: String },

    // ── Capability errors ────────────────────────────────────────────
    #[error("Router does not provide service {service}")]
    ServiceUnavailable { service: String },

    #[error("Action not supported: {service}.{action}")]
    Unsupported { service: String, action: String },

    #[error("Wi-Fi network not found: {name}")]
    RadioNotFound { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Router rejected the request ({code}): {description}")]
    Rejected { code: u16, description: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected router response: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fritzly_api::Error> for CoreError {
    fn from(err: fritzly_api::Error) -> Self {
        use fritzly_api::Error as ApiError;

        match err {
            ApiError::Connection { url, reason } => CoreError::ConnectionFailed { url, reason },
            ApiError::Authorization { username } => CoreError::AuthorizationFailed { username },
            ApiError::UnknownService { service } => CoreError::ServiceUnavailable { service },
            ApiError::UnknownAction { service, action } => {
                CoreError::Unsupported { service, action }
            }
            ApiError::Fault { code, description } => CoreError::Rejected { code, description },
            ApiError::HttpStatus { status, url } => CoreError::Api {
                message: format!("HTTP {status} from {url}"),
                status: Some(status),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Xml { message } => CoreError::InvalidResponse { message },
            ApiError::MissingField { field } => CoreError::InvalidResponse {
                message: format!("missing field {field}"),
            },
            ApiError::InvalidField { field, value } => CoreError::InvalidResponse {
                message: format!("field {field} has unexpected value '{value}'"),
            },
        }
    }
}

impl CoreError {
    /// Errors that mean the router could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_maps_to_rejected() {
        let err: CoreError = fritzly_api::Error::Fault {
            code: 714,
            description: "NoSuchEntryInArray".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Rejected { code: 714, .. }));
    }

    #[test]
    fn authorization_keeps_username() {
        let err: CoreError = fritzly_api::Error::Authorization {
            username: "dslf-config".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Authorization failed for user 'dslf-config'"
        );
    }

    #[test]
    fn missing_field_is_invalid_response() {
        let err: CoreError = fritzly_api::Error::MissingField {
            field: "NewSSID".into(),
        }
        .into();
        assert!(matches!(err, CoreError::InvalidResponse { .. }));
        assert!(!err.is_connection());
    }
}
