// ── Runtime connection configuration ──
//
// Describes how to reach one router. Built by the CLI from profiles and
// flags; core never reads config files.

use std::time::Duration;

use fritzly_api::{ConnectOptions, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Hostname FRITZ!Box routers answer to on their own LAN.
pub const DEFAULT_ADDRESS: &str = "fritz.box";

/// TR-064 listens here for plain HTTP.
pub const DEFAULT_PORT: u16 = 49000;

/// Configuration for connecting to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// TR-064 base URL (e.g., `http://fritz.box:49000`).
    pub url: Url,
    pub username: String,
    /// `None` connects anonymously; most actions will then be refused.
    pub password: Option<SecretString>,
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl RouterConfig {
    pub fn new(address: &str, username: impl Into<String>) -> Result<Self, CoreError> {
        Ok(Self {
            url: router_url(address)?,
            username: username.into(),
            password: None,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(10),
        })
    }

    pub fn with_password(mut self, password: Option<SecretString>) -> Self {
        self.password = password;
        self
    }

    pub(crate) fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            transport: TransportConfig {
                tls: self.tls,
                timeout: self.timeout,
            },
        }
    }
}

/// Turn a user-supplied router address into a TR-064 base URL.
///
/// A bare host gets `http://` and the default port; `host:port` only the
/// scheme; anything with a scheme is taken as is.
pub fn router_url(address: &str) -> Result<Url, CoreError> {
    let address = address.trim().trim_end_matches('/');
    if address.is_empty() {
        return Err(CoreError::Config {
            message: "router address is empty".into(),
        });
    }

    let candidate = if address.contains("://") {
        address.to_owned()
    } else if address.contains(':') {
        format!("http://{address}")
    } else {
        format!("http://{address}:{DEFAULT_PORT}")
    };

    Url::parse(&candidate).map_err(|e| CoreError::Config {
        message: format!("invalid router address '{address}': {e}"),
    })
}
