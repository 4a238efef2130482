// fritzly-core: Router actions and domain logic between fritzly-api and the CLI.

pub mod config;
pub(crate) mod convert;
pub mod error;
pub mod host;
pub mod model;
pub mod reconnect;
pub mod resolver;
pub mod router;
pub mod rpc;
pub mod sampler;
pub mod wifi_names;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{RouterConfig, router_url};
pub use error::CoreError;
pub use host::{HostIdentity, SystemHost};
pub use reconnect::{ReconnectOptions, ReconnectOutcome, ReconnectProgress};
pub use router::{Router, TerminationOutcome};
pub use rpc::RouterRpc;
pub use wifi_names::{AliasTable, DEFAULT_WLAN_OFF, DEFAULT_WLAN_ON, WifiSelection};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    FrequencyBand, OnlineMonitorSample, PortMapping, Protocol, RadioId, WifiClient,
    WifiCredentials, WifiRadio, WifiSecurity,
};

// The CLI builds connection options without depending on the api crate directly.
pub use fritzly_api::{TlsMode, Tr064Client};
