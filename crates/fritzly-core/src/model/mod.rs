// ── Domain model ──
//
// Router entities as the CLI sees them. Conversion from raw action
// responses lives in `crate::convert`.

pub mod monitor;
pub mod port_mapping;
pub mod wifi;

// ── Re-exports ──────────────────────────────────────────────────────

pub use monitor::{OnlineMonitorSample, utilization};
pub use port_mapping::{ANY_REMOTE_HOST, PortMapping, Protocol};
pub use wifi::{FrequencyBand, RadioId, WifiClient, WifiCredentials, WifiRadio, WifiSecurity};
