// ── Port forwarding types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Remote host value meaning "any".
pub const ANY_REMOTE_HOST: &str = "0.0.0.0";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Lowercase form used in synthesized mapping names (`tcp`, `udp`).
    pub fn lowercase(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

/// One port-forwarding rule on the router.
///
/// The router identifies a rule by (remote host, external port, protocol);
/// re-adding a rule with the same key replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub remote_host: String,
    pub external_port: u16,
    pub protocol: Protocol,
    pub internal_port: u16,
    pub internal_client: String,
    pub enabled: bool,
    pub description: String,
    pub lease_duration: u32,
}

impl PortMapping {
    /// A permanent rule forwarding `port` to the same port on `client`.
    pub fn forward(
        port: u16,
        protocol: Protocol,
        client: impl Into<String>,
        description: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            remote_host: ANY_REMOTE_HOST.to_owned(),
            external_port: port,
            protocol,
            internal_port: port,
            internal_client: client.into(),
            enabled,
            description: description.into(),
            lease_duration: 0,
        }
    }

    /// Whether this rule forwards `port` (both sides) to `client` over `protocol`.
    pub fn forwards_local(&self, port: u16, protocol: Protocol, client: &str) -> bool {
        self.internal_client == client
            && self.protocol == protocol
            && self.external_port == port
            && self.internal_port == port
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!("UDP".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert!("icmp".parse::<Protocol>().is_err());
        assert_eq!(Protocol::Udp.to_string(), "UDP");
    }

    #[test]
    fn forwards_local_requires_matching_ports() {
        let mut mapping = PortMapping::forward(22, Protocol::Tcp, "192.168.178.20", "ssh", true);
        assert!(mapping.forwards_local(22, Protocol::Tcp, "192.168.178.20"));
        assert!(!mapping.forwards_local(22, Protocol::Udp, "192.168.178.20"));
        assert!(!mapping.forwards_local(22, Protocol::Tcp, "192.168.178.21"));

        mapping.internal_port = 2222;
        assert!(!mapping.forwards_local(22, Protocol::Tcp, "192.168.178.20"));
    }
}
