// ── Local host identity ──
//
// Port forwards point at this machine, so opening one needs the LAN
// address the router sees us under and a hostname for default names.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use sysinfo::System;
use tracing::debug;

use crate::error::CoreError;

/// Facts about the machine fritzly runs on.
pub trait HostIdentity {
    fn hostname(&self) -> String;

    /// The local IPv4 address used for outbound traffic.
    ///
    /// Loopback or unspecified addresses mean there is no usable network.
    fn outbound_ipv4(&self) -> Result<Ipv4Addr, CoreError>;
}

/// Target used to pick the outbound interface. Nothing is ever sent.
const PROBE_TARGET: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0)), 1);

/// The real machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostIdentity for SystemHost {
    fn hostname(&self) -> String {
        System::host_name()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".to_string())
    }

    fn outbound_ipv4(&self) -> Result<Ipv4Addr, CoreError> {
        let unavailable = |reason: String| CoreError::NetworkUnavailable { reason };

        // Connecting a UDP socket only selects a route.
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .map_err(|e| unavailable(format!("cannot open UDP socket: {e}")))?;
        socket
            .connect(PROBE_TARGET)
            .map_err(|e| unavailable(format!("no route to the network: {e}")))?;
        let local = socket
            .local_addr()
            .map_err(|e| unavailable(format!("cannot read local address: {e}")))?;

        debug!(address = %local.ip(), "outbound address");
        match local.ip() {
            IpAddr::V4(ip) => usable(ip),
            IpAddr::V6(ip) => Err(unavailable(format!("no IPv4 address (got {ip})"))),
        }
    }
}

/// Reject addresses no router could forward to.
pub fn usable(ip: Ipv4Addr) -> Result<Ipv4Addr, CoreError> {
    if ip.is_loopback() || ip.is_unspecified() {
        Err(CoreError::NetworkUnavailable {
            reason: format!("only {ip} is available"),
        })
    } else {
        Ok(ip)
    }
}
