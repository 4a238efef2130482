// ── Port-mapping name resolution ──
//
// `port open 22` without a name should keep whatever name the rule already
// has, so toggling a forward never renames it.

use std::net::Ipv4Addr;

use tracing::debug;

use crate::error::CoreError;
use crate::host::HostIdentity;
use crate::model::{PortMapping, Protocol};
use crate::router::Router;
use crate::rpc::RouterRpc;

/// Description for a forward of `port` to `client`.
///
/// Reuses the description of the first existing rule with the same client,
/// protocol and port on both sides; otherwise synthesizes one.
pub async fn resolve_mapping_name<R: RouterRpc, H: HostIdentity + Sync>(
    router: &Router<R>,
    host: &H,
    client: Ipv4Addr,
    port: u16,
    protocol: Protocol,
) -> Result<String, CoreError> {
    let mappings = router.port_mappings().await?;
    Ok(choose_mapping_name(
        &mappings,
        port,
        protocol,
        &client.to_string(),
        &host.hostname(),
    ))
}

/// The pure part of [`resolve_mapping_name`].
pub fn choose_mapping_name(
    mappings: &[PortMapping],
    port: u16,
    protocol: Protocol,
    client: &str,
    hostname: &str,
) -> String {
    if let Some(existing) = mappings
        .iter()
        .find(|m| m.forwards_local(port, protocol, client))
    {
        debug!(name = %existing.description, "reusing existing mapping name");
        return existing.description.clone();
    }
    synthesize_name(hostname, port, protocol)
}

/// `{hostname}-{port}-{protocol}`, e.g. `laptop-22-tcp`.
pub fn synthesize_name(hostname: &str, port: u16, protocol: Protocol) -> String {
    format!("{hostname}-{port}-{}", protocol.lowercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::router::services;
    use crate::testing::FakeRpc;

    struct FixedHost(Ipv4Addr);

    impl HostIdentity for FixedHost {
        fn hostname(&self) -> String {
            "laptop".into()
        }

        fn outbound_ipv4(&self) -> Result<Ipv4Addr, CoreError> {
            crate::host::usable(self.0)
        }
    }

    const CLIENT: &str = "192.168.178.20";

    fn mapping(ext: u16, int: u16, protocol: Protocol, client: &str, desc: &str) -> PortMapping {
        PortMapping {
            remote_host: String::new(),
            external_port: ext,
            protocol,
            internal_port: int,
            internal_client: client.into(),
            enabled: false,
            description: desc.into(),
            lease_duration: 0,
        }
    }

    #[test]
    fn existing_matching_rule_keeps_its_name() {
        let mappings = [mapping(22, 22, Protocol::Tcp, CLIENT, "ssh")];
        assert_eq!(
            choose_mapping_name(&mappings, 22, Protocol::Tcp, CLIENT, "laptop"),
            "ssh"
        );
    }

    #[test]
    fn different_internal_port_is_not_a_match() {
        let mappings = [mapping(8080, 80, Protocol::Tcp, CLIENT, "web")];
        assert_eq!(
            choose_mapping_name(&mappings, 8080, Protocol::Tcp, CLIENT, "laptop"),
            "laptop-8080-tcp"
        );
    }

    #[test]
    fn first_match_wins() {
        let mappings = [
            mapping(53, 53, Protocol::Udp, "192.168.178.99", "other-host"),
            mapping(53, 53, Protocol::Udp, CLIENT, "dns"),
            mapping(53, 53, Protocol::Udp, CLIENT, "dns-dup"),
        ];
        assert_eq!(
            choose_mapping_name(&mappings, 53, Protocol::Udp, CLIENT, "laptop"),
            "dns"
        );
    }

    #[test]
    fn synthesized_name_uses_lowercase_protocol() {
        assert_eq!(synthesize_name("nas", 51413, Protocol::Udp), "nas-51413-udp");
    }

    fn empty_table() -> FakeRpc {
        FakeRpc::new()
            .ok(
                services::WAN_PPP,
                "GetPortMappingNumberOfEntries",
                &[("NewPortMappingNumberOfEntries", "0")],
            )
            .ok(services::WAN_PPP, "AddPortMapping", &[])
    }

    #[tokio::test]
    async fn open_port_adds_enabled_rule_for_this_host() {
        let router = Router::new(empty_table());
        let host = FixedHost(Ipv4Addr::new(192, 168, 178, 20));

        let mapping = router
            .open_port(&host, 22, Protocol::Tcp, None)
            .await
            .unwrap();
        assert_eq!(mapping.description, "laptop-22-tcp");

        let args = router.rpc().args(services::WAN_PPP, "AddPortMapping");
        assert_eq!(args.len(), 1);
        let add = &args[0];
        assert_eq!(add.get("NewRemoteHost"), Some("0.0.0.0"));
        assert_eq!(add.get("NewExternalPort"), Some("22"));
        assert_eq!(add.get("NewInternalPort"), Some("22"));
        assert_eq!(add.get("NewInternalClient"), Some(CLIENT));
        assert_eq!(add.get("NewEnabled"), Some("1"));
        assert_eq!(add.get("NewLeaseDuration"), Some("0"));
    }

    #[tokio::test]
    async fn close_port_with_name_skips_lookup() {
        let router = Router::new(empty_table());
        let host = FixedHost(Ipv4Addr::new(192, 168, 178, 20));

        router
            .close_port(&host, 22, Protocol::Tcp, Some("ssh"))
            .await
            .unwrap();

        let rpc = router.rpc();
        assert_eq!(rpc.count(services::WAN_PPP, "GetPortMappingNumberOfEntries"), 0);
        let add = &rpc.args(services::WAN_PPP, "AddPortMapping")[0];
        assert_eq!(add.get("NewEnabled"), Some("0"));
        assert_eq!(add.get("NewPortMappingDescription"), Some("ssh"));
    }

    #[tokio::test]
    async fn loopback_host_fails_before_any_call() {
        let router = Router::new(empty_table());
        let host = FixedHost(Ipv4Addr::LOCALHOST);

        let err = router
            .open_port(&host, 22, Protocol::Tcp, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::NetworkUnavailable { .. }));
        assert!(router.rpc().log().is_empty());
    }
}
