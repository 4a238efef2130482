// ── Router facade ──
//
// One method per router operation the CLI needs. Holds the RPC seam and
// nothing else; callers pass `&Router` to whatever needs the connection.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use fritzly_api::{ActionResponse, Arguments, Error as ApiError, Tr064Client};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::convert;
use crate::error::CoreError;
use crate::host::HostIdentity;
use crate::model::{
    OnlineMonitorSample, PortMapping, Protocol, RadioId, WifiClient, WifiCredentials, WifiRadio,
};
use crate::resolver;
use crate::rpc::RouterRpc;

/// Service names used by the facade.
pub mod services {
    pub const WAN_PPP: &str = "WANPPPConnection1";
    pub const WAN_COMMON: &str = "WANCommonInterfaceConfig1";
    pub const DEVICE_INFO: &str = "DeviceInfo1";
    pub const HOSTS: &str = "Hosts1";
}

/// Fault: a disconnect is already in progress.
pub const FAULT_DISCONNECT_IN_PROGRESS: u16 = 707;
/// Fault: the connection is already terminated.
pub const FAULT_ALREADY_TERMINATED: u16 = 711;

/// Result of asking the router to drop its WAN connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminationOutcome {
    Terminated,
    /// The link was already down or going down.
    AlreadyDown,
}

/// A connected router.
pub struct Router<R> {
    rpc: R,
}

impl Router<Tr064Client> {
    /// Discover services and verify the credentials with one cheap call.
    pub async fn connect(config: &RouterConfig) -> Result<Self, CoreError> {
        debug!(url = %config.url, user = %config.username, "connecting to router");
        let client = Tr064Client::connect(config.connect_options()).await?;
        let router = Self::new(client);
        router.probe().await?;
        info!(url = %config.url, "connected to router");
        Ok(router)
    }
}

impl<R: RouterRpc> Router<R> {
    pub fn new(rpc: R) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    async fn call(
        &self,
        service: &str,
        action: &str,
        args: Arguments,
    ) -> Result<ActionResponse, ApiError> {
        self.rpc.call(service, action, args).await
    }

    /// Like `call`, but an absent service is `Ok(None)`.
    async fn call_optional(
        &self,
        service: &str,
        action: &str,
        args: Arguments,
    ) -> Result<Option<ActionResponse>, CoreError> {
        match self.call(service, action, args).await {
            Ok(resp) => Ok(Some(resp)),
            Err(e) if e.is_unknown_service() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Connect-time check that the router answers and accepts us.
    pub async fn probe(&self) -> Result<(), CoreError> {
        self.call(services::WAN_PPP, "GetExternalIPAddress", Arguments::new())
            .await?;
        Ok(())
    }

    // ── WAN ──────────────────────────────────────────────────────────

    /// Current public IPv4 address; `None` while the link is down.
    pub async fn external_ip(&self) -> Result<Option<Ipv4Addr>, CoreError> {
        let resp = self
            .call(services::WAN_PPP, "GetExternalIPAddress", Arguments::new())
            .await?;
        let raw = resp.get("NewExternalIPAddress").unwrap_or_default().trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let ip: Ipv4Addr = raw.parse().map_err(|_| CoreError::InvalidResponse {
            message: format!("external IP address '{raw}' is not IPv4"),
        })?;
        Ok((!ip.is_unspecified()).then_some(ip))
    }

    /// Drop the WAN connection. The router redials on its own.
    pub async fn force_termination(&self) -> Result<TerminationOutcome, CoreError> {
        match self
            .call(services::WAN_PPP, "ForceTermination", Arguments::new())
            .await
        {
            Ok(_) => Ok(TerminationOutcome::Terminated),
            Err(e)
                if matches!(
                    e.fault_code(),
                    Some(FAULT_DISCONNECT_IN_PROGRESS | FAULT_ALREADY_TERMINATED)
                ) =>
            {
                debug!(code = ?e.fault_code(), "connection already down");
                Ok(TerminationOutcome::AlreadyDown)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn online_monitor(&self) -> Result<OnlineMonitorSample, CoreError> {
        let resp = self
            .call(
                services::WAN_COMMON,
                "X_AVM-DE_GetOnlineMonitor",
                Arguments::new().with("NewSyncGroupIndex", 0_u32),
            )
            .await?;
        Ok(convert::online_monitor(&resp)?)
    }

    // ── Port mappings ────────────────────────────────────────────────

    pub async fn port_mapping_count(&self) -> Result<u32, CoreError> {
        let resp = self
            .call(
                services::WAN_PPP,
                "GetPortMappingNumberOfEntries",
                Arguments::new(),
            )
            .await?;
        Ok(resp.u32("NewPortMappingNumberOfEntries")?)
    }

    /// All mappings, in router index order.
    pub async fn port_mappings(&self) -> Result<Vec<PortMapping>, CoreError> {
        let count = self.port_mapping_count().await?;
        let mut mappings = Vec::new();
        for index in 0..count {
            let resp = self
                .call(
                    services::WAN_PPP,
                    "GetGenericPortMappingEntry",
                    Arguments::new().with("NewPortMappingIndex", index),
                )
                .await?;
            mappings.push(convert::port_mapping(&resp)?);
        }
        debug!(count = mappings.len(), "port mappings loaded");
        Ok(mappings)
    }

    /// Create or replace a mapping with the same (remote host, port, protocol).
    pub async fn add_port_mapping(&self, mapping: &PortMapping) -> Result<(), CoreError> {
        self.call(
            services::WAN_PPP,
            "AddPortMapping",
            convert::port_mapping_arguments(mapping),
        )
        .await?;
        Ok(())
    }

    /// Forward `port` to this host, enabling the rule.
    pub async fn open_port<H: HostIdentity + Sync>(
        &self,
        host: &H,
        port: u16,
        protocol: Protocol,
        name: Option<&str>,
    ) -> Result<PortMapping, CoreError> {
        self.set_port_forward(host, port, protocol, name, true).await
    }

    /// Disable the forward of `port` to this host. The rule itself stays.
    pub async fn close_port<H: HostIdentity + Sync>(
        &self,
        host: &H,
        port: u16,
        protocol: Protocol,
        name: Option<&str>,
    ) -> Result<PortMapping, CoreError> {
        self.set_port_forward(host, port, protocol, name, false).await
    }

    async fn set_port_forward<H: HostIdentity + Sync>(
        &self,
        host: &H,
        port: u16,
        protocol: Protocol,
        name: Option<&str>,
        enabled: bool,
    ) -> Result<PortMapping, CoreError> {
        let client = host.outbound_ipv4()?;
        let description = match name {
            Some(name) => name.to_owned(),
            None => resolver::resolve_mapping_name(self, host, client, port, protocol).await?,
        };

        let mapping = PortMapping::forward(port, protocol, client.to_string(), description, enabled);
        self.add_port_mapping(&mapping).await?;
        info!(
            port,
            %protocol,
            client = %mapping.internal_client,
            name = %mapping.description,
            enabled,
            "port mapping updated"
        );
        Ok(mapping)
    }

    // ── Wi-Fi ────────────────────────────────────────────────────────

    /// State of one network; `None` when the router does not have it.
    pub async fn radio(&self, id: RadioId) -> Result<Option<WifiRadio>, CoreError> {
        let Some(info) = self
            .call_optional(&id.service(), "GetInfo", Arguments::new())
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(convert::wifi_radio(id, &info)?))
    }

    /// Every network the router has, stopping at the first absent one.
    pub async fn radios(&self) -> Result<Vec<WifiRadio>, CoreError> {
        let mut radios = Vec::new();
        for id in RadioId::iter() {
            match self.radio(id).await? {
                Some(radio) => radios.push(radio),
                None => break,
            }
        }
        Ok(radios)
    }

    pub async fn set_radio_enabled(&self, id: RadioId, enabled: bool) -> Result<(), CoreError> {
        self.call(
            &id.service(),
            "SetEnable",
            Arguments::new().with("NewEnable", enabled),
        )
        .await?;
        info!(radio = %id, enabled, "wifi toggled");
        Ok(())
    }

    /// Toggle several networks in id order. Returns the ones the router lacks.
    pub async fn set_radios_enabled(
        &self,
        radios: &BTreeSet<RadioId>,
        enabled: bool,
    ) -> Result<Vec<RadioId>, CoreError> {
        let mut missing = Vec::new();
        for &id in radios {
            match self.set_radio_enabled(id, enabled).await {
                Ok(()) => {}
                Err(CoreError::ServiceUnavailable { .. }) => {
                    warn!(radio = %id, "router has no such wifi network");
                    missing.push(id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(missing)
    }

    /// Stations on every network, grouped by network in id order.
    pub async fn wifi_clients(&self) -> Result<Vec<WifiClient>, CoreError> {
        let mut clients = Vec::new();
        for id in RadioId::iter() {
            let service = id.service();
            let Some(total) = self
                .call_optional(&service, "GetTotalAssociations", Arguments::new())
                .await?
            else {
                break;
            };

            let total = total.u32("NewTotalAssociations")?;
            for index in 0..total {
                let resp = self
                    .call(
                        &service,
                        "GetGenericAssociatedDeviceInfo",
                        Arguments::new().with("NewAssociatedDeviceIndex", index),
                    )
                    .await?;
                let mac = resp.str("NewAssociatedDeviceMACAddress")?;
                let hostname = self.host_name_for_mac(mac).await?;
                clients.push(convert::wifi_client(id, &resp, hostname)?);
            }
        }
        Ok(clients)
    }

    /// Name the router's host table knows `mac` by.
    pub async fn host_name_for_mac(&self, mac: &str) -> Result<Option<String>, CoreError> {
        let resp = self
            .call(
                services::HOSTS,
                "GetSpecificHostEntry",
                Arguments::new().with("NewMACAddress", mac),
            )
            .await;

        match resp {
            Ok(resp) => Ok(resp
                .get("NewHostName")
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned)),
            // Unknown hosts come back as a fault; a box without Hosts1 just has no names.
            Err(e) if e.fault_code().is_some() || e.is_unknown_service() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// SSID, passphrase and visibility needed to join a network.
    pub async fn wifi_credentials(&self, id: RadioId) -> Result<WifiCredentials, CoreError> {
        let service = id.service();
        let Some(info) = self
            .call_optional(&service, "GetInfo", Arguments::new())
            .await?
        else {
            return Err(CoreError::RadioNotFound {
                name: id.display_name().to_owned(),
            });
        };

        let keys = self
            .call(&service, "GetSecurityKeys", Arguments::new())
            .await?;
        let beacon = match self
            .call(&service, "GetBeaconAdvertisement", Arguments::new())
            .await
        {
            Ok(resp) => Some(resp),
            Err(ApiError::UnknownAction { .. }) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(convert::wifi_credentials(id, &info, &keys, beacon.as_ref())?)
    }

    // ── Device ───────────────────────────────────────────────────────

    /// Router event log, newest first.
    pub async fn device_log(&self) -> Result<Vec<String>, CoreError> {
        let resp = self
            .call(services::DEVICE_INFO, "GetDeviceLog", Arguments::new())
            .await?;
        let log = resp.get("NewDeviceLog").unwrap_or_default();
        if log.is_empty() {
            return Ok(Vec::new());
        }
        Ok(log.split('\n').map(str::to_owned).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{FakeRpc, Reply};

    const WLAN1: &str = "WLANConfiguration1";
    const WLAN2: &str = "WLANConfiguration2";

    fn wlan_info(ssid: &str, status: &str) -> [(&'static str, String); 4] {
        [
            ("NewStatus", status.to_owned()),
            ("NewSSID", ssid.to_owned()),
            ("NewChannel", "6".to_owned()),
            ("NewX_AVM-DE_FrequencyBand", "2400".to_owned()),
        ]
    }

    fn with_info(rpc: FakeRpc, service: &str, ssid: &str, status: &str) -> FakeRpc {
        let fields = wlan_info(ssid, status);
        let refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        rpc.ok(service, "GetInfo", &refs)
    }

    #[tokio::test]
    async fn termination_fault_711_is_already_down() {
        let router = Router::new(FakeRpc::new().fault(services::WAN_PPP, "ForceTermination", 711));
        assert_eq!(
            router.force_termination().await.unwrap(),
            TerminationOutcome::AlreadyDown
        );
    }

    #[tokio::test]
    async fn termination_other_fault_is_error() {
        let router = Router::new(FakeRpc::new().fault(services::WAN_PPP, "ForceTermination", 501));
        let err = router.force_termination().await.unwrap_err();
        assert!(matches!(err, CoreError::Rejected { code: 501, .. }));
    }

    #[tokio::test]
    async fn external_ip_parses_and_treats_empty_as_down() {
        let router = Router::new(
            FakeRpc::new()
                .ok(services::WAN_PPP, "GetExternalIPAddress", &[("NewExternalIPAddress", "203.0.113.9")])
                .ok(services::WAN_PPP, "GetExternalIPAddress", &[("NewExternalIPAddress", "")]),
        );
        assert_eq!(
            router.external_ip().await.unwrap(),
            Some(Ipv4Addr::new(203, 0, 113, 9))
        );
        assert_eq!(router.external_ip().await.unwrap(), None);
    }

    #[tokio::test]
    async fn probe_surfaces_authorization_failure() {
        let router = Router::new(FakeRpc::new().reply(
            services::WAN_PPP,
            "GetExternalIPAddress",
            Reply::Unauthorized,
        ));
        assert!(matches!(
            router.probe().await,
            Err(CoreError::AuthorizationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn port_mappings_enumerate_by_index() {
        let entry = |port: &'static str, desc: &'static str| {
            [
                ("NewRemoteHost", ""),
                ("NewExternalPort", port),
                ("NewProtocol", "TCP"),
                ("NewInternalPort", port),
                ("NewInternalClient", "192.168.178.20"),
                ("NewEnabled", "1"),
                ("NewPortMappingDescription", desc),
                ("NewLeaseDuration", "0"),
            ]
        };
        let rpc = FakeRpc::new()
            .ok(services::WAN_PPP, "GetPortMappingNumberOfEntries", &[("NewPortMappingNumberOfEntries", "2")])
            .ok(services::WAN_PPP, "GetGenericPortMappingEntry", &entry("22", "ssh"))
            .ok(services::WAN_PPP, "GetGenericPortMappingEntry", &entry("443", "web"));
        let router = Router::new(rpc);

        let mappings = router.port_mappings().await.unwrap();
        let names: Vec<&str> = mappings.iter().map(|m| m.description.as_str()).collect();
        assert_eq!(names, ["ssh", "web"]);

        let indices: Vec<Option<String>> = router
            .rpc()
            .args(services::WAN_PPP, "GetGenericPortMappingEntry")
            .iter()
            .map(|a| a.get("NewPortMappingIndex").map(str::to_owned))
            .collect();
        assert_eq!(indices, [Some("0".to_string()), Some("1".to_string())]);
    }

    #[tokio::test]
    async fn missing_third_radio_is_none() {
        let rpc = with_info(FakeRpc::new(), WLAN1, "home", "Up");
        let rpc = with_info(rpc, WLAN2, "home-5", "Disabled");
        let router = Router::new(rpc);

        assert!(router.radio(RadioId::Radio3).await.unwrap().is_none());

        let radios = router.radios().await.unwrap();
        assert_eq!(radios.len(), 2);
        assert!(radios[0].enabled);
        assert!(!radios[1].enabled);
        assert_eq!(radios[1].ssid, "home-5");
    }

    #[tokio::test]
    async fn set_radios_enabled_reports_missing_networks() {
        let rpc = FakeRpc::new()
            .ok(WLAN1, "SetEnable", &[])
            .ok(WLAN2, "SetEnable", &[]);
        let router = Router::new(rpc);

        let all: BTreeSet<RadioId> = RadioId::iter().collect();
        let missing = router.set_radios_enabled(&all, false).await.unwrap();

        assert_eq!(missing, vec![RadioId::Radio3]);
        assert_eq!(
            router.rpc().args(WLAN1, "SetEnable")[0].get("NewEnable"),
            Some("0")
        );
        assert_eq!(
            router.rpc().log(),
            [
                "WLANConfiguration1.SetEnable",
                "WLANConfiguration2.SetEnable",
                "WLANConfiguration3.SetEnable",
            ]
        );
    }

    #[tokio::test]
    async fn wifi_clients_use_host_table_names() {
        let rpc = FakeRpc::new()
            .ok(WLAN1, "GetTotalAssociations", &[("NewTotalAssociations", "2")])
            .ok(
                WLAN1,
                "GetGenericAssociatedDeviceInfo",
                &[
                    ("NewAssociatedDeviceMACAddress", "AA:BB:CC:00:00:01"),
                    ("NewAssociatedDeviceIPAddress", "192.168.178.30"),
                    ("NewX_AVM-DE_Speed", "866"),
                    ("NewX_AVM-DE_SignalStrength", "70"),
                ],
            )
            .ok(
                WLAN1,
                "GetGenericAssociatedDeviceInfo",
                &[
                    ("NewAssociatedDeviceMACAddress", "AA:BB:CC:00:00:02"),
                    ("NewAssociatedDeviceIPAddress", "192.168.178.31"),
                ],
            )
            .ok(services::HOSTS, "GetSpecificHostEntry", &[("NewHostName", "laptop")])
            .fault(services::HOSTS, "GetSpecificHostEntry", 714)
            .ok(WLAN2, "GetTotalAssociations", &[("NewTotalAssociations", "0")]);
        let router = Router::new(rpc);

        let clients = router.wifi_clients().await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].hostname.as_deref(), Some("laptop"));
        assert_eq!(clients[0].speed, Some(866));
        assert_eq!(clients[1].hostname, None);
        assert_eq!(clients[1].signal, None);
    }

    #[tokio::test]
    async fn credentials_for_missing_radio_is_not_found() {
        let router = Router::new(FakeRpc::new());
        let err = router.wifi_credentials(RadioId::Radio3).await.unwrap_err();
        assert!(matches!(err, CoreError::RadioNotFound { .. }));
    }

    #[tokio::test]
    async fn device_log_splits_lines() {
        let rpc = FakeRpc::new().ok(
            services::DEVICE_INFO,
            "GetDeviceLog",
            &[("NewDeviceLog", "18.10.26 10:00:01 one\n18.10.26 09:59:00 two")],
        );
        let lines = Router::new(rpc).device_log().await.unwrap();
        assert_eq!(lines, ["18.10.26 10:00:01 one", "18.10.26 09:59:00 two"]);
    }

    #[tokio::test]
    async fn online_monitor_requests_sync_group_zero() {
        let rpc = FakeRpc::new().ok(
            services::WAN_COMMON,
            "X_AVM-DE_GetOnlineMonitor",
            &[
                ("Newmax_us", "100"),
                ("Newmax_ds", "0"),
                ("Newus_current_bps", "50,10"),
                ("Newds_current_bps", "7"),
            ],
        );
        let router = Router::new(rpc);
        let sample = router.online_monitor().await.unwrap();
        assert_eq!(sample.current_upstream(), 50);
        assert!(sample.downstream_utilization().abs() < f64::EPSILON);
        assert_eq!(
            router.rpc().args(services::WAN_COMMON, "X_AVM-DE_GetOnlineMonitor")[0]
                .get("NewSyncGroupIndex"),
            Some("0")
        );
    }
}
