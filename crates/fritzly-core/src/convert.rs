// ── Action response → domain model ──
//
// Field names are the TR-064 out-argument names. Optional fields the
// firmware may omit fall back to defaults; required ones surface as
// `MissingField`.

use fritzly_api::{ActionResponse, Arguments, Error as ApiError};

use crate::model::{
    FrequencyBand, OnlineMonitorSample, PortMapping, Protocol, RadioId, WifiClient,
    WifiCredentials, WifiRadio, WifiSecurity,
};

// ── Port mappings ───────────────────────────────────────────────────

pub(crate) fn port_mapping(resp: &ActionResponse) -> Result<PortMapping, ApiError> {
    let protocol_raw = resp.str("NewProtocol")?;
    let protocol = protocol_raw
        .parse::<Protocol>()
        .map_err(|_| ApiError::InvalidField {
            field: "NewProtocol".into(),
            value: protocol_raw.to_owned(),
        })?;

    Ok(PortMapping {
        remote_host: resp.get("NewRemoteHost").unwrap_or_default().to_owned(),
        external_port: resp.u16("NewExternalPort")?,
        protocol,
        internal_port: resp.u16("NewInternalPort")?,
        internal_client: resp.str("NewInternalClient")?.to_owned(),
        enabled: resp.bool("NewEnabled")?,
        description: resp
            .get("NewPortMappingDescription")
            .unwrap_or_default()
            .to_owned(),
        lease_duration: resp
            .get("NewLeaseDuration")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default(),
    })
}

/// In-arguments of `AddPortMapping`.
pub(crate) fn port_mapping_arguments(mapping: &PortMapping) -> Arguments {
    Arguments::new()
        .with("NewRemoteHost", mapping.remote_host.as_str())
        .with("NewExternalPort", mapping.external_port)
        .with("NewProtocol", mapping.protocol.to_string())
        .with("NewInternalPort", mapping.internal_port)
        .with("NewInternalClient", mapping.internal_client.as_str())
        .with("NewEnabled", mapping.enabled)
        .with(
            "NewPortMappingDescription",
            mapping.description.as_str(),
        )
        .with("NewLeaseDuration", mapping.lease_duration)
}

// ── Wi-Fi ───────────────────────────────────────────────────────────

pub(crate) fn wifi_radio(id: RadioId, info: &ActionResponse) -> Result<WifiRadio, ApiError> {
    let enabled = match info.get("NewStatus") {
        Some(status) => status.trim() == "Up",
        None => info.bool("NewEnable")?,
    };

    Ok(WifiRadio {
        id,
        enabled,
        ssid: info.str("NewSSID")?.to_owned(),
        channel: info.get("NewChannel").and_then(|c| c.trim().parse().ok()).unwrap_or_default(),
        band: info
            .get("NewX_AVM-DE_FrequencyBand")
            .map_or(FrequencyBand::Unknown, FrequencyBand::from_wire),
    })
}

pub(crate) fn wifi_client(
    radio: RadioId,
    resp: &ActionResponse,
    hostname: Option<String>,
) -> Result<WifiClient, ApiError> {
    let number = |field: &str| resp.get(field).and_then(|v| v.trim().parse().ok());

    Ok(WifiClient {
        radio,
        hostname,
        mac: resp.str("NewAssociatedDeviceMACAddress")?.to_owned(),
        ip: resp
            .get("NewAssociatedDeviceIPAddress")
            .unwrap_or_default()
            .to_owned(),
        speed: number("NewX_AVM-DE_Speed"),
        signal: number("NewX_AVM-DE_SignalStrength"),
    })
}

/// Combine `GetInfo`, `GetSecurityKeys` and `GetBeaconAdvertisement`.
pub(crate) fn wifi_credentials(
    radio: RadioId,
    info: &ActionResponse,
    keys: &ActionResponse,
    beacon: Option<&ActionResponse>,
) -> Result<WifiCredentials, ApiError> {
    let security = WifiSecurity::from_beacon_type(info.get("NewBeaconType").unwrap_or_default());
    let advertised = match beacon {
        Some(resp) => resp.bool("NewBeaconAdvertisementEnabled")?,
        None => true,
    };

    Ok(WifiCredentials {
        radio,
        ssid: info.str("NewSSID")?.to_owned(),
        security,
        passphrase: keys
            .get("NewKeyPassphrase")
            .filter(|p| !p.is_empty())
            .map(str::to_owned),
        hidden: !advertised,
    })
}

// ── Online monitor ──────────────────────────────────────────────────

pub(crate) fn online_monitor(resp: &ActionResponse) -> Result<OnlineMonitorSample, ApiError> {
    Ok(OnlineMonitorSample {
        max_upstream: resp.u64("Newmax_us")?,
        max_downstream: resp.u64("Newmax_ds")?,
        upstream_history: history(resp, "Newus_current_bps")?,
        downstream_history: history(resp, "Newds_current_bps")?,
    })
}

/// Comma-separated counter list; empty means no samples yet.
fn history(resp: &ActionResponse, field: &str) -> Result<Vec<u64>, ApiError> {
    let raw = resp.get(field).unwrap_or_default();
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse().map_err(|_| ApiError::InvalidField {
                field: field.to_owned(),
                value: raw.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry() -> ActionResponse {
        ActionResponse::new()
            .with("NewRemoteHost", "")
            .with("NewExternalPort", "8080")
            .with("NewProtocol", "TCP")
            .with("NewInternalPort", "80")
            .with("NewInternalClient", "192.168.178.20")
            .with("NewEnabled", "1")
            .with("NewPortMappingDescription", "web")
            .with("NewLeaseDuration", "0")
    }

    #[test]
    fn port_mapping_from_entry() {
        let mapping = port_mapping(&entry()).unwrap();
        assert_eq!(
            mapping,
            PortMapping {
                remote_host: String::new(),
                external_port: 8080,
                protocol: Protocol::Tcp,
                internal_port: 80,
                internal_client: "192.168.178.20".into(),
                enabled: true,
                description: "web".into(),
                lease_duration: 0,
            }
        );
    }

    #[test]
    fn port_mapping_bad_protocol_is_invalid_field() {
        let resp = entry().with("NewProtocol", "GRE");
        let err = port_mapping(&resp).unwrap_err();
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "NewProtocol"));
    }

    #[test]
    fn add_arguments_use_wire_names_in_order() {
        let mapping = PortMapping::forward(22, Protocol::Udp, "10.0.0.5", "ssh", false);
        let args = port_mapping_arguments(&mapping);
        let names: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            [
                "NewRemoteHost",
                "NewExternalPort",
                "NewProtocol",
                "NewInternalPort",
                "NewInternalClient",
                "NewEnabled",
                "NewPortMappingDescription",
                "NewLeaseDuration",
            ]
        );
        assert_eq!(args.get("NewRemoteHost"), Some("0.0.0.0"));
        assert_eq!(args.get("NewProtocol"), Some("UDP"));
        assert_eq!(args.get("NewEnabled"), Some("0"));
    }

    #[test]
    fn radio_status_up_means_enabled() {
        let info = ActionResponse::new()
            .with("NewStatus", "Up")
            .with("NewEnable", "0")
            .with("NewSSID", "home")
            .with("NewChannel", "36")
            .with("NewX_AVM-DE_FrequencyBand", "5000");
        let radio = wifi_radio(RadioId::Radio2, &info).unwrap();
        assert!(radio.enabled);
        assert_eq!(radio.channel, 36);
        assert_eq!(radio.band, FrequencyBand::Ghz5);
    }

    #[test]
    fn monitor_histories_are_parsed() {
        let resp = ActionResponse::new()
            .with("Newmax_us", "5000")
            .with("Newmax_ds", "50000")
            .with("Newus_current_bps", "120,80,0")
            .with("Newds_current_bps", "");
        let sample = online_monitor(&resp).unwrap();
        assert_eq!(sample.upstream_history, vec![120, 80, 0]);
        assert!(sample.downstream_history.is_empty());
        assert_eq!(sample.max_downstream, 50000);
    }

    #[test]
    fn hidden_network_when_beacon_disabled() {
        let info = ActionResponse::new()
            .with("NewSSID", "home")
            .with("NewBeaconType", "11i");
        let keys = ActionResponse::new().with("NewKeyPassphrase", "secret");
        let beacon = ActionResponse::new().with("NewBeaconAdvertisementEnabled", "0");
        let creds = wifi_credentials(RadioId::Radio1, &info, &keys, Some(&beacon)).unwrap();
        assert!(creds.hidden);
        assert_eq!(creds.security, WifiSecurity::Wpa);
        assert_eq!(creds.passphrase.as_deref(), Some("secret"));
    }
}
