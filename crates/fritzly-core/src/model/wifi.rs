// ── Wi-Fi radio types ──

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// One of the router's Wi-Fi networks, `WLANConfiguration{n}` on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum RadioId {
    Radio1,
    Radio2,
    Radio3,
}

impl RadioId {
    pub fn number(self) -> u8 {
        match self {
            Self::Radio1 => 1,
            Self::Radio2 => 2,
            Self::Radio3 => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Radio1),
            2 => Some(Self::Radio2),
            3 => Some(Self::Radio3),
            _ => None,
        }
    }

    /// Human-facing name: the first two are bands, the third the guest net.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Radio1 => "2.4GHz",
            Self::Radio2 => "5GHz",
            Self::Radio3 => "guests",
        }
    }

    pub fn service(self) -> String {
        format!("WLANConfiguration{}", self.number())
    }
}

impl std::fmt::Display for RadioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Band reported by `X_AVM-DE_FrequencyBand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyBand {
    Ghz2_4,
    Ghz5,
    Ghz6,
    Unknown,
}

impl FrequencyBand {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim() {
            "2400" => Self::Ghz2_4,
            "5000" => Self::Ghz5,
            "6000" => Self::Ghz6,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ghz2_4 => "2.4GHz",
            Self::Ghz5 => "5GHz",
            Self::Ghz6 => "6GHz",
            Self::Unknown => "-",
        })
    }
}

/// State of one Wi-Fi network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiRadio {
    pub id: RadioId,
    pub enabled: bool,
    pub ssid: String,
    pub channel: u32,
    pub band: FrequencyBand,
}

/// A station associated with one of the Wi-Fi networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiClient {
    pub radio: RadioId,
    /// From the router's host table; `None` for stations it has no name for.
    pub hostname: Option<String>,
    pub mac: String,
    pub ip: String,
    /// Link speed in Mbit/s.
    pub speed: Option<u32>,
    /// Signal strength in percent.
    pub signal: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSecurity {
    Wpa,
    Open,
}

impl WifiSecurity {
    /// Map a `BeaconType` value. OWE networks have no passphrase to share.
    pub fn from_beacon_type(beacon: &str) -> Self {
        match beacon.trim() {
            "None" | "OWE" | "OWETrans" => Self::Open,
            _ => Self::Wpa,
        }
    }
}

/// What a phone needs to join a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub radio: RadioId,
    pub ssid: String,
    pub security: WifiSecurity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    pub hidden: bool,
}

impl WifiCredentials {
    /// `WIFI:` payload understood by phone cameras when encoded as a QR code.
    pub fn qr_payload(&self) -> String {
        let mut fields = Vec::with_capacity(4);
        fields.push(match self.security {
            WifiSecurity::Wpa => "T:WPA".to_owned(),
            WifiSecurity::Open => "T:nopass".to_owned(),
        });
        fields.push(format!("S:{}", escape_qr(&self.ssid)));
        if self.security == WifiSecurity::Wpa {
            if let Some(pass) = self.passphrase.as_deref().filter(|p| !p.is_empty()) {
                fields.push(format!("P:{}", escape_qr(pass)));
            }
        }
        if self.hidden {
            fields.push("H:true".to_owned());
        }
        format!("WIFI:{};;", fields.join(";"))
    }
}

fn escape_qr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
