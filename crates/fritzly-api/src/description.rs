// TR-064 device description parsing.
//
// `tr64desc.xml` lists every service of the root device and its embedded
// devices. Only two facts per service matter for calling actions: the
// service type (SOAP namespace) and the control URL (POST target).

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::trace;
use xmltree::{Element, XMLNode};

use crate::error::Error;

/// Path of the TR-064 device description relative to the router base URL.
pub const DESCRIPTION_PATH: &str = "/tr64desc.xml";

/// Where and how to call one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// e.g. `urn:dslforum-org:service:WANPPPConnection:1`
    pub service_type: String,
    /// e.g. `/upnp/control/wanpppconn1`
    pub control_url: String,
}

/// All services announced by the device, keyed by short name (`WANPPPConnection1`).
#[derive(Debug, Clone, Default)]
pub struct ServiceTable {
    services: HashMap<String, ServiceDescriptor>,
}

impl ServiceTable {
    /// Parse a device description document.
    pub fn parse(xml: &str) -> Result<Self, Error> {
        let root = Element::parse(xml.as_bytes()).map_err(|e| Error::Xml {
            message: format!("device description: {e}"),
        })?;

        let mut table = Self::default();
        table.collect(&root);
        trace!(services = table.services.len(), "parsed device description");
        Ok(table)
    }

    fn collect(&mut self, element: &Element) {
        if element.name == "service" {
            if let Some((name, descriptor)) = service_entry(element) {
                self.services.insert(name, descriptor);
            }
            return;
        }
        for child in &element.children {
            if let XMLNode::Element(child) = child {
                self.collect(child);
            }
        }
    }

    /// Register a service by hand (used when a description is already known).
    pub fn insert(&mut self, name: impl Into<String>, descriptor: ServiceDescriptor) {
        self.services.insert(name.into(), descriptor);
    }

    /// Look up a service; the name is normalised first.
    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(normalize_service_name(name).as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Service names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn service_entry(service: &Element) -> Option<(String, ServiceDescriptor)> {
    let text = |tag: &str| {
        service
            .get_child(tag)
            .and_then(Element::get_text)
            .map(|t| t.trim().to_string())
    };

    let service_id = text("serviceId")?;
    let name = service_id
        .rsplit_once("serviceId:")
        .map_or(service_id.as_str(), |(_, n)| n)
        .to_string();

    Some((
        name,
        ServiceDescriptor {
            service_type: text("serviceType")?,
            control_url: text("controlURL")?,
        },
    ))
}

/// Service names without an instance number refer to instance 1.
///
/// `DeviceInfo` → `DeviceInfo1`, `WLANConfiguration2` stays as is.
pub fn normalize_service_name(name: &str) -> Cow<'_, str> {
    if name.ends_with(|c: char| c.is_ascii_digit()) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}1"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:dslforum-org:device-1-0">
  <device>
    <deviceType>urn:dslforum-org:device:InternetGatewayDevice:1</deviceType>
    <serviceList>
      <service>
        <serviceType>urn:dslforum-org:service:DeviceInfo:1</serviceType>
        <serviceId>urn:DeviceInfo-com:serviceId:DeviceInfo1</serviceId>
        <controlURL>/upnp/control/deviceinfo</controlURL>
      </service>
    </serviceList>
    <deviceList>
      <device>
        <serviceList>
          <service>
            <serviceType>urn:dslforum-org:service:WANPPPConnection:1</serviceType>
            <serviceId>urn:WANPPPConnection-com:serviceId:WANPPPConnection1</serviceId>
            <controlURL>/upnp/control/wanpppconn1</controlURL>
          </service>
          <service>
            <serviceType>urn:dslforum-org:service:WLANConfiguration:2</serviceType>
            <serviceId>urn:WLANConfiguration-com:serviceId:WLANConfiguration2</serviceId>
            <controlURL>/upnp/control/wlanconfig2</controlURL>
          </service>
        </serviceList>
      </device>
    </deviceList>
  </device>
</root>"#;

    #[test]
    fn collects_services_from_nested_devices() {
        let table = ServiceTable::parse(DESCRIPTION).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.names(),
            vec!["DeviceInfo1", "WANPPPConnection1", "WLANConfiguration2"]
        );

        let wan = table.get("WANPPPConnection1").unwrap();
        assert_eq!(wan.control_url, "/upnp/control/wanpppconn1");
        assert_eq!(wan.service_type, "urn:dslforum-org:service:WANPPPConnection:1");
    }

    #[test]
    fn lookup_appends_missing_instance_number() {
        let table = ServiceTable::parse(DESCRIPTION).unwrap();
        assert!(table.contains("DeviceInfo"));
        assert!(!table.contains("WLANConfiguration3"));
    }

    #[test]
    fn normalize_keeps_numbered_names() {
        assert_eq!(normalize_service_name("WLANConfiguration2"), "WLANConfiguration2");
        assert_eq!(normalize_service_name("Hosts"), "Hosts1");
    }

    #[test]
    fn malformed_document_is_an_xml_error() {
        let err = ServiceTable::parse("<root><device>").unwrap_err();
        assert!(matches!(err, Error::Xml { .. }));
    }
}
