// SOAP envelope encoding and response decoding.
//
// TR-064 actions take flat `name → scalar` arguments and return flat
// `name → scalar` results, so both sides are modelled as ordered string
// maps. Typed access happens at the edges via `ActionResponse` getters.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use indexmap::IndexMap;
use xmltree::{Element, EmitterConfig, Namespace, XMLNode};

use crate::error::{Error, FAULT_INVALID_ACTION};

// ── Argument values ─────────────────────────────────────────────────

/// A scalar argument in its TR-064 wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapValue(String);

impl SoapValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<bool> for SoapValue {
    fn from(v: bool) -> Self {
        Self(if v { "1" } else { "0" }.into())
    }
}

macro_rules! soap_value_from_display {
    ($($t:ty),*) => {
        $(impl From<$t> for SoapValue {
            fn from(v: $t) -> Self {
                Self(v.to_string())
            }
        })*
    };
}

soap_value_from_display!(u8, u16, u32, u64, i32, Ipv4Addr);

impl From<&str> for SoapValue {
    fn from(v: &str) -> Self {
        Self(v.to_owned())
    }
}

impl From<String> for SoapValue {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// Ordered action arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(IndexMap<String, SoapValue>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SoapValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(SoapValue::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ── Responses ───────────────────────────────────────────────────────

/// The out-arguments of one action call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionResponse {
    fields: IndexMap<String, String>,
}

impl ActionResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fakes in tests.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Required string field.
    pub fn str(&self, name: &str) -> Result<&str, Error> {
        self.get(name).ok_or_else(|| Error::MissingField {
            field: name.to_owned(),
        })
    }

    /// Required field parsed via `FromStr`.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<T, Error> {
        let raw = self.str(name)?;
        raw.trim().parse().map_err(|_| Error::InvalidField {
            field: name.to_owned(),
            value: raw.to_owned(),
        })
    }

    pub fn u16(&self, name: &str) -> Result<u16, Error> {
        self.parse(name)
    }

    pub fn u32(&self, name: &str) -> Result<u32, Error> {
        self.parse(name)
    }

    pub fn u64(&self, name: &str) -> Result<u64, Error> {
        self.parse(name)
    }

    /// TR-064 booleans are `0`/`1`; some firmwares answer `true`/`false`.
    pub fn bool(&self, name: &str) -> Result<bool, Error> {
        let raw = self.str(name)?;
        match raw.trim() {
            "1" | "true" | "True" => Ok(true),
            "0" | "false" | "False" => Ok(false),
            _ => Err(Error::InvalidField {
                field: name.to_owned(),
                value: raw.to_owned(),
            }),
        }
    }
}

impl FromIterator<(String, String)> for ActionResponse {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// ── Envelope ────────────────────────────────────────────────────────

const ENVELOPE: &str = "<s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
    s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\"><s:Body/></s:Envelope>";

/// Render the request envelope for `action` on `service_type`.
pub fn build_envelope(service_type: &str, action: &str, args: &Arguments) -> Result<String, Error> {
    let xml_error = |e: &dyn fmt::Display| Error::Xml {
        message: format!("{action} request: {e}"),
    };

    let mut call = Element::new(action);
    call.prefix = Some("u".into());
    call.namespace = Some(service_type.into());
    let mut namespaces = Namespace::empty();
    namespaces.put("u", service_type);
    call.namespaces = Some(namespaces);
    for (name, value) in args.iter() {
        let mut arg = Element::new(name);
        arg.children.push(XMLNode::Text(value.to_owned()));
        call.children.push(XMLNode::Element(arg));
    }

    let mut envelope = Element::parse(ENVELOPE.as_bytes()).map_err(|e| xml_error(&e))?;
    envelope
        .get_mut_child("Body")
        .ok_or_else(|| xml_error(&"envelope has no SOAP body"))?
        .children
        .push(XMLNode::Element(call));

    let mut out = Vec::new();
    envelope
        .write_with_config(&mut out, EmitterConfig::new().perform_indent(false))
        .map_err(|e| xml_error(&e))?;
    String::from_utf8(out).map_err(|e| xml_error(&e))
}

/// The `SOAPACTION` header value.
pub fn soap_action_header(service_type: &str, action: &str) -> String {
    format!("\"{service_type}#{action}\"")
}

/// Decode a response envelope, turning SOAP faults into errors.
pub fn parse_response(body: &str, service: &str, action: &str) -> Result<ActionResponse, Error> {
    let root = Element::parse(body.as_bytes()).map_err(|e| Error::Xml {
        message: format!("{service}.{action}: {e}"),
    })?;

    let soap_body = root.get_child("Body").ok_or_else(|| Error::Xml {
        message: format!("{service}.{action}: response has no SOAP body"),
    })?;

    if let Some(fault) = soap_body.get_child("Fault") {
        return Err(fault_error(fault, service, action));
    }

    let expected = format!("{action}Response");
    let response = soap_body
        .get_child(expected.as_str())
        .or_else(|| first_element(soap_body))
        .ok_or_else(|| Error::Xml {
            message: format!("{service}.{action}: empty SOAP body"),
        })?;

    Ok(response
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(e) => Some((
                e.name.clone(),
                e.get_text().map(|t| t.into_owned()).unwrap_or_default(),
            )),
            _ => None,
        })
        .collect())
}

fn first_element(parent: &Element) -> Option<&Element> {
    parent.children.iter().find_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

fn fault_error(fault: &Element, service: &str, action: &str) -> Error {
    let upnp = fault
        .get_child("detail")
        .and_then(|d| d.get_child("UPnPError"));

    let text = |tag: &str| {
        upnp.and_then(|u| u.get_child(tag))
            .and_then(Element::get_text)
            .map(|t| t.trim().to_string())
    };

    let code = text("errorCode").and_then(|c| c.parse::<u16>().ok());
    let description = text("errorDescription")
        .or_else(|| {
            fault
                .get_child("faultstring")
                .and_then(Element::get_text)
                .map(|t| t.trim().to_string())
        })
        .unwrap_or_default();

    match code {
        Some(FAULT_INVALID_ACTION) => Error::UnknownAction {
            service: service.to_owned(),
            action: action.to_owned(),
        },
        Some(code) => Error::Fault { code, description },
        None => Error::Xml {
            message: format!("{service}.{action}: SOAP fault without UPnP error code ({description})"),
        },
    }
}
