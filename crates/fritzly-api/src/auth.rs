// HTTP Digest authentication (RFC 2617) for TR-064 control URLs.
//
// The router answers the first unauthenticated SOAP request with a
// `WWW-Authenticate: Digest ...` challenge. The challenge is cached and
// reused for every following request with an incrementing nonce count,
// so only the very first call (and calls after a nonce expiry) costs a
// round trip.

use secrecy::{ExposeSecret, SecretString};

/// A parsed `WWW-Authenticate: Digest` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub qop: Option<String>,
    pub opaque: Option<String>,
    pub algorithm: Option<String>,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// Returns `None` for non-digest schemes or when realm/nonce are missing.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, params) = header.split_once(char::is_whitespace)?;
        if !scheme.eq_ignore_ascii_case("digest") {
            return None;
        }

        let mut realm = None;
        let mut nonce = None;
        let mut qop = None;
        let mut opaque = None;
        let mut algorithm = None;

        for (key, value) in split_params(params) {
            match key.to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "qop" => qop = Some(value),
                "opaque" => opaque = Some(value),
                "algorithm" => algorithm = Some(value),
                _ => {}
            }
        }

        Some(Self {
            realm: realm?,
            nonce: nonce?,
            qop,
            opaque,
            algorithm,
        })
    }

    /// Whether the server offers `qop=auth` (possibly among other options).
    fn supports_qop_auth(&self) -> bool {
        self.qop
            .as_deref()
            .is_some_and(|q| q.split(',').any(|o| o.trim() == "auth"))
    }
}

/// Split `k1="v1", k2=v2` into pairs, honouring commas inside quotes.
fn split_params(params: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut flush = |chunk: &str| {
        if let Some((k, v)) = chunk.split_once('=') {
            let value = v.trim().trim_matches('"').to_string();
            pairs.push((k.trim().to_string(), value));
        }
    };

    for ch in params.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                flush(&current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    flush(&current);
    pairs
}

/// A cached challenge plus the nonce count already spent on it.
#[derive(Debug, Clone)]
pub struct DigestState {
    challenge: DigestChallenge,
    nonce_count: u32,
}

impl DigestState {
    pub fn new(challenge: DigestChallenge) -> Self {
        Self {
            challenge,
            nonce_count: 0,
        }
    }

    /// Build the `Authorization` header for the next request.
    ///
    /// Each call consumes one nonce count.
    pub fn authorization(
        &mut self,
        username: &str,
        password: &SecretString,
        method: &str,
        uri: &str,
        cnonce: &str,
    ) -> String {
        self.nonce_count = self.nonce_count.wrapping_add(1);
        let nc = format!("{:08x}", self.nonce_count);
        let c = &self.challenge;

        let ha1 = md5_hex(&format!(
            "{username}:{}:{}",
            c.realm,
            password.expose_secret()
        ));
        let ha2 = md5_hex(&format!("{method}:{uri}"));

        let mut header = format!(
            "Digest username=\"{username}\", realm=\"{}\", nonce=\"{}\", uri=\"{uri}\"",
            c.realm, c.nonce
        );

        if c.supports_qop_auth() {
            let response = md5_hex(&format!("{ha1}:{}:{nc}:{cnonce}:auth:{ha2}", c.nonce));
            header.push_str(&format!(
                ", response=\"{response}\", qop=auth, nc={nc}, cnonce=\"{cnonce}\""
            ));
        } else {
            let response = md5_hex(&format!("{ha1}:{}:{ha2}", c.nonce));
            header.push_str(&format!(", response=\"{response}\""));
        }

        if let Some(ref algorithm) = c.algorithm {
            header.push_str(&format!(", algorithm={algorithm}"));
        }
        if let Some(ref opaque) = c.opaque {
            header.push_str(&format!(", opaque=\"{opaque}\""));
        }
        header
    }
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Fresh client nonce for a digest response.
pub fn new_cnonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..16].to_string()
}
