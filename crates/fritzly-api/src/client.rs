// TR-064 HTTP client
//
// Wraps `reqwest::Client` with service discovery, SOAP envelope handling
// and digest authentication. Every router action goes through `call()`;
// there is no per-action code in this crate.

use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{self, DigestChallenge, DigestState};
use crate::description::{DESCRIPTION_PATH, ServiceTable, normalize_service_name};
use crate::error::Error;
use crate::soap::{self, ActionResponse, Arguments};
use crate::transport::TransportConfig;

/// Default TR-064 user on boxes configured for password-only login.
pub const DEFAULT_USERNAME: &str = "dslf-config";

/// Everything needed to reach and authenticate against a router.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Base URL of the TR-064 endpoint, e.g. `http://fritz.box:49000`.
    pub url: Url,
    pub username: String,
    pub password: Option<SecretString>,
    pub transport: TransportConfig,
}

/// Raw TR-064 client.
///
/// Holds the discovered service table and the cached digest challenge.
/// All methods take `&self`; the digest state sits behind a mutex so the
/// client can be shared by reference across command handlers.
pub struct Tr064Client {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: Option<SecretString>,
    services: ServiceTable,
    digest: Mutex<Option<DigestState>>,
}

impl Tr064Client {
    /// Fetch the device description and build a ready-to-use client.
    pub async fn connect(options: ConnectOptions) -> Result<Self, Error> {
        let http = options.transport.build_client()?;
        let url = options.url.join(DESCRIPTION_PATH)?;
        debug!("fetching device description from {}", url);

        let resp = http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::from_send(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let services = ServiceTable::parse(&body)?;
        debug!(services = services.len(), "device description loaded");

        Ok(Self::with_services(
            http,
            options.url,
            options.username,
            options.password,
            services,
        ))
    }

    /// Create a client from an already known service table.
    pub fn with_services(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        password: Option<SecretString>,
        services: ServiceTable,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
            services,
            digest: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn services(&self) -> &ServiceTable {
        &self.services
    }

    /// Whether the device announces the given service.
    pub fn has_service(&self, service: &str) -> bool {
        self.services.contains(service)
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Invoke `action` on `service` and return its out-arguments.
    pub async fn call(
        &self,
        service: &str,
        action: &str,
        args: &Arguments,
    ) -> Result<ActionResponse, Error> {
        let service_name = normalize_service_name(service);
        let descriptor = self
            .services
            .get(&service_name)
            .ok_or_else(|| Error::UnknownService {
                service: service_name.to_string(),
            })?;

        let url = self.base_url.join(&descriptor.control_url)?;
        let envelope = soap::build_envelope(&descriptor.service_type, action, args)?;
        let soap_action = soap::soap_action_header(&descriptor.service_type, action);

        debug!("calling {}.{}", service_name, action);
        trace!(args = ?args, "request arguments");

        let mut resp = self
            .post(&url, &soap_action, &envelope, self.authorization(&url).await)
            .await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            let challenge = resp
                .headers()
                .get(reqwest::header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok())
                .and_then(DigestChallenge::parse);

            let (Some(challenge), Some(_)) = (challenge, self.password.as_ref()) else {
                return Err(self.unauthorized());
            };

            debug!(realm = %challenge.realm, "digest challenge received, replaying request");
            *self.digest.lock().await = Some(DigestState::new(challenge));

            resp = self
                .post(&url, &soap_action, &envelope, self.authorization(&url).await)
                .await?;

            if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
                *self.digest.lock().await = None;
                return Err(self.unauthorized());
            }
        }

        let status = resp.status();
        // Faults come back as 500 with a SOAP body.
        if !status.is_success() && status != reqwest::StatusCode::INTERNAL_SERVER_ERROR {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let response = soap::parse_response(&body, &service_name, action)?;
        trace!(fields = response.len(), "response decoded");
        Ok(response)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn post(
        &self,
        url: &Url,
        soap_action: &str,
        envelope: &str,
        authorization: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        let mut request = self
            .http
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=\"utf-8\"")
            .header("SOAPACTION", soap_action)
            .body(envelope.to_owned());

        if let Some(header) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        request.send().await.map_err(|e| Error::from_send(url, e))
    }

    /// Digest header for the next request, if a challenge is cached.
    async fn authorization(&self, url: &Url) -> Option<String> {
        let password = self.password.as_ref()?;
        let mut guard = self.digest.lock().await;
        let state = guard.as_mut()?;

        let uri = match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_owned(),
        };
        Some(state.authorization(&self.username, password, "POST", &uri, &auth::new_cnonce()))
    }

    fn unauthorized(&self) -> Error {
        Error::Authorization {
            username: self.username.clone(),
        }
    }
}
