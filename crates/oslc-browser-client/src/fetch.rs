//! Authenticating HTTP fetcher
//!
//! Every GET goes through the same ladder:
//!
//!   1. `http://` on a non-local host is upgraded to `https://`
//!   2. GET with the session cookie store and merged headers
//!   3. Jazz form auth (`authrequired` vendor header) → POST j_security_check
//!      otherwise a `WWW-Authenticate` challenge → retry with Basic auth
//!   4. A network-level failure → one retry through the public relay,
//!      without cookies or credentials
//!
//! The branch is chosen from each response; nothing about the server's auth
//! scheme is remembered between requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use oslc_browser_core::vocab;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ETAG, WWW_AUTHENTICATE,
};
use reqwest::Client;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::{debug, warn};
use url::{Host, Url};

pub const DEFAULT_RELAY_BASE: &str = "https://cors-anywhere.com";
const SECURITY_CHECK_PATH: &str = "/j_security_check";

/// Fetch error types
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid uri {uri}: {message}")]
    InvalidUri { uri: String, message: String },

    #[error("relay request failed: {0}")]
    Relay(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<FetchError> for oslc_browser_core::Error {
    fn from(e: FetchError) -> Self {
        oslc_browser_core::Error::transport(e.to_string())
    }
}

/// User id and password presented to form and challenge authentication.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    fn basic_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.user_id, self.password));
        format!("Basic {}", token)
    }
}

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub credentials: Credentials,
    /// Relay used when a direct fetch fails at the network level. `None` disables it.
    pub relay_base: Option<String>,
    /// Headers sent with every GET; caller headers override them.
    pub default_headers: HeaderMap,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(vocab::ACCEPT_RDF));
        default_headers.insert(
            HeaderName::from_static("oslc-core-version"),
            HeaderValue::from_static(vocab::OSLC_CORE_VERSION),
        );
        Self {
            credentials: Credentials::default(),
            relay_base: Some(DEFAULT_RELAY_BASE.to_string()),
            default_headers,
        }
    }
}

/// Status, headers and body of a completed exchange.
#[derive(Clone, Debug)]
pub struct FetchResponse {
    /// Final URL the body came from (after upgrade, redirects or relay).
    pub uri: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchResponse {
    async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let uri = response.url().to_string();
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Self {
            uri,
            status,
            headers,
            body,
        })
    }

    /// Header lookup; names are case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn etag(&self) -> Option<&str> {
        self.headers.get(ETAG).and_then(|v| v.to_str().ok())
    }

    /// Value of the Jazz auth vendor header, if present.
    pub fn auth_msg(&self) -> Option<&str> {
        self.header(vocab::HEADER_AUTH_MSG)
    }

    fn has_challenge(&self) -> bool {
        self.headers.contains_key(WWW_AUTHENTICATE)
    }
}

pub struct AuthenticatingFetcher {
    client: Client,
    relay_client: Client,
    config: FetchConfig,
}

impl AuthenticatingFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().cookie_store(true).build()?,
            relay_client: Client::builder().build()?,
            config,
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `uri`, negotiating authentication and falling back to the relay.
    pub async fn fetch(&self, uri: &str, headers: &HeaderMap) -> Result<FetchResponse, FetchError> {
        let target = upgrade_scheme(uri);
        let headers = self.merged_headers(headers);

        match self.fetch_direct(&target, &headers).await {
            Err(FetchError::Network(err)) if is_cross_origin(&err) => match &self.config.relay_base {
                Some(base) => {
                    warn!("Direct fetch of {} failed ({}), retrying via relay", target, err);
                    self.fetch_via_relay(base, &target, &headers).await
                }
                None => Err(FetchError::Network(err)),
            },
            other => other,
        }
    }

    fn merged_headers(&self, extra: &HeaderMap) -> HeaderMap {
        let mut headers = self.config.default_headers.clone();
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }

    async fn fetch_direct(&self, uri: &str, headers: &HeaderMap) -> Result<FetchResponse, FetchError> {
        debug!("GET {}", uri);
        let response = self.client.get(uri).headers(headers.clone()).send().await?;
        let response = FetchResponse::read(response).await?;

        if response.auth_msg() == Some(vocab::AUTH_MSG_REQUIRED) {
            self.form_login(uri).await
        } else if response.has_challenge() {
            self.basic_retry(uri, headers).await
        } else {
            Ok(response)
        }
    }

    /// JEE form authentication against `<origin>/j_security_check`.
    async fn form_login(&self, uri: &str) -> Result<FetchResponse, FetchError> {
        let auth_uri = security_check_uri(uri)?;
        debug!("Form authentication required, POST {}", auth_uri);
        let creds = &self.config.credentials;
        let response = self
            .client
            .post(&auth_uri)
            .form(&[
                ("j_username", creds.user_id.as_str()),
                ("j_password", creds.password.as_str()),
            ])
            .send()
            .await?;
        Ok(FetchResponse::read(response).await?)
    }

    /// Reissue the original request with Basic credentials.
    async fn basic_retry(&self, uri: &str, headers: &HeaderMap) -> Result<FetchResponse, FetchError> {
        debug!("Authentication challenge from {}, retrying with Basic auth", uri);
        let response = self
            .client
            .get(uri)
            .headers(headers.clone())
            .header(AUTHORIZATION, self.config.credentials.basic_header())
            .send()
            .await?;
        Ok(FetchResponse::read(response).await?)
    }

    async fn fetch_via_relay(
        &self,
        base: &str,
        uri: &str,
        headers: &HeaderMap,
    ) -> Result<FetchResponse, FetchError> {
        let relayed = relay_uri(base, uri);
        debug!("GET {} (relay)", relayed);
        let result = async {
            let response = self.relay_client.get(&relayed).headers(headers.clone()).send().await?;
            FetchResponse::read(response).await
        }
        .await;
        let mut response = result.map_err(|e| FetchError::Relay(e.to_string()))?;
        // The body describes the target, not the relay address.
        response.uri = uri.to_string();
        Ok(response)
    }
}

/// Rewrite `http` to `https` unless the host is local. Unparseable URIs are
/// returned unchanged.
pub fn upgrade_scheme(uri: &str) -> String {
    let mut url = match Url::parse(uri) {
        Ok(url) => url,
        Err(e) => {
            debug!("Not upgrading unparseable uri {}: {}", uri, e);
            return uri.to_string();
        }
    };
    if url.scheme() != "http" {
        return uri.to_string();
    }
    let local = url.host().map(|h| is_local_host(&h)).unwrap_or(true);
    if local || url.set_scheme("https").is_err() {
        return uri.to_string();
    }
    url.to_string()
}

/// Loopback names, `.local` domains, private and link-local addresses.
pub fn is_local_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => {
            let name = name.to_ascii_lowercase();
            name == "localhost" || name.ends_with(".local")
        }
        Host::Ipv4(addr) => is_local_ipv4(addr),
        Host::Ipv6(addr) => is_local_ipv6(addr),
    }
}

fn is_local_ipv4(addr: &Ipv4Addr) -> bool {
    addr.is_loopback() || addr.is_private() || addr.is_link_local()
}

fn is_local_ipv6(addr: &Ipv6Addr) -> bool {
    let first = addr.segments()[0];
    // fe80::/10 link-local, fc00::/7 unique-local
    addr.is_loopback() || (first & 0xffc0) == 0xfe80 || (first & 0xfe00) == 0xfc00
}

pub fn relay_uri(base: &str, uri: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), uri)
}

fn security_check_uri(uri: &str) -> Result<String, FetchError> {
    let url = Url::parse(uri).map_err(|e| FetchError::InvalidUri {
        uri: uri.to_string(),
        message: e.to_string(),
    })?;
    Ok(format!("{}{}", url.origin().ascii_serialization(), SECURITY_CHECK_PATH))
}

/// Failures where the request never got a response: refused or reset
/// connections, DNS and TLS errors, blocked cross-origin requests.
fn is_cross_origin(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return false;
    }
    if err.is_connect() || err.is_request() {
        return true;
    }
    let message = err.to_string();
    ["CORS", "Cross-Origin", "fetch", "Network request failed"]
        .iter()
        .any(|needle| message.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrades_remote_http() {
        assert_eq!(upgrade_scheme("http://example.com/r"), "https://example.com/r");
        assert_eq!(
            upgrade_scheme("http://jazz.example.com:9443/ccm/r?x=1"),
            "https://jazz.example.com:9443/ccm/r?x=1"
        );
    }

    #[test]
    fn leaves_local_hosts_alone() {
        for uri in [
            "http://localhost/r",
            "http://127.0.0.1/r",
            "http://10.1.2.3/r",
            "http://172.16.0.4/r",
            "http://172.31.255.1/r",
            "http://192.168.1.10/r",
            "http://169.254.3.3/r",
            "http://printer.local/r",
            "http://[::1]/r",
            "http://[fe80::1]/r",
            "http://[fd12:3456::1]/r",
        ] {
            assert_eq!(upgrade_scheme(uri), uri, "{} should not be upgraded", uri);
        }
    }

    #[test]
    fn upgrades_public_addresses_outside_private_ranges() {
        assert_eq!(upgrade_scheme("http://172.32.0.1/r"), "https://172.32.0.1/r");
        assert_eq!(upgrade_scheme("http://[2001:db8::1]/r"), "https://[2001:db8::1]/r");
    }

    #[test]
    fn leaves_https_and_garbage_alone() {
        assert_eq!(upgrade_scheme("https://example.com/r"), "https://example.com/r");
        assert_eq!(upgrade_scheme("not a uri"), "not a uri");
        assert_eq!(upgrade_scheme("urn:oslc:thing"), "urn:oslc:thing");
    }

    #[test]
    fn relay_uri_appends_target() {
        assert_eq!(
            relay_uri("https://cors-anywhere.com/", "https://example.com/r"),
            "https://cors-anywhere.com/https://example.com/r"
        );
    }

    #[test]
    fn security_check_uses_origin() {
        assert_eq!(
            security_check_uri("https://jazz.example.com:9443/ccm/resource/1?x=y").unwrap(),
            "https://jazz.example.com:9443/j_security_check"
        );
        assert!(security_check_uri("nope").is_err());
    }

    #[test]
    fn basic_header_is_base64_of_user_colon_password() {
        let creds = Credentials::new("devonce", "devonce");
        assert_eq!(creds.basic_header(), "Basic ZGV2b25jZTpkZXZvbmNl");
    }

    #[test]
    fn default_headers_request_rdf() {
        let config = FetchConfig::default();
        assert_eq!(config.default_headers.get(ACCEPT).unwrap(), vocab::ACCEPT_RDF);
        assert_eq!(config.default_headers.get("OSLC-Core-Version").unwrap(), "2.0");
        assert_eq!(config.relay_base.as_deref(), Some(DEFAULT_RELAY_BASE));
    }
}
