//! Application-layer reachability probing: one lightweight HEAD
//! request per call against a fixed endpoint.
//!
//! The probe answers "did the remote answer the application
//! protocol", not "was the request authorized": 401/403/404 prove the
//! handshake and routing worked and therefore count as reachable.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::HttpReply;
use crate::types::{ProbeOutcome, ProxyMode};
use reqwest::{Client, Proxy};
use std::ffi::OsString;
use std::time::Duration;
use url::Url;

/// Status codes that count as "the remote host answered the
/// application protocol": success and redirect codes plus the
/// client-error codes an unauthenticated probe legitimately receives.
pub const REACHABLE_STATUS: &[u16] = &[200, 204, 301, 302, 401, 403, 404];

/// Environment variables that put the client into the default
/// (environment-configured) proxy mode.
const PROXY_ENV_VARS: &[&str] = &[
    "HTTPS_PROXY",
    "https_proxy",
    "HTTP_PROXY",
    "http_proxy",
    "ALL_PROXY",
    "all_proxy",
];

/// Probe endpoint as data: scheme, host, port, path.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpEndpoint {
    pub scheme: String,
    pub host: String,
    /// None means the scheme default (443/80)
    pub port: Option<u16>,
    pub path: String,
}

impl HttpEndpoint {
    /// The standard HTTPS probe shape
    pub fn https<H: Into<String>, P: Into<String>>(host: H, path: P) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
            port: None,
            path: path.into(),
        }
    }

    /// Endpoint described by the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            scheme: config.http_scheme.clone(),
            host: config.http_host.clone(),
            port: None,
            path: config.http_path.clone(),
        }
    }

    /// Render as a URL
    pub fn url(&self) -> Result<Url> {
        let rendered = match self.port {
            Some(port) => format!("{}://{}:{}{}", self.scheme, self.host, port, self.path),
            None => format!("{}://{}{}", self.scheme, self.host, self.path),
        };
        Url::parse(&rendered)
            .map_err(|e| AppError::parse(format!("Invalid endpoint URL '{}': {}", rendered, e)))
    }
}

/// Issues one bounded HEAD request per call.
///
/// Every session resource is scoped to the call: the client, its
/// connection and the response are all released by `Drop` on every
/// exit path, including early failures.
pub struct HttpProber {
    timeout: Duration,
    proxy_url: Option<String>,
}

impl HttpProber {
    pub fn new(timeout: Duration, proxy_url: Option<String>) -> Self {
        Self { timeout, proxy_url }
    }

    /// Probe the endpoint once. No retry.
    pub async fn check(&self, endpoint: &HttpEndpoint) -> ProbeOutcome<HttpReply> {
        // Determined before the request so failures can report it too.
        let proxy = self.proxy_mode();
        ProbeOutcome::from_result(self.execute(endpoint, proxy).await)
    }

    /// Effective proxy mode for the session
    pub fn proxy_mode(&self) -> ProxyMode {
        classify_proxy(self.proxy_url.as_deref(), std::env::vars_os())
    }

    async fn execute(&self, endpoint: &HttpEndpoint, proxy: ProxyMode) -> Result<HttpReply> {
        let url = endpoint
            .url()
            .map_err(|e| AppError::parse(format!("url: {} (proxy: {})", e, proxy)))?;

        let mut builder = Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            // Redirect statuses are reachability proof in their own
            // right; following them would hide the code we classify.
            .redirect(reqwest::redirect::Policy::none());

        if let Some(ref proxy_url) = self.proxy_url {
            let named = Proxy::all(proxy_url.as_str()).map_err(|e| {
                AppError::transport(format!("proxy: {} (proxy: {})", e, proxy))
            })?;
            builder = builder.proxy(named);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::transport(format!("client: {} (proxy: {})", e, proxy)))?;

        let response = client.head(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::timeout(format!(
                    "send: no response within {} s (proxy: {})",
                    self.timeout.as_secs(),
                    proxy
                ))
            } else if e.is_connect() {
                AppError::transport(format!("connect: {} (proxy: {})", e, proxy))
            } else {
                AppError::transport(format!("send: {} (proxy: {})", e, proxy))
            }
        })?;

        Ok(HttpReply {
            status: response.status().as_u16(),
            proxy,
        })
    }
}

/// Classify the proxy mode from an explicit proxy setting and the
/// process environment.
///
/// An explicitly configured proxy is `Named`; conventional proxy
/// environment variables (honored by the client by default) mean
/// `Default`; a proxy variable whose value cannot be read as text is
/// `Unknown`; otherwise the connection is `Direct`.
fn classify_proxy<I>(named: Option<&str>, env: I) -> ProxyMode
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    if named.is_some() {
        return ProxyMode::Named;
    }

    let mut mode = ProxyMode::Direct;
    for (key, value) in env {
        let key = match key.to_str() {
            Some(key) => key,
            None => continue,
        };
        if !PROXY_ENV_VARS.contains(&key) {
            continue;
        }
        match value.to_str() {
            Some(value) if !value.is_empty() => return ProxyMode::Default,
            Some(_) => {}
            None => mode = ProxyMode::Unknown,
        }
    }
    mode
}
