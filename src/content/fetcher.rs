//! Page fetcher with security measures.
//!
//! Every failure mode (rejected URL, transport error, non-2xx status,
//! oversized or unreadable body) is logged and reported as "no content".

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use reqwest::redirect::Policy;
use reqwest::{Client, Proxy};
use tracing::{debug, warn};

use crate::config::FetcherConfig;
use crate::error::{Result, SaverError};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Source of page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url`, returning its body text or `None`.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// HTTP fetcher backed by a shared `reqwest` client.
pub struct HttpFetcher {
    client: Client,
    max_page_size: u64,
    allow_private_hosts: bool,
}

impl HttpFetcher {
    /// Create a fetcher from configuration.
    ///
    /// Unless private hosts are allowed, every redirect hop is validated
    /// like the initial URL and resolved addresses in private ranges are
    /// discarded.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let guarded = !config.allow_private_hosts;

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(config.timeout_secs)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect_policy(config.max_redirects, guarded))
            .user_agent(config.user_agent.as_str());

        // Behind a proxy only the proxy's own host is resolved locally.
        match &config.proxy_url {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url.as_str()).map_err(|e| {
                    SaverError::Config(format!("invalid fetcher.proxy_url: {}", e))
                })?;
                builder = builder.proxy(proxy);
            }
            None if guarded => {
                builder = builder.dns_resolver(Arc::new(PublicOnlyResolver));
            }
            None => {}
        }

        let client = builder
            .build()
            .map_err(|e| SaverError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_page_size: config.max_page_size_bytes,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        if !self.allow_private_hosts {
            validate_url(url)?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SaverError::Fetch(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SaverError::Fetch(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_page_size {
                return Err(SaverError::Fetch(format!(
                    "page too large: {} bytes (max {} bytes)",
                    content_length, self.max_page_size
                )));
            }
        }

        let text = response
            .text()
            .await
            .map_err(|e| SaverError::Fetch(format!("failed to read response: {}", e)))?;

        if text.len() as u64 > self.max_page_size {
            return Err(SaverError::Fetch(format!(
                "page too large: {} bytes (max {} bytes)",
                text.len(),
                self.max_page_size
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => {
                debug!(url, bytes = body.len(), "Fetched page");
                Some(body)
            }
            Err(e) => {
                warn!(url, "Failed to fetch page: {}", e);
                None
            }
        }
    }
}

fn redirect_policy(max_redirects: usize, guarded: bool) -> Policy {
    Policy::custom(move |attempt| {
        let hops = attempt.previous().len();
        match check_redirect(attempt.url().as_str(), hops, max_redirects, guarded) {
            Ok(()) => attempt.follow(),
            Err(e) => attempt.error(e.to_string()),
        }
    })
}

/// Decide whether the redirect to `next`, after `hops` requests, may be
/// followed.
fn check_redirect(next: &str, hops: usize, max_redirects: usize, guarded: bool) -> Result<()> {
    if hops >= max_redirects {
        return Err(SaverError::Fetch(format!(
            "too many redirects (max {})",
            max_redirects
        )));
    }
    if guarded {
        validate_url(next)
            .map_err(|e| SaverError::Fetch(format!("redirect to {} rejected: {}", next, e)))?;
    }
    Ok(())
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// DNS resolver that only yields public addresses.
struct PublicOnlyResolver;

impl Resolve for PublicOnlyResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();
            let resolved = tokio::net::lookup_host((host.as_str(), 0)).await?;
            let public = public_addrs(resolved);
            if public.is_empty() {
                return Err(format!("{} does not resolve to a public address", host).into());
            }
            let addrs: Addrs = Box::new(public.into_iter());
            Ok::<Addrs, BoxError>(addrs)
        })
    }
}

fn public_addrs(addrs: impl IntoIterator<Item = SocketAddr>) -> Vec<SocketAddr> {
    addrs
        .into_iter()
        .filter(|addr| !is_private_ip(&addr.ip()))
        .collect()
}

/// Validate a URL for SSRF protection.
///
/// The URL must be http or https and must not point at a loopback, private,
/// link-local or internal host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| SaverError::Fetch(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(SaverError::Fetch(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    let host = parsed
        .host()
        .ok_or_else(|| SaverError::Fetch("URL has no host".to_string()))?;

    match host {
        url::Host::Domain(domain) => {
            if is_forbidden_hostname(domain) {
                return Err(SaverError::Fetch(format!("forbidden host: {}", domain)));
            }
        }
        url::Host::Ipv4(ipv4) => check_ip(IpAddr::V4(ipv4))?,
        url::Host::Ipv6(ipv6) => check_ip(IpAddr::V6(ipv6))?,
    }

    Ok(())
}

fn check_ip(ip: IpAddr) -> Result<()> {
    if is_private_ip(&ip) {
        return Err(SaverError::Fetch(format!(
            "private IP address not allowed: {}",
            ip
        )));
    }
    Ok(())
}

/// Check if a hostname is forbidden.
fn is_forbidden_hostname(host: &str) -> bool {
    const FORBIDDEN_SUFFIXES: &[&str] = &[
        ".local",
        ".localhost",
        ".internal",
        ".intranet",
        ".corp",
        ".home",
        ".lan",
    ];

    let host = host.to_lowercase();
    host == "localhost" || FORBIDDEN_SUFFIXES.iter().any(|s| host.ends_with(s))
}

/// Check if an IP address is loopback, private or otherwise reserved.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            ipv4.is_loopback()
                || ipv4.is_private()
                || ipv4.is_link_local()
                || ipv4.is_broadcast()
                || ipv4.is_unspecified()
                || ipv4.is_documentation()
                // Carrier-grade NAT: 100.64.0.0/10
                || (octets[0] == 100 && (64..=127).contains(&octets[1]))
        }
        IpAddr::V6(ipv6) => {
            if let Some(mapped) = ipv6.to_ipv4_mapped() {
                return is_private_ip(&IpAddr::V4(mapped));
            }
            let segments = ipv6.segments();
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // Unique local: fc00::/7
                || (segments[0] & 0xfe00) == 0xfc00
                // Link-local: fe80::/10
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}
