//! Outbound URL guard.
//!
//! Feed and audio requests are made on behalf of anonymous clients, so the
//! target must not reach into the local network. A URL is checked three
//! times:
//!
//! 1. syntactically by [`validate_url`] (scheme, local names, IP literals),
//! 2. by [`validate_url_resolved`], which resolves domain names up front,
//! 3. at connect time by [`PublicResolver`] and on every redirect hop by
//!    [`redirect_policy`], so DNS rebinding and `Location:` headers pointing
//!    inward are caught as well.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use reqwest::redirect::Policy;
use reqwest::ClientBuilder;
use url::{Host, Url};

use crate::error::{DreamEchoError, Result};

/// Validate a URL without touching the network.
///
/// Accepts only http/https URLs whose host is neither a local-network name
/// nor a private, loopback or otherwise reserved address.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed = parse_http_url(url)?;
    check_host(&parsed)
}

/// Parse `url` and require an http or https scheme.
pub fn parse_http_url(url: &str) -> Result<Url> {
    let parsed =
        Url::parse(url).map_err(|e| DreamEchoError::Validation(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(DreamEchoError::Validation(format!(
            "unsupported URL scheme: {}",
            scheme
        ))),
    }
}

/// Validate a URL and, for domain hosts, every address the name resolves to.
///
/// A name that does not resolve is let through; the request itself fails.
pub async fn validate_url_resolved(url: &str) -> Result<()> {
    let parsed = parse_http_url(url)?;
    check_host(&parsed)?;

    if let Some(Host::Domain(domain)) = parsed.host() {
        let port = parsed.port_or_known_default().unwrap_or(80);
        match resolve_public(domain, port).await {
            Err(DreamEchoError::Io(e)) => {
                tracing::debug!(host = %domain, error = %e, "Host lookup failed");
            }
            other => {
                other?;
            }
        }
    }

    Ok(())
}

/// Resolve `host` and fail if any address is private.
pub async fn resolve_public(host: &str, port: u16) -> Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port)).await?.collect();

    if let Some(addr) = addrs.iter().find(|addr| is_private_ip(&addr.ip())) {
        return Err(DreamEchoError::Validation(format!(
            "host {} resolves to private IP address {}",
            host,
            addr.ip()
        )));
    }

    Ok(addrs)
}

/// Validate a redirect target before it is followed.
pub fn check_redirect_target(url: &Url) -> Result<()> {
    validate_url(url.as_str())
}

/// DNS resolver that refuses names pointing into the local network.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicResolver;

impl Resolve for PublicResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            // reqwest replaces the port after resolution
            let addrs = resolve_public(name.as_str(), 0).await?;
            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(addrs)
        })
    }
}

/// Redirect policy that follows at most `max_redirects` hops.
///
/// With `block_private_hosts`, every hop must pass [`check_redirect_target`].
pub fn redirect_policy(max_redirects: usize, block_private_hosts: bool) -> Policy {
    if !block_private_hosts {
        return Policy::limited(max_redirects);
    }

    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error(DreamEchoError::Validation(format!(
                "too many redirects (max {})",
                max_redirects
            )));
        }
        match check_redirect_target(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(e) => attempt.error(e),
        }
    })
}

/// Apply the redirect policy and, when blocking, the public-only resolver.
pub fn guard_client(
    builder: ClientBuilder,
    max_redirects: usize,
    block_private_hosts: bool,
) -> ClientBuilder {
    let builder = builder.redirect(redirect_policy(max_redirects, block_private_hosts));
    if block_private_hosts {
        builder.dns_resolver(Arc::new(PublicResolver))
    } else {
        builder
    }
}

fn check_host(parsed: &Url) -> Result<()> {
    let host = parsed
        .host()
        .ok_or_else(|| DreamEchoError::Validation("URL has no host".to_string()))?;

    let ip = match host {
        Host::Domain(domain) => {
            if is_forbidden_hostname(domain) {
                return Err(DreamEchoError::Validation(format!(
                    "forbidden host: {}",
                    domain
                )));
            }
            return Ok(());
        }
        Host::Ipv4(v4) => IpAddr::V4(v4),
        Host::Ipv6(v6) => IpAddr::V6(v6),
    };

    if is_private_ip(&ip) {
        return Err(DreamEchoError::Validation(format!(
            "private IP address not allowed: {}",
            ip
        )));
    }

    Ok(())
}

/// Hostnames that resolve inside the local network.
fn is_forbidden_hostname(host: &str) -> bool {
    const FORBIDDEN_SUFFIXES: [&str; 7] = [
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

/// Check if an IP address is private/reserved.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, _] = v4.octets();
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                // "This network" 0.0.0.0/8
                || a == 0
                // Carrier-grade NAT 100.64.0.0/10
                || (a == 100 && (b & 0xc0) == 64)
                // Documentation ranges
                || (a, b, c) == (192, 0, 2)
                || (a, b, c) == (198, 51, 100)
                || (a, b, c) == (203, 0, 113)
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                // Unique local fc00::/7
                || (first & 0xfe00) == 0xfc00
                // Link-local fe80::/10
                || (first & 0xffc0) == 0xfe80
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(&IpAddr::V4(v4)))
        }
    }
}
