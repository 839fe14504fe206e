//! Host name normalization.
//!
//! A normalizer turns caller input into an ASCII, lower-case host and its
//! labels. Empty labels are passed through; the resolver rejects them.

use url::{Host, Url};

use crate::error::{PslError, Result};

/// A normalized host and its labels, leftmost label first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDomain {
    /// Normalized host, e.g. "www.example.co.uk"
    pub host: String,
    /// Labels in host order, e.g. ["www", "example", "co", "uk"]
    pub labels: Vec<String>,
}

impl NormalizedDomain {
    fn from_host(host: String) -> Self {
        let labels = host.split('.').map(str::to_string).collect();
        Self { host, labels }
    }
}

/// Trait for host normalizers
pub trait DomainNormalizer: Send + Sync {
    /// Normalize a host name and split it into labels.
    fn normalize(&self, domain: &str) -> Result<NormalizedDomain>;
}

/// URL-based normalizer: IDNA to punycode, lower-casing.
///
/// Input may be a bare host ("www.Example.com") or a URL with a scheme
/// ("https://www.example.com/path"); only the host is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlNormalizer;

impl DomainNormalizer for UrlNormalizer {
    fn normalize(&self, domain: &str) -> Result<NormalizedDomain> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(PslError::InvalidInput("empty domain".to_string()));
        }

        let url = if domain.contains("://") {
            Url::parse(domain)
        } else {
            Url::parse(&format!("http://{domain}"))
        }
        .map_err(|e| PslError::InvalidInput(format!("{domain}: {e}")))?;

        match url.host() {
            Some(Host::Domain(host)) => Ok(NormalizedDomain::from_host(host.to_string())),
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Err(PslError::InvalidInput(format!(
                "{domain}: IP addresses have no public suffix"
            ))),
            None => Err(PslError::InvalidInput(format!("{domain}: no host"))),
        }
    }
}

/// Plain ASCII normalizer: trims, lower-cases and splits on `.`.
///
/// Rejects non-ASCII input instead of converting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiNormalizer;

impl DomainNormalizer for AsciiNormalizer {
    fn normalize(&self, domain: &str) -> Result<NormalizedDomain> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(PslError::InvalidInput("empty domain".to_string()));
        }
        if !domain.is_ascii() {
            return Err(PslError::InvalidInput(format!(
                "{domain}: non-ASCII host, use UrlNormalizer for IDNA"
            )));
        }
        Ok(NormalizedDomain::from_host(domain.to_ascii_lowercase()))
    }
}
