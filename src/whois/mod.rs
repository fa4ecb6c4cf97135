mod parse;

pub use parse::parse;

use crate::data::{SiteRef, WhoisOutcome, WhoisReport};
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument, warn};
use whois_rust::{WhoIs, WhoIsLookupOptions};

// node-whois style server map, keyed by TLD. `_` holds the server used for IP queries.
const DEFAULT_SERVERS: &str = include_str!("servers.json");

/// Anything that can answer a WHOIS query for a domain with the raw registry response.
#[async_trait]
pub trait WhoisSource: Send + Sync {
    async fn query(&self, domain: &str) -> Result<String>;
}

/// WHOIS client backed by `whois-rust`, following registrar referrals.
pub struct WhoisClient {
    whois: WhoIs,
    follow: u16,
    timeout: Duration,
}

impl WhoisClient {
    /// Builds a client from the server list compiled into the binary.
    pub fn new() -> Result<Self> {
        Ok(Self::with_servers(WhoIs::from_string(DEFAULT_SERVERS)?))
    }

    /// Builds a client from a node-whois style `servers.json` on disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_servers(WhoIs::from_path_async(path).await?))
    }

    fn with_servers(whois: WhoIs) -> Self {
        Self {
            whois,
            follow: 2,
            timeout: Duration::from_secs(5),
        }
    }

    /// Builder method that sets the connection timeout. Defaults to 5 seconds
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Duration::from_secs(timeout);
        self
    }

    /// Builder method that sets how many referrals are followed. Defaults to 2
    pub fn follow(mut self, follow: u16) -> Self {
        self.follow = follow;
        self
    }
}

#[async_trait]
impl WhoisSource for WhoisClient {
    async fn query(&self, domain: &str) -> Result<String> {
        let mut options = WhoIsLookupOptions::from_string(domain)?;
        options.follow = self.follow;
        options.timeout = Some(self.timeout);
        Ok(self.whois.lookup_async(options).await?)
    }
}

/// Returns the last two labels of `host`, which is what gets sent to the registry.
///
/// This doesn't know about multi-label public suffixes: `www.example.co.uk` becomes `co.uk`.
pub fn registrable_domain(host: &str) -> String {
    let host = host.strip_suffix('.').unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Runs the WHOIS lookup for a site. Failures end up in the report instead of being returned.
#[instrument(level = "debug", skip(source, site), fields(host = %site.host))]
pub async fn lookup<W>(source: &W, site: &SiteRef) -> WhoisReport
where
    W: WhoisSource + ?Sized,
{
    let domain = registrable_domain(&site.host);

    let outcome = match source.query(&domain).await {
        Ok(raw) => {
            let fields = parse(&raw);
            info!("whois for {} returned {} fields", domain, fields.0.len());
            WhoisOutcome::Registry(fields)
        }
        Err(e) => {
            warn!("whois for {} failed: {}", domain, e);
            WhoisOutcome::Error {
                error: e.to_string(),
            }
        }
    };

    WhoisReport {
        host: site.host.clone(),
        domain,
        outcome,
    }
}
