use crate::data::{DnsOutcome, DnsRecord, DnsReport, RecordKind, SiteRef};
use crate::{Result, WhoissError};
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use tracing::{info, instrument, warn};
use trust_dns_resolver::{
    config::NameServerConfigGroup, config::ResolverConfig, config::ResolverOpts, lookup::Lookup,
    system_conf, TokioAsyncResolver,
};

/// Anything that can answer a single record-type query for a host.
#[async_trait]
pub trait DnsSource: Send + Sync {
    async fn query(&self, host: &str, kind: RecordKind) -> Result<Vec<DnsRecord>>;
}

/// Collects the resolver configuration before the `TokioAsyncResolver` is built.
#[derive(Debug, Clone)]
pub struct DnsClientBuilder {
    config: ResolverConfig,
    options: ResolverOpts,
}

impl Default for DnsClientBuilder {
    fn default() -> Self {
        let (config, mut options) = match system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                warn!("unable to read system resolver config ({}), using public resolvers", e);
                let group = NameServerConfigGroup::from_ips_clear(&public_nameservers(), 53, true);
                (
                    ResolverConfig::from_parts(None, vec![], group),
                    ResolverOpts::default(),
                )
            }
        };
        options.timeout = Duration::from_secs(5);
        options.attempts = 2;

        DnsClientBuilder { config, options }
    }
}

fn public_nameservers() -> Vec<IpAddr> {
    vec![
        // Google
        IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
        IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)),
        IpAddr::V6(Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888)),
        IpAddr::V6(Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8844)),
        // CloudFlare
        IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
        IpAddr::V4(Ipv4Addr::new(1, 0, 0, 1)),
        IpAddr::V6(Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1111)),
        IpAddr::V6(Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1001)),
    ]
}

impl DnsClientBuilder {
    /// Builder method that sets the timeout for each request. Defaults to 5 seconds
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.options.timeout = Duration::from_secs(timeout);
        self
    }

    /// Replaces the nameservers with the ones listed in `path`, one IP address per line.
    pub fn load_resolvers(mut self, path: &str) -> Result<Self> {
        let file = std::fs::read_to_string(path).map_err(|source| WhoissError::ReadFile {
            path: path.to_string(),
            source,
        })?;
        let ips = parse_nameservers(&file)?;
        info!("loaded {} nameservers from {}", ips.len(), path);
        let group = NameServerConfigGroup::from_ips_clear(&ips, 53, true);
        self.config = ResolverConfig::from_parts(None, vec![], group);
        Ok(self)
    }

    pub fn build(self) -> DnsClient {
        DnsClient {
            resolver: TokioAsyncResolver::tokio(self.config, self.options),
        }
    }
}

fn parse_nameservers(contents: &str) -> Result<Vec<IpAddr>> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.parse::<IpAddr>().map_err(WhoissError::from))
        .collect()
}

/// DNS client backed by trust-dns.
#[derive(Clone)]
pub struct DnsClient {
    resolver: TokioAsyncResolver,
}

impl DnsClient {
    pub fn builder() -> DnsClientBuilder {
        DnsClientBuilder::default()
    }
}

#[async_trait]
impl DnsSource for DnsClient {
    async fn query(&self, host: &str, kind: RecordKind) -> Result<Vec<DnsRecord>> {
        let lookup = self.resolver.lookup(host, kind.into()).await?;
        records(&lookup, host, kind)
    }
}

// An answer holding nothing of the asked type (only a CNAME, say) counts as a failed lookup.
fn records(lookup: &Lookup, host: &str, kind: RecordKind) -> Result<Vec<DnsRecord>> {
    let records: Vec<DnsRecord> = lookup
        .record_iter()
        .filter_map(DnsRecord::from_record)
        .collect();

    if records.is_empty() {
        return Err(WhoissError::NoRecords {
            host: host.to_string(),
            kind,
        });
    }
    Ok(records)
}

async fn query<D>(source: &D, host: &str, kind: RecordKind) -> DnsReport
where
    D: DnsSource + ?Sized,
{
    let outcome = match source.query(host, kind).await {
        Ok(data) => {
            info!("got {} {} records for {}", data.len(), kind, host);
            DnsOutcome::Data { data }
        }
        Err(e) => {
            warn!("{} lookup for {} failed: {}", kind, host, e);
            DnsOutcome::Error {
                error: e.to_string(),
            }
        }
    };

    DnsReport {
        host: host.to_string(),
        kind,
        outcome,
    }
}

/// Queries A, AAAA and MX for a site at the same time and waits for all three. Each report
/// carries its own data or error.
#[instrument(level = "debug", skip(source, site), fields(host = %site.host))]
pub async fn lookup<D>(source: &D, site: &SiteRef) -> [DnsReport; 3]
where
    D: DnsSource + ?Sized,
{
    let host = site.host.as_str();
    let (a, aaaa, mx) = futures::join!(
        query(source, host, RecordKind::A),
        query(source, host, RecordKind::AAAA),
        query(source, host, RecordKind::MX),
    );
    [a, aaaa, mx]
}
