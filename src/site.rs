use crate::data::SiteRef;
use tracing::debug;
use url::{Host, Url};

const SCHEMES: [&str; 2] = ["http://", "https://"];

impl SiteRef {
    /// Turns a command line argument into a `SiteRef`. Anything that looks like an http(s) URL
    /// is reduced to its host, everything else is passed through untouched as the host.
    pub fn parse(raw: &str) -> SiteRef {
        if looks_like_url(raw) {
            match Url::parse(raw) {
                Ok(url) => {
                    if let Some(host) = url.host() {
                        let host = match host {
                            Host::Domain(domain) => domain.to_string(),
                            Host::Ipv4(ip) => ip.to_string(),
                            Host::Ipv6(ip) => ip.to_string(),
                        };
                        return SiteRef {
                            host,
                            href: Some(url.to_string()),
                        };
                    }
                }
                Err(e) => debug!("{} is not a valid url ({}), using it as a host", raw, e),
            }
        }

        SiteRef {
            host: raw.to_string(),
            href: None,
        }
    }
}

fn looks_like_url(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}
