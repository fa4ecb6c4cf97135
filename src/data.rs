use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use trust_dns_proto::rr::{self, RData};

/// A site taken from the command line, reduced to the host we run lookups against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteRef {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

// Every completed lookup becomes one of these. The variant only decides how the record is
// dispatched, it is never part of the printed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Whois(WhoisReport),
    Dns(DnsReport),
}

impl LookupResult {
    pub fn host(&self) -> &str {
        match self {
            LookupResult::Whois(report) => &report.host,
            LookupResult::Dns(report) => &report.host,
        }
    }

    /// `whois`, or the DNS record type.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupResult::Whois(_) => "whois",
            LookupResult::Dns(report) => report.kind.as_str(),
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            LookupResult::Whois(report) => report.error().is_some(),
            LookupResult::Dns(report) => report.error().is_some(),
        }
    }
}

/// Structured fields pulled out of a registry response. Serialized flat into the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegistryFields(pub BTreeMap<String, Value>);

impl RegistryFields {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WhoisOutcome {
    Registry(RegistryFields),
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhoisReport {
    pub host: String,
    pub domain: String,
    #[serde(flatten)]
    pub outcome: WhoisOutcome,
}

impl WhoisReport {
    pub fn registry(&self) -> Option<&RegistryFields> {
        match &self.outcome {
            WhoisOutcome::Registry(fields) => Some(fields),
            WhoisOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            WhoisOutcome::Error { error } => Some(error),
            WhoisOutcome::Registry(_) => None,
        }
    }
}

/// The three record types queried for every host.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    A,
    AAAA,
    MX,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::A, RecordKind::AAAA, RecordKind::MX];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::AAAA => "AAAA",
            RecordKind::MX => "MX",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RecordKind> for rr::RecordType {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::A => rr::RecordType::A,
            RecordKind::AAAA => rr::RecordType::AAAA,
            RecordKind::MX => rr::RecordType::MX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DnsRecord {
    Address { address: IpAddr, ttl: u32 },
    Mail { exchange: String, priority: u16, ttl: u32 },
}

impl DnsRecord {
    // Converts an answer record, skipping anything that isn't an address or mail exchanger
    // (CNAMEs picked up on the way to the answer land here).
    pub(crate) fn from_record(record: &rr::Record) -> Option<DnsRecord> {
        let ttl = record.ttl();
        match record.data()? {
            RData::A(a) => Some(Self::Address {
                address: IpAddr::V4(a.0),
                ttl,
            }),
            RData::AAAA(aaaa) => Some(Self::Address {
                address: IpAddr::V6(aaaa.0),
                ttl,
            }),
            RData::MX(mx) => Some(Self::Mail {
                exchange: mx.exchange().to_utf8(),
                priority: mx.preference(),
                ttl,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DnsOutcome {
    Data { data: Vec<DnsRecord> },
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsReport {
    pub host: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(flatten)]
    pub outcome: DnsOutcome,
}

impl DnsReport {
    pub fn data(&self) -> Option<&[DnsRecord]> {
        match &self.outcome {
            DnsOutcome::Data { data } => Some(data),
            DnsOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            DnsOutcome::Error { error } => Some(error),
            DnsOutcome::Data { .. } => None,
        }
    }
}
