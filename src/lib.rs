extern crate trust_dns_resolver;

mod data;
mod error;
mod input;
mod lookup;
mod output;
mod site;

pub mod dns;
pub mod whois;

pub use crate::data::{
    DnsOutcome, DnsRecord, DnsReport, LookupResult, RecordKind, RegistryFields, SiteRef,
    WhoisOutcome, WhoisReport,
};
pub use crate::dns::{DnsClient, DnsClientBuilder, DnsSource};
pub use crate::error::WhoissError;
pub use crate::input::Input;
pub use crate::lookup::Lookup;
pub use crate::output::print_results;
pub use crate::whois::{WhoisClient, WhoisSource};
pub type Result<T> = std::result::Result<T, WhoissError>;
