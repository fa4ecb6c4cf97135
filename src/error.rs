use std::io;
use std::net::AddrParseError;
use thiserror::Error;
use trust_dns_resolver::error::ResolveError;
use whois_rust::WhoIsError;

use crate::data::RecordKind;

#[derive(Debug, Error)]
pub enum WhoissError {
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("whois lookup failed: {0}")]
    Whois(#[from] WhoIsError),
    #[error("invalid nameserver address: {0}")]
    AddrParse(#[from] AddrParseError),
    #[error("no {kind} records found for {host}")]
    NoRecords { host: String, kind: RecordKind },
    #[error("tried to read file {path} got {source}")]
    ReadFile { path: String, source: io::Error },
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("unable to initialise logging: {0}")]
    Logging(String),
}
