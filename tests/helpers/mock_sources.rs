#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use whoiss::{DnsRecord, DnsSource, RecordKind, Result, WhoisSource, WhoissError};

// ============================================================================
// Mock WhoisSource
// ============================================================================

pub struct MockWhois {
    failing: HashSet<String>,
    calls: Arc<AtomicUsize>,
}

impl MockWhois {
    pub fn new() -> Self {
        Self {
            failing: HashSet::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_for(domains: &[&str]) -> Self {
        Self {
            failing: domains.iter().map(|d| d.to_string()).collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl WhoisSource for MockWhois {
    async fn query(&self, domain: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.failing.contains(domain) {
            return Err(WhoissError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                format!("connection reset by {}", domain),
            )));
        }
        Ok(format!(
            "Domain Name: {}\nRegistrar: Mock Registrar\nCreation Date: 2000-01-01T00:00:00Z\n",
            domain.to_uppercase()
        ))
    }
}

// ============================================================================
// Mock DnsSource
// ============================================================================

pub struct MockDns {
    without_mx: HashSet<String>,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockDns {
    pub fn new() -> Self {
        Self {
            without_mx: HashSet::new(),
            delay: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn without_mx(hosts: &[&str]) -> Self {
        Self {
            without_mx: hosts.iter().map(|h| h.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn peak(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.peak)
    }
}

#[async_trait]
impl DnsSource for MockDns {
    async fn query(&self, host: &str, kind: RecordKind) -> Result<Vec<DnsRecord>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match kind {
            RecordKind::A => Ok(vec![DnsRecord::Address {
                address: "192.0.2.10".parse().unwrap(),
                ttl: 300,
            }]),
            RecordKind::AAAA => Ok(vec![DnsRecord::Address {
                address: "2001:db8::10".parse().unwrap(),
                ttl: 300,
            }]),
            RecordKind::MX if self.without_mx.contains(host) => Err(WhoissError::NoRecords {
                host: host.to_string(),
                kind,
            }),
            RecordKind::MX => Ok(vec![DnsRecord::Mail {
                exchange: format!("mail.{}.", host),
                priority: 10,
                ttl: 3600,
            }]),
        }
    }
}
