use crate::data::RegistryFields;
use serde_json::Value;
use std::collections::BTreeMap;

// Registries phrase "this domain isn't registered" in many ways; these cover the common ones.
const NOT_FOUND: &[&str] = &[
    "no match for",
    "not found",
    "no data found",
    "no entries found",
    "no object found",
    "status: free",
    "status: available",
    "is available for registration",
];

#[derive(Clone, Copy)]
enum Field {
    Single(&'static str),
    List(&'static str),
}

fn field(key: &str) -> Option<Field> {
    use Field::*;
    let field = match key {
        "domain name" | "domain" | "domain_name" => Single("domainName"),
        "registrar" | "registrar name" | "sponsoring registrar" => Single("registrar"),
        "registrar url" => Single("registrarUrl"),
        "registrar iana id" => Single("registrarIanaId"),
        "registrar whois server" | "whois server" | "whois" | "refer" => Single("whoisServer"),
        "creation date" | "created" | "created on" | "registered on" | "registration time"
        | "domain registration date" => Single("creationDate"),
        "updated date" | "last updated" | "last modified" | "last-update" | "changed" => {
            Single("updatedDate")
        }
        "registry expiry date"
        | "registrar registration expiration date"
        | "expiration date"
        | "expiry date"
        | "expires"
        | "expires on"
        | "paid-till"
        | "expiration time" => Single("expirationDate"),
        "dnssec" => Single("dnssec"),
        "registrant organization" | "registrant" => Single("registrantOrganization"),
        "registrant country" | "registrant country/economy" => Single("registrantCountry"),
        "domain status" | "status" | "state" => List("status"),
        "name server" | "name servers" | "nameserver" | "nameservers" | "nserver" => {
            List("nameServers")
        }
        _ => return None,
    };
    Some(field)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>")
}

/// Pulls the well known registration fields out of a raw WHOIS response.
///
/// Handles both the `Key: value` layout used by most gTLD registries and the
/// indented block layout (`Name servers:` followed by one value per line) used by
/// registries such as Nominet. Keys that aren't recognised are dropped, and
/// `isAvailable` is always set.
pub fn parse(raw: &str) -> RegistryFields {
    let mut fields = Fields::default();
    let mut pending: Option<Field> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            pending = None;
            continue;
        }
        if is_comment(trimmed) {
            continue;
        }

        // Indented continuation of a key-only header line.
        if let Some(field) = pending {
            if line.starts_with(char::is_whitespace) && !looks_like_pair(trimmed) {
                fields.add(field, trimmed);
                continue;
            }
            pending = None;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let Some(field) = field(&key.trim().to_ascii_lowercase()) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            pending = Some(field);
        } else {
            fields.add(field, value);
        }
    }

    let lower = raw.to_ascii_lowercase();
    let available =
        !fields.has("creationDate") && NOT_FOUND.iter().any(|marker| lower.contains(marker));
    fields.finish(available)
}

// A line inside a block that itself reads as `Known key: value` starts a new field.
fn looks_like_pair(line: &str) -> bool {
    match line.split_once(':') {
        Some((key, value)) => {
            !value.trim().is_empty() && field(&key.trim().to_ascii_lowercase()).is_some()
        }
        None => false,
    }
}

#[derive(Default)]
struct Fields {
    single: BTreeMap<&'static str, String>,
    lists: BTreeMap<&'static str, Vec<String>>,
}

impl Fields {
    fn has(&self, name: &str) -> bool {
        self.single.contains_key(name)
    }

    fn add(&mut self, field: Field, value: &str) {
        match field {
            // First value wins, the thin registry answer comes before any referral.
            Field::Single(name) => {
                self.single
                    .entry(name)
                    .or_insert_with(|| value.to_string());
            }
            Field::List(name) => {
                // "clientTransferProhibited https://icann.org/epp#..." keeps only the code,
                // "ns1.example.com 192.0.2.1" keeps only the host.
                let Some(first) = value.split_whitespace().next() else {
                    return;
                };
                let value = if name == "nameServers" {
                    first.trim_end_matches('.').to_ascii_lowercase()
                } else {
                    first.to_string()
                };
                let values = self.lists.entry(name).or_default();
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
    }

    fn finish(self, available: bool) -> RegistryFields {
        let mut map: BTreeMap<String, Value> = self
            .single
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        map.extend(
            self.lists
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::from(v))),
        );
        map.insert("isAvailable".to_string(), Value::Bool(available));
        RegistryFields(map)
    }
}
