//! Domain-level records exchanged with the planner.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// DNS record types understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Ptr,
    Ns,
    Mx,
    Cname,
    Rp,
    Txt,
    Soa,
    Hinfo,
    Srv,
    Dane,
    Tlsa,
    Ds,
    Caa,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown record type '{0}'")]
pub struct UnknownRecordType(pub String);

impl RecordType {
    pub const ALL: [RecordType; 15] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Ptr,
        RecordType::Ns,
        RecordType::Mx,
        RecordType::Cname,
        RecordType::Rp,
        RecordType::Txt,
        RecordType::Soa,
        RecordType::Hinfo,
        RecordType::Srv,
        RecordType::Dane,
        RecordType::Tlsa,
        RecordType::Ds,
        RecordType::Caa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Ptr => "PTR",
            RecordType::Ns => "NS",
            RecordType::Mx => "MX",
            RecordType::Cname => "CNAME",
            RecordType::Rp => "RP",
            RecordType::Txt => "TXT",
            RecordType::Soa => "SOA",
            RecordType::Hinfo => "HINFO",
            RecordType::Srv => "SRV",
            RecordType::Dane => "DANE",
            RecordType::Tlsa => "TLSA",
            RecordType::Ds => "DS",
            RecordType::Caa => "CAA",
        }
    }

    /// Types the synchronizer manages. Everything else in a zone (SOA,
    /// provider-only types) is left alone.
    pub fn is_managed(&self) -> bool {
        matches!(
            self,
            RecordType::A
                | RecordType::Aaaa
                | RecordType::Cname
                | RecordType::Mx
                | RecordType::Ns
                | RecordType::Srv
                | RecordType::Txt
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownRecordType(s.to_string()))
    }
}

/// A desired (or observed) record as the planner sees it.
///
/// `dns_name` carries no trailing dot; `record_ttl` of 0 means the
/// provider default. Only the first target is synchronized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub dns_name: String,
    pub record_type: RecordType,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(rename = "recordTTL", default)]
    pub record_ttl: u64,
}

impl Endpoint {
    pub fn new(
        dns_name: impl Into<String>,
        record_type: RecordType,
        ttl: u64,
        target: impl Into<String>,
    ) -> Self {
        Self {
            dns_name: dns_name.into(),
            record_type,
            targets: vec![target.into()],
            record_ttl: ttl,
        }
    }

    /// First target value, or empty when the endpoint has none.
    pub fn target(&self) -> &str {
        self.targets.first().map(String::as_str).unwrap_or_default()
    }
}

/// Changeset computed by the planner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Changes {
    #[serde(rename = "Create", alias = "create", default)]
    pub create: Vec<Endpoint>,
    /// Previous state of updated records. Carried for wire compatibility;
    /// updates are driven by `update_new` alone.
    #[serde(rename = "UpdateOld", alias = "updateOld", default)]
    pub update_old: Vec<Endpoint>,
    #[serde(rename = "UpdateNew", alias = "updateNew", default)]
    pub update_new: Vec<Endpoint>,
    #[serde(rename = "Delete", alias = "delete", default)]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update_new.is_empty() && self.delete.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_parses_wire_names() {
        assert_eq!("AAAA".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert_eq!("CNAME".parse::<RecordType>().unwrap(), RecordType::Cname);
        assert!("NAPTR".parse::<RecordType>().is_err());
        assert!("a".parse::<RecordType>().is_err());
    }

    #[test]
    fn record_type_serializes_uppercase() {
        let json = serde_json::to_string(&RecordType::Tlsa).unwrap();
        assert_eq!(json, "\"TLSA\"");
        for t in RecordType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn soa_is_not_managed() {
        assert!(!RecordType::Soa.is_managed());
        assert!(RecordType::A.is_managed());
        assert!(RecordType::Txt.is_managed());
    }

    #[test]
    fn changes_accept_external_dns_payload() {
        let body = serde_json::json!({
            "Create": [{"dnsName": "www.example.com", "recordType": "A", "targets": ["1.2.3.4"], "recordTTL": 300}],
            "UpdateOld": [],
            "UpdateNew": []
        });
        let changes: Changes = serde_json::from_value(body).unwrap();
        assert_eq!(changes.create.len(), 1);
        assert_eq!(changes.create[0].record_ttl, 300);
        assert_eq!(changes.create[0].target(), "1.2.3.4");
        assert!(changes.delete.is_empty());
    }

    #[test]
    fn endpoint_without_targets_has_empty_target() {
        let ep = Endpoint {
            dns_name: "x.example.com".into(),
            record_type: RecordType::A,
            targets: vec![],
            record_ttl: 0,
        };
        assert_eq!(ep.target(), "");
    }
}
