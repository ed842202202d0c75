use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::endpoint::RecordType;

/// A zone as returned by `GET /zones`. Unused fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String, // "example.com", no trailing dot
}

/// A record in provider terms. `id` stays empty until the provider assigns
/// one, and a `ttl` of 0 means the zone default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub id: String,
    pub zone_id: String,
    pub name: String,
    pub record_type: RecordType,
    pub ttl: u64,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub total_entries: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl Meta {
    /// Whether another page follows `page`.
    pub fn has_more(meta: &Option<Meta>, page: u32) -> bool {
        meta.as_ref()
            .and_then(|m| m.pagination.as_ref())
            .is_some_and(|p| p.last_page > page)
    }
}

#[derive(Debug, Deserialize)]
pub struct ZonesResponse {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Record as it travels over the wire. The type stays a string so that
/// listings containing types we do not model still decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl From<&ProviderRecord> for WireRecord {
    fn from(r: &ProviderRecord) -> Self {
        Self {
            id: r.id.clone(),
            zone_id: r.zone_id.clone(),
            record_type: r.record_type.as_str().to_string(),
            name: r.name.clone(),
            value: r.value.clone(),
            ttl: (r.ttl > 0).then_some(r.ttl),
        }
    }
}

impl WireRecord {
    /// Convert into a `ProviderRecord`, dropping unknown record types.
    pub fn into_record(self) -> Option<ProviderRecord> {
        let record_type = match self.record_type.parse::<RecordType>() {
            Ok(t) => t,
            Err(err) => {
                trace!(name = %self.name, %err, "ignoring record");
                return None;
            }
        };
        Some(ProviderRecord {
            id: self.id,
            zone_id: self.zone_id,
            name: self.name,
            record_type,
            ttl: self.ttl.unwrap_or_default(),
            value: self.value,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Serialize)]
pub struct BulkRecordsRequest {
    pub records: Vec<WireRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BulkCreateResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
    #[serde(default)]
    pub valid_records: Vec<WireRecord>,
    #[serde(default)]
    pub invalid_records: Vec<WireRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BulkUpdateResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
    #[serde(default)]
    pub failed_records: Vec<WireRecord>,
}

/// HTTP-level failure of a bulk call that was not fatal to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub status: u16,
    pub body: String,
}

/// Aggregate result of a bulk create or update.
///
/// Rejected entries are kept as wire records since the provider may echo
/// back types or fields we do not model.
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub accepted: Vec<WireRecord>,
    pub rejected: Vec<WireRecord>,
    pub failure: Option<BulkFailure>,
}

impl BulkOutcome {
    pub fn failed(status: u16, body: String) -> Self {
        Self {
            failure: Some(BulkFailure { status, body }),
            ..Self::default()
        }
    }
}

impl From<BulkCreateResponse> for BulkOutcome {
    fn from(resp: BulkCreateResponse) -> Self {
        // Older API revisions only fill `records`.
        let accepted = if resp.valid_records.is_empty() {
            resp.records
        } else {
            resp.valid_records
        };
        Self {
            accepted,
            rejected: resp.invalid_records,
            failure: None,
        }
    }
}

impl From<BulkUpdateResponse> for BulkOutcome {
    fn from(resp: BulkUpdateResponse) -> Self {
        Self {
            accepted: resp.records,
            rejected: resp.failed_records,
            failure: None,
        }
    }
}
