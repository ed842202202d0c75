//! Snapshot of the records currently held by the provider.
use tracing::debug;

use crate::endpoint::{Endpoint, RecordType};
use crate::error::ProviderError;
use crate::hetzner::{DnsApi, ProviderRecord};
use crate::zones::ZoneIndex;

/// Records across all indexed zones, with names normalized to a trailing dot.
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    records: Vec<ProviderRecord>,
}

impl RecordSnapshot {
    /// List every indexed zone. The first failing zone aborts the snapshot.
    pub async fn fetch<A>(
        api: &A,
        index: &ZoneIndex,
        is_supported: impl Fn(RecordType) -> bool,
    ) -> Result<Self, ProviderError>
    where
        A: DnsApi + ?Sized,
    {
        let mut records = Vec::new();
        for zone in index.zones() {
            debug!(zone = %zone.name, "fetching records");
            let listed = api
                .list_records(&zone.id)
                .await
                .map_err(|source| ProviderError::Zone {
                    zone: zone.name.clone(),
                    source: Box::new(source),
                })?;

            records.extend(
                listed
                    .into_iter()
                    .filter(|r| is_supported(r.record_type))
                    .map(|mut r| {
                        r.name = normalize_name(&r.name, &zone.name);
                        r
                    }),
            );
        }
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<ProviderRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    /// Provider id of the record with the same name and type.
    pub fn find_id(&self, name: &str, record_type: RecordType) -> Option<&str> {
        let name = ensure_trailing_dot(name);
        self.records
            .iter()
            .find(|r| r.name == name && r.record_type == record_type)
            .map(|r| r.id.as_str())
    }

    /// Observed state as planner-facing endpoints.
    pub fn to_endpoints(&self) -> Vec<Endpoint> {
        self.records
            .iter()
            .map(|r| {
                Endpoint::new(
                    r.name.trim_end_matches('.'),
                    r.record_type,
                    r.ttl,
                    r.value.clone(),
                )
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `@` is the zone apex; everything else only gains a trailing dot.
pub fn normalize_name(raw: &str, zone_name: &str) -> String {
    if raw == "@" {
        ensure_trailing_dot(zone_name)
    } else {
        ensure_trailing_dot(raw)
    }
}

pub fn ensure_trailing_dot(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}
