//! Reconciliation of a planned changeset against the provider.
//!
//! Each call to [`HetznerProvider::apply_changes`] runs one cycle:
//! discover zones, snapshot the records they hold, then create, update and
//! delete in that order. Only the first two steps can fail the cycle; every
//! later failure is logged, counted in the [`ApplyReport`] and skipped.
use tracing::{debug, error, info, warn};

use crate::config::ProviderConfig;
use crate::endpoint::{Changes, Endpoint};
use crate::error::ProviderError;
use crate::filter::{DomainFilter, ZoneIdFilter};
use crate::hetzner::{BulkOutcome, DnsApi, HetznerClient, ProviderRecord};
use crate::records::{RecordSnapshot, ensure_trailing_dot};
use crate::zones::ZoneIndex;

/// Per-cycle tally. In dry-run mode the counts are intended actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub dry_run: bool,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct HetznerProvider<A = HetznerClient> {
    api: A,
    dry_run: bool,
    domain_filter: DomainFilter,
    zone_id_filter: ZoneIdFilter,
}

impl HetznerProvider<HetznerClient> {
    pub fn new(config: ProviderConfig) -> Self {
        let api = HetznerClient::new(&config.base_url, &config.api_token);
        Self::with_api(api, config)
    }
}

impl<A: DnsApi> HetznerProvider<A> {
    pub fn with_api(api: A, config: ProviderConfig) -> Self {
        Self {
            api,
            dry_run: config.dry_run,
            domain_filter: config.domain_filter,
            zone_id_filter: config.zone_id_filter,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn domain_filter(&self) -> &DomainFilter {
        &self.domain_filter
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    async fn zone_index(&self) -> Result<ZoneIndex, ProviderError> {
        let zones = self.api.list_zones().await?;
        let index = ZoneIndex::build(zones, &self.domain_filter, &self.zone_id_filter);
        debug!(zones = index.len(), "built zone index");
        Ok(index)
    }

    async fn snapshot(&self, index: &ZoneIndex) -> Result<RecordSnapshot, ProviderError> {
        let snapshot = RecordSnapshot::fetch(&self.api, index, |t| t.is_managed()).await?;
        debug!(records = snapshot.len(), "took record snapshot");
        Ok(snapshot)
    }

    /// Currently observed records of all managed zones.
    pub async fn records(&self) -> Result<Vec<Endpoint>, ProviderError> {
        let index = self.zone_index().await?;
        let snapshot = self.snapshot(&index).await?;
        Ok(snapshot.to_endpoints())
    }

    /// Apply one changeset. Errors only when zones or records cannot be
    /// listed; mutation failures end up in the report.
    pub async fn apply_changes(&self, changes: &Changes) -> Result<ApplyReport, ProviderError> {
        let index = self.zone_index().await?;
        let snapshot = self.snapshot(&index).await?;

        let mut report = ApplyReport {
            dry_run: self.dry_run,
            ..ApplyReport::default()
        };

        self.create_records(&changes.create, &index, &mut report).await;
        self.update_records(&changes.update_new, &index, &snapshot, &mut report).await;
        self.delete_records(&changes.delete, &snapshot, &mut report).await;

        info!(
            created = report.created,
            updated = report.updated,
            deleted = report.deleted,
            skipped = report.skipped,
            failed = report.failed,
            dry_run = report.dry_run,
            "applied changes"
        );
        Ok(report)
    }

    async fn create_records(
        &self,
        endpoints: &[Endpoint],
        index: &ZoneIndex,
        report: &mut ApplyReport,
    ) {
        let mut batch = Vec::with_capacity(endpoints.len());
        for ep in endpoints {
            let Some(zone_id) = index.resolve_zone(&ep.dns_name) else {
                debug!(name = %ep.dns_name, "skipping create: no matching zone");
                report.skipped += 1;
                continue;
            };

            let mut record = endpoint_to_record(ep);
            record.zone_id = zone_id.to_string();
            if self.dry_run {
                log_intent("would create", &record);
            }
            batch.push(record);
        }

        if self.dry_run {
            report.created += batch.len();
            return;
        }
        if batch.is_empty() {
            return;
        }

        let outcome = self.api.bulk_create(&batch).await;
        let (ok, failed) = tally_bulk("create", batch.len(), outcome);
        report.created += ok;
        report.failed += failed;
    }

    async fn update_records(
        &self,
        endpoints: &[Endpoint],
        index: &ZoneIndex,
        snapshot: &RecordSnapshot,
        report: &mut ApplyReport,
    ) {
        let mut batch = Vec::with_capacity(endpoints.len());
        for ep in endpoints {
            let Some(zone_id) = index.resolve_zone(&ep.dns_name) else {
                debug!(name = %ep.dns_name, "skipping update: no matching zone");
                report.skipped += 1;
                continue;
            };

            let mut record = endpoint_to_record(ep);
            let Some(id) = snapshot.find_id(&record.name, record.record_type) else {
                debug!(
                    name = %ep.dns_name,
                    record_type = %ep.record_type,
                    "skipping update: record id not found"
                );
                report.skipped += 1;
                continue;
            };
            record.id = id.to_string();
            record.zone_id = zone_id.to_string();
            if self.dry_run {
                log_intent("would update", &record);
            }
            batch.push(record);
        }

        if self.dry_run {
            report.updated += batch.len();
            return;
        }
        if batch.is_empty() {
            return;
        }

        let outcome = self.api.bulk_update(&batch).await;
        let (ok, failed) = tally_bulk("update", batch.len(), outcome);
        report.updated += ok;
        report.failed += failed;
    }

    async fn delete_records(
        &self,
        endpoints: &[Endpoint],
        snapshot: &RecordSnapshot,
        report: &mut ApplyReport,
    ) {
        let mut batch = Vec::with_capacity(endpoints.len());
        for ep in endpoints {
            let mut record = endpoint_to_record(ep);
            match snapshot.find_id(&record.name, record.record_type) {
                Some(id) => record.id = id.to_string(),
                // Still sent; the provider answers with not-found and the
                // failure is counted below.
                None => debug!(name = %ep.dns_name, "record id not found for delete"),
            }
            if self.dry_run {
                log_intent("would delete", &record);
            }
            batch.push(record);
        }

        if self.dry_run {
            report.deleted += batch.len();
            return;
        }

        for record in &batch {
            match self.api.delete_record(record).await {
                Ok(()) => report.deleted += 1,
                Err(err) => {
                    error!(
                        id = %record.id,
                        name = %record.name,
                        record_type = %record.record_type,
                        error = %err,
                        "failed to delete record"
                    );
                    report.failed += 1;
                }
            }
        }
    }
}

fn endpoint_to_record(ep: &Endpoint) -> ProviderRecord {
    ProviderRecord {
        id: String::new(),
        zone_id: String::new(),
        name: ensure_trailing_dot(&ep.dns_name),
        record_type: ep.record_type,
        ttl: ep.record_ttl,
        value: ep.target().to_string(),
    }
}

fn log_intent(action: &str, record: &ProviderRecord) {
    info!(
        zone_id = %record.zone_id,
        id = %record.id,
        name = %record.name,
        record_type = %record.record_type,
        ttl = record.ttl,
        value = %record.value,
        "{action}"
    );
}

/// Returns (applied, failed) for one bulk submission.
fn tally_bulk(
    op: &'static str,
    submitted: usize,
    outcome: Result<BulkOutcome, ProviderError>,
) -> (usize, usize) {
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(op, error = %err, "bulk request failed");
            return (0, submitted);
        }
    };

    if let Some(failure) = outcome.failure {
        error!(op, status = failure.status, body = %failure.body, "bulk request rejected");
        return (0, submitted);
    }

    for rejected in &outcome.rejected {
        warn!(
            op,
            name = %rejected.name,
            record_type = %rejected.record_type,
            value = %rejected.value,
            "provider rejected record"
        );
    }
    let failed = outcome.rejected.len().min(submitted);
    (submitted - failed, failed)
}
