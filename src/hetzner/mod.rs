//! Hetzner DNS API client and wire types.
pub mod client;
pub mod types;

pub use client::{DEFAULT_BASE_URL, DnsApi, HetznerClient};
pub use types::{BulkFailure, BulkOutcome, ProviderRecord, WireRecord, Zone};
