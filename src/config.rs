use crate::filter::{DomainFilter, ZoneIdFilter};
use crate::hetzner::DEFAULT_BASE_URL;

/// Construction-time settings for the provider.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_token: String,
    pub base_url: String, // e.g. "https://dns.hetzner.com/api/v1"
    pub dry_run: bool,
    pub domain_filter: DomainFilter,
    pub zone_id_filter: ZoneIdFilter,
}

impl ProviderConfig {
    /// Config against the public API with no filtering.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            dry_run: false,
            domain_filter: DomainFilter::default(),
            zone_id_filter: ZoneIdFilter::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_domain_filter(mut self, filter: DomainFilter) -> Self {
        self.domain_filter = filter;
        self
    }

    pub fn with_zone_id_filter(mut self, filter: ZoneIdFilter) -> Self {
        self.zone_id_filter = filter;
        self
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .field("domain_filter", &self.domain_filter)
            .field("zone_id_filter", &self.zone_id_filter)
            .finish()
    }
}
