//! Zone index: filtered zone listing plus owning-zone lookup.
use crate::filter::{DomainFilter, ZoneIdFilter};
use crate::hetzner::Zone;

/// Zones retained for one reconciliation cycle, in provider order.
#[derive(Debug, Clone, Default)]
pub struct ZoneIndex {
    zones: Vec<Zone>,
}

impl ZoneIndex {
    /// Keep the zones accepted by both filters.
    pub fn build(
        raw_zones: impl IntoIterator<Item = Zone>,
        domain_filter: &DomainFilter,
        zone_id_filter: &ZoneIdFilter,
    ) -> Self {
        let zones = raw_zones
            .into_iter()
            .filter(|z| zone_id_filter.matches(&z.id) && domain_filter.matches(&z.name))
            .collect();
        Self { zones }
    }

    /// Register a zone found outside the bulk listing. Re-adding a known id
    /// renames it.
    pub fn add(&mut self, zone_id: impl Into<String>, zone_name: impl Into<String>) {
        let id = zone_id.into();
        let name = zone_name.into().trim_end_matches('.').to_string();
        match self.zones.iter_mut().find(|z| z.id == id) {
            Some(zone) => zone.name = name,
            None => self.zones.push(Zone { id, name }),
        }
    }

    /// Id of the zone owning `fqdn`, chosen by longest suffix match on a
    /// label boundary. The first zone wins among equally long matches.
    pub fn resolve_zone(&self, fqdn: &str) -> Option<&str> {
        let name = fqdn.trim_end_matches('.');
        let mut best: Option<&Zone> = None;
        for zone in &self.zones {
            if !is_within(name, &zone.name) {
                continue;
            }
            if best.is_none_or(|b| zone.name.len() > b.name.len()) {
                best = Some(zone);
            }
        }
        best.map(|z| z.id.as_str())
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

fn is_within(name: &str, zone: &str) -> bool {
    let zone = zone.trim_end_matches('.');
    if zone.is_empty() {
        return false;
    }
    name == zone
        || name
            .strip_suffix(zone)
            .is_some_and(|head| head.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, name: &str) -> Zone {
        Zone {
            id: id.into(),
            name: name.into(),
        }
    }

    fn index(zones: Vec<Zone>) -> ZoneIndex {
        ZoneIndex::build(zones, &DomainFilter::default(), &ZoneIdFilter::default())
    }

    #[test]
    fn resolves_exact_and_subdomain() {
        let idx = index(vec![zone("z1", "example.com")]);
        assert_eq!(idx.resolve_zone("example.com"), Some("z1"));
        assert_eq!(idx.resolve_zone("www.example.com."), Some("z1"));
        assert_eq!(idx.resolve_zone("a.b.example.com"), Some("z1"));
    }

    #[test]
    fn rejects_non_label_suffix() {
        let idx = index(vec![zone("z1", "example.com")]);
        assert_eq!(idx.resolve_zone("badexample.com"), None);
        assert_eq!(idx.resolve_zone("unmapped.org."), None);
        assert_eq!(idx.resolve_zone("com"), None);
    }

    #[test]
    fn longest_suffix_wins() {
        let idx = index(vec![
            zone("z1", "example.com"),
            zone("z2", "dev.example.com"),
        ]);
        assert_eq!(idx.resolve_zone("api.dev.example.com"), Some("z2"));
        assert_eq!(idx.resolve_zone("api.example.com"), Some("z1"));

        let reversed = index(vec![
            zone("z2", "dev.example.com"),
            zone("z1", "example.com"),
        ]);
        assert_eq!(reversed.resolve_zone("api.dev.example.com"), Some("z2"));
    }

    #[test]
    fn duplicate_names_resolve_to_first() {
        let idx = index(vec![zone("z1", "example.com"), zone("z9", "example.com")]);
        assert_eq!(idx.resolve_zone("www.example.com"), Some("z1"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let idx = index(vec![zone("z1", "example.com")]);
        assert_eq!(idx.resolve_zone("www.EXAMPLE.com"), None);
    }

    #[test]
    fn build_applies_both_filters() {
        let zones = vec![
            zone("z1", "example.com"),
            zone("z2", "example.org"),
            zone("z3", "other.com"),
        ];
        let idx = ZoneIndex::build(
            zones,
            &DomainFilter::new(["example.com", "example.org"], Vec::<String>::new()),
            &ZoneIdFilter::new(["z1", "z3"]),
        );
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.zones()[0].id, "z1");
        assert_eq!(idx.resolve_zone("www.example.org"), None);
    }

    #[test]
    fn add_registers_and_renames() {
        let mut idx = ZoneIndex::default();
        assert!(idx.is_empty());
        idx.add("z1", "example.com.");
        assert_eq!(idx.resolve_zone("www.example.com"), Some("z1"));
        idx.add("z1", "example.net");
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.resolve_zone("www.example.com"), None);
        assert_eq!(idx.resolve_zone("www.example.net"), Some("z1"));
    }
}
