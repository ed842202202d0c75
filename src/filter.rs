//! Domain and zone-id filters restricting which zones are managed.
use regex::Regex;
use serde::Serialize;

/// Domain allow/deny filter.
///
/// A filter entry matches the name itself and every name below it on a
/// label boundary; an entry with a leading `.` matches only names below it.
/// Exclusions win over inclusions. When a regex is configured the lists are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    regex: Option<Regex>,
    regex_exclusion: Option<Regex>,
}

/// Wire shape used during webhook negotiation.
#[derive(Debug, Serialize)]
pub struct DomainFilterDto {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    #[serde(rename = "regexInclude", skip_serializing_if = "Option::is_none")]
    pub regex_include: Option<String>,
    #[serde(rename = "regexExclude", skip_serializing_if = "Option::is_none")]
    pub regex_exclude: Option<String>,
}

impl DomainFilter {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            include: normalize_all(include),
            exclude: normalize_all(exclude),
            regex: None,
            regex_exclusion: None,
        }
    }

    pub fn with_regex(regex: Regex, exclusion: Option<Regex>) -> Self {
        Self {
            regex: Some(regex),
            regex_exclusion: exclusion,
            ..Self::default()
        }
    }

    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize(domain);

        if let Some(regex) = &self.regex {
            let excluded = self
                .regex_exclusion
                .as_ref()
                .is_some_and(|ex| ex.is_match(&domain));
            return regex.is_match(&domain) && !excluded;
        }

        let included =
            self.include.is_empty() || self.include.iter().any(|f| match_filter(f, &domain));
        included && !self.exclude.iter().any(|f| match_filter(f, &domain))
    }

    pub fn to_dto(&self) -> DomainFilterDto {
        DomainFilterDto {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            regex_include: self.regex.as_ref().map(|r| r.as_str().to_string()),
            regex_exclude: self.regex_exclusion.as_ref().map(|r| r.as_str().to_string()),
        }
    }
}

/// Zone-id allow list; empty allows every zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneIdFilter {
    ids: Vec<String>,
}

impl ZoneIdFilter {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(Into::into)
                .filter(|id: &String| !id.trim().is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, zone_id: &str) -> bool {
        self.ids.is_empty() || self.ids.iter().any(|id| id == zone_id)
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn normalize_all<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| normalize(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn match_filter(filter: &str, domain: &str) -> bool {
    if let Some(parent) = filter.strip_prefix('.') {
        return domain
            .strip_suffix(parent)
            .is_some_and(|head| head.ends_with('.') && head.len() > 1);
    }
    domain == filter
        || domain
            .strip_suffix(filter)
            .is_some_and(|head| head.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        let filter = DomainFilter::default();
        assert!(filter.matches("example.com"));
        assert!(filter.matches("anything.org."));
    }

    #[test]
    fn include_matches_on_label_boundary() {
        let filter = DomainFilter::new(["example.com"], Vec::<String>::new());
        assert!(filter.matches("example.com"));
        assert!(filter.matches("sub.example.com."));
        assert!(filter.matches("EXAMPLE.com"));
        assert!(!filter.matches("badexample.com"));
        assert!(!filter.matches("example.org"));
    }

    #[test]
    fn leading_dot_matches_subdomains_only() {
        let filter = DomainFilter::new([".example.com"], Vec::<String>::new());
        assert!(!filter.matches("example.com"));
        assert!(filter.matches("a.example.com"));
    }

    #[test]
    fn exclude_wins() {
        let filter = DomainFilter::new(["example.com"], ["internal.example.com"]);
        assert!(filter.matches("example.com"));
        assert!(!filter.matches("internal.example.com"));
        assert!(!filter.matches("db.internal.example.com"));
    }

    #[test]
    fn regex_replaces_lists() {
        let filter = DomainFilter::with_regex(
            Regex::new(r"\.example\.(com|net)$").unwrap(),
            Some(Regex::new(r"^staging\.").unwrap()),
        );
        assert!(filter.matches("a.example.net"));
        assert!(!filter.matches("staging.example.com"));
        assert!(!filter.matches("example.org"));
    }

    #[test]
    fn dto_carries_regex_patterns() {
        let filter = DomainFilter::with_regex(
            Regex::new(r"example\.com$").unwrap(),
            Some(Regex::new(r"^staging\.").unwrap()),
        );
        let json = serde_json::to_value(filter.to_dto()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "include": [],
                "exclude": [],
                "regexInclude": "example\\.com$",
                "regexExclude": "^staging\\."
            })
        );

        let lists = DomainFilter::new(["example.com"], ["a.example.com"]);
        let json = serde_json::to_value(lists.to_dto()).unwrap();
        assert!(json.get("regexInclude").is_none());
        assert!(json.get("regexExclude").is_none());
    }

    #[test]
    fn zone_id_filter() {
        assert!(ZoneIdFilter::default().matches("z1"));
        let filter = ZoneIdFilter::new(["z1", ""]);
        assert!(filter.matches("z1"));
        assert!(!filter.matches("z2"));
        assert!(!filter.matches("z11"));
    }
}
