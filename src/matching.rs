/// URL key derivation and saved-title resolution
use crate::title_data::{MatchType, Override};
use url::Url;

/// The three keys a URL can be matched by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKeys {
    pub exact: String,
    pub path: String,
    pub domain: String,
}

impl MatchKeys {
    /// Derive exact / path / domain keys from a URL.
    ///
    /// A URL that does not parse uses the raw string for every key, so a
    /// malformed location can still hit an exact-style entry instead of failing.
    pub fn derive(url: &str) -> MatchKeys {
        match Url::parse(url) {
            Ok(parsed) => MatchKeys {
                exact: url.to_string(),
                path: format!("{}{}", parsed.origin().ascii_serialization(), parsed.path()),
                domain: parsed.host_str().unwrap_or_default().to_string(),
            },
            Err(err) => {
                log::debug!("Invalid URL {:?}: {}", url, err);
                MatchKeys {
                    exact: url.to_string(),
                    path: url.to_string(),
                    domain: url.to_string(),
                }
            }
        }
    }

    pub fn key(&self, match_type: MatchType) -> &str {
        match match_type {
            MatchType::Exact => &self.exact,
            MatchType::Path => &self.path,
            MatchType::Domain => &self.domain,
        }
    }
}

/// The key a new saved title for `url` is stored under
pub fn url_key_for(url: &str, match_type: MatchType) -> String {
    MatchKeys::derive(url).key(match_type).to_string()
}

/// Pick the saved title that applies to `url`.
///
/// Exact beats Path beats Domain. Only a strictly higher priority replaces the
/// current best, so when the catalog holds duplicates the first one scanned wins.
pub fn resolve<'a>(url: &str, catalog: &'a [Override]) -> Option<&'a Override> {
    let keys = MatchKeys::derive(url);

    catalog
        .iter()
        .filter(|entry| {
            let key = keys.key(entry.match_type);
            !key.is_empty() && entry.url_key == key
        })
        .fold(None, |best: Option<&Override>, entry| match best {
            Some(current) if current.match_type.priority() >= entry.match_type.priority() => {
                Some(current)
            }
            _ => Some(entry),
        })
}

/// Does `entry` apply to `url` under its own match type?
pub fn applies_to(entry: &Override, url: &str) -> bool {
    url_key_for(url, entry.match_type) == entry.url_key
}

/// Shorten a URL for display: hostname plus as much path as fits, then "..."
pub fn format_url(url: &str, max_len: usize) -> String {
    if url.chars().count() <= max_len {
        return url.to_string();
    }

    let budget = max_len.saturating_sub(3);

    let Some((host, path)) = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|h| (h.to_string(), parsed.path().to_string())))
    else {
        return format!("{}...", take_chars(url, budget));
    };

    let host_len = host.chars().count();
    if host_len > budget {
        return format!("{}...", take_chars(&host, budget));
    }

    let available = budget - host_len;
    if available == 0 {
        return format!("{}...", host);
    }

    format!("{}{}...", host, take_chars(&path, available))
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, url_key: &str, match_type: MatchType, title: &str) -> Override {
        Override {
            id: id.to_string(),
            url_key: url_key.to_string(),
            title: title.to_string(),
            match_type,
            original_title: "Original".to_string(),
            created_at: 1.0,
        }
    }

    #[test]
    fn test_derive_keys() {
        let keys = MatchKeys::derive("https://example.com/some/path?query=value#hash");

        assert_eq!(keys.exact, "https://example.com/some/path?query=value#hash");
        assert_eq!(keys.path, "https://example.com/some/path");
        assert_eq!(keys.domain, "example.com");
    }

    #[test]
    fn test_derive_keys_with_port() {
        let keys = MatchKeys::derive("http://localhost:3000/app?x=1");

        assert_eq!(keys.path, "http://localhost:3000/app");
        assert_eq!(keys.domain, "localhost");
    }

    #[test]
    fn test_derive_keys_malformed_url_falls_back_to_raw() {
        let keys = MatchKeys::derive("not a url");

        assert_eq!(keys.exact, "not a url");
        assert_eq!(keys.path, "not a url");
        assert_eq!(keys.domain, "not a url");
        assert_eq!(url_key_for("not a url", MatchType::Domain), "not a url");
    }

    #[test]
    fn test_resolve_prefers_exact_then_path_then_domain() {
        let url = "https://example.com/x?id=1";
        let domain = entry("d", "example.com", MatchType::Domain, "Domain");
        let path = entry("p", "https://example.com/x", MatchType::Path, "Path");
        let exact = entry("e", url, MatchType::Exact, "Exact");

        let orders = [
            vec![domain.clone(), path.clone(), exact.clone()],
            vec![exact.clone(), domain.clone(), path.clone()],
            vec![path.clone(), exact.clone(), domain.clone()],
        ];
        for catalog in &orders {
            assert_eq!(resolve(url, catalog).map(|o| o.id.as_str()), Some("e"));
        }

        let without_exact = vec![domain.clone(), path.clone()];
        assert_eq!(resolve(url, &without_exact).map(|o| o.id.as_str()), Some("p"));

        let only_domain = vec![domain];
        assert_eq!(resolve(url, &only_domain).map(|o| o.id.as_str()), Some("d"));
    }

    #[test]
    fn test_resolve_domain_and_path_scenario() {
        let catalog = vec![
            entry("1", "example.com", MatchType::Domain, "Foo"),
            entry("2", "https://example.com/x", MatchType::Path, "Bar"),
        ];

        assert_eq!(resolve("https://example.com/x", &catalog).map(|o| o.title.as_str()), Some("Bar"));
        assert_eq!(resolve("https://example.com/y", &catalog).map(|o| o.title.as_str()), Some("Foo"));
        assert_eq!(resolve("https://other.org/x", &catalog), None);
    }

    #[test]
    fn test_resolve_ignores_wrong_match_type() {
        // A Path entry whose key is a bare hostname never matches as a domain
        let catalog = vec![entry("1", "example.com", MatchType::Path, "Nope")];

        assert_eq!(resolve("https://example.com/", &catalog), None);
    }

    #[test]
    fn test_resolve_duplicates_first_scanned_wins() {
        let catalog = vec![
            entry("first", "example.com", MatchType::Domain, "First"),
            entry("second", "example.com", MatchType::Domain, "Second"),
        ];

        assert_eq!(resolve("https://example.com/", &catalog).map(|o| o.id.as_str()), Some("first"));
    }

    #[test]
    fn test_resolve_empty_catalog() {
        assert_eq!(resolve("https://example.com/", &[]), None);
    }

    #[test]
    fn test_resolve_hostless_url_does_not_match_empty_domain() {
        let catalog = vec![entry("1", "", MatchType::Domain, "Blank")];

        assert_eq!(resolve("about:blank", &catalog), None);
    }

    #[test]
    fn test_applies_to() {
        let domain = entry("1", "example.com", MatchType::Domain, "Foo");

        assert!(applies_to(&domain, "https://example.com/anything"));
        assert!(!applies_to(&domain, "https://www.example.com/"));
    }

    #[test]
    fn test_format_url_short_is_unchanged() {
        assert_eq!(format_url("example.com", 40), "example.com");
    }

    #[test]
    fn test_format_url_keeps_host_and_path_prefix() {
        let url = "https://example.com/a/very/long/path/that/keeps/going?and=query";
        let formatted = format_url(url, 30);

        assert_eq!(formatted, "example.com/a/very/long/pat...");
        assert_eq!(formatted.chars().count(), 30);
    }

    #[test]
    fn test_format_url_long_host() {
        let url = "https://a-really-long-subdomain.example-with-long-name.com/";
        assert_eq!(format_url(url, 20), "a-really-long-sub...");
    }

    #[test]
    fn test_format_url_malformed() {
        assert_eq!(format_url("this is definitely not a url at all", 10), "this is...");
    }
}
