/// The saved title catalog and its persistence seam

use crate::error::TitleError;
use crate::matching::applies_to;
use crate::title_data::{MatchType, Override};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Saved titles, most recently created or updated first.
///
/// Stored in chrome.storage.local as a bare array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<Override>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Override> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Next logical timestamp: wall clock, but never behind the newest entry
    fn next_stamp(&self, now: f64) -> f64 {
        let newest = self
            .entries
            .iter()
            .map(|e| e.created_at)
            .fold(f64::NEG_INFINITY, f64::max);
        if now > newest { now } else { newest + 1.0 }
    }

    /// Save a title for `(url_key, match_type)`.
    ///
    /// An existing entry for the same key keeps its id and original title,
    /// takes the new title and a fresh stamp, and moves to the front.
    pub fn upsert(
        &mut self,
        url_key: &str,
        match_type: MatchType,
        title: &str,
        original_title: &str,
        now: f64,
    ) -> Override {
        let created_at = self.next_stamp(now);

        let entry = match self
            .entries
            .iter()
            .position(|e| e.url_key == url_key && e.match_type == match_type)
        {
            Some(index) => {
                let mut existing = self.entries.remove(index);
                existing.title = title.to_string();
                existing.created_at = created_at;
                existing
            }
            None => Override {
                id: Uuid::new_v4().to_string(),
                url_key: url_key.to_string(),
                title: title.to_string(),
                match_type,
                original_title: original_title.to_string(),
                created_at,
            },
        };

        self.entries.insert(0, entry.clone());
        entry
    }

    /// Edit an entry in place. Another entry already holding the new
    /// `(url_key, match_type)` is dropped so the key stays unique.
    pub fn edit(
        &mut self,
        id: &str,
        url_key: &str,
        title: &str,
        match_type: MatchType,
    ) -> Result<Override, TitleError> {
        if self.get(id).is_none() {
            return Err(TitleError::UnknownEntry(id.to_string()));
        }

        self.entries
            .retain(|e| e.id == id || e.url_key != url_key || e.match_type != match_type);

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| TitleError::UnknownEntry(id.to_string()))?;
        entry.url_key = url_key.to_string();
        entry.title = title.to_string();
        entry.match_type = match_type;
        Ok(entry.clone())
    }

    pub fn remove(&mut self, id: &str) -> Option<Override> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Take out every entry that applies to `url`, whatever its match type.
    /// The rest keep their order.
    pub fn remove_matching(&mut self, url: &str) -> Vec<Override> {
        let (removed, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| applies_to(e, url));
        self.entries = kept;
        removed
    }

    /// Case-insensitive search over title, key and original title.
    /// All whitespace-separated terms must match; an empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&Override> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

        self.entries
            .iter()
            .filter(|entry| {
                let haystack = format!(
                    "{}\n{}\n{}",
                    entry.title.to_lowercase(),
                    entry.url_key.to_lowercase(),
                    entry.original_title.to_lowercase()
                );
                terms.iter().all(|term| haystack.contains(term.as_str()))
            })
            .collect()
    }
}

/// Asynchronous key-value persistence for the catalog
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    async fn load(&self) -> Result<Catalog, TitleError>;
    async fn save(&self, catalog: &Catalog) -> Result<(), TitleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(catalog: &Catalog, url_key: &str, match_type: MatchType) -> String {
        catalog
            .entries
            .iter()
            .find(|e| e.url_key == url_key && e.match_type == match_type)
            .map(|e| e.id.clone())
            .unwrap()
    }

    fn seeded() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.upsert("example.com", MatchType::Domain, "Foo", "Example Domain", 100.0);
        catalog.upsert("https://example.com/x", MatchType::Path, "Bar", "Example X", 200.0);
        catalog
    }

    #[test]
    fn test_catalog_new() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_upsert_inserts_at_front() {
        let catalog = seeded();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[0].title, "Bar");
        assert_eq!(catalog.entries[1].title, "Foo");
        assert_ne!(catalog.entries[0].id, catalog.entries[1].id);
    }

    #[test]
    fn test_upsert_same_key_replaces_and_moves_to_front() {
        let mut catalog = seeded();
        let original_id = id_of(&catalog, "example.com", MatchType::Domain);

        let saved = catalog.upsert("example.com", MatchType::Domain, "Foo 2", "Something Else", 300.0);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[0].id, original_id);
        assert_eq!(saved.title, "Foo 2");
        assert_eq!(saved.original_title, "Example Domain");
        assert_eq!(saved.created_at, 300.0);
    }

    #[test]
    fn test_same_key_different_match_type_is_separate() {
        let mut catalog = Catalog::new();
        catalog.upsert("example.com", MatchType::Domain, "A", "", 1.0);
        catalog.upsert("example.com", MatchType::Exact, "B", "", 2.0);

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_stamps_are_monotonic_even_with_a_stale_clock() {
        let mut catalog = Catalog::new();
        let first = catalog.upsert("a.com", MatchType::Domain, "A", "", 500.0);
        let second = catalog.upsert("b.com", MatchType::Domain, "B", "", 500.0);
        let third = catalog.upsert("a.com", MatchType::Domain, "A2", "", 10.0);

        assert!(second.created_at > first.created_at);
        assert!(third.created_at > second.created_at);
    }

    #[test]
    fn test_edit_keeps_position_and_stamp() {
        let mut catalog = seeded();
        let id = catalog.entries[1].id.clone();

        let edited = catalog
            .edit(&id, "example.org", "Renamed", MatchType::Domain)
            .unwrap();

        assert_eq!(catalog.entries[1].id, id);
        assert_eq!(edited.url_key, "example.org");
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.created_at, 100.0);
        assert_eq!(edited.original_title, "Example Domain");
    }

    #[test]
    fn test_edit_collision_last_write_wins() {
        let mut catalog = seeded();
        let path_id = id_of(&catalog, "https://example.com/x", MatchType::Path);

        catalog
            .edit(&path_id, "example.com", "Winner", MatchType::Domain)
            .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries[0].id, path_id);
        assert_eq!(catalog.entries[0].title, "Winner");
    }

    #[test]
    fn test_edit_unknown_id() {
        let mut catalog = seeded();

        let result = catalog.edit("missing", "x", "y", MatchType::Exact);

        assert_eq!(result, Err(TitleError::UnknownEntry("missing".to_string())));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut catalog = seeded();
        let id = catalog.entries[0].id.clone();

        let removed = catalog.remove(&id);

        assert_eq!(removed.map(|e| e.title), Some("Bar".to_string()));
        assert_eq!(catalog.len(), 1);
        assert!(catalog.remove(&id).is_none());
    }

    #[test]
    fn test_remove_matching() {
        let mut catalog = seeded();
        catalog.upsert("other.org", MatchType::Domain, "Other", "", 300.0);

        let on_y = catalog.remove_matching("https://example.com/y");
        assert_eq!(on_y.len(), 1);
        assert_eq!(on_y[0].title, "Foo");

        let on_x = catalog.remove_matching("https://example.com/x?q=1");
        assert_eq!(on_x.len(), 1);
        assert_eq!(on_x[0].title, "Bar");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries[0].title, "Other");
    }

    #[test]
    fn test_search() {
        let catalog = seeded();

        assert_eq!(catalog.search("").len(), 2);
        assert_eq!(catalog.search("bar").len(), 1);
        assert_eq!(catalog.search("EXAMPLE").len(), 2);
        assert_eq!(catalog.search("example domain").len(), 1);
        assert!(catalog.search("nothing-like-this").is_empty());
    }

    #[test]
    fn test_serialization_is_bare_array() {
        let catalog = seeded();

        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());

        let deserialized: Catalog = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, catalog);
    }
}
