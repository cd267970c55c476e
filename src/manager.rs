/// Popup-side state: the cached catalog, the active tab and the commands the UI issues
///
/// Each command is one state transition over the cached catalog followed by a
/// best-effort save. The popup runs them one at a time (buttons are disabled
/// while a command is in flight), so a save and a delete never race on the cache.

use crate::coordinator::{BackgroundTransport, CoordinatorClient, TabTransport};
use crate::error::TitleError;
use crate::matching::{applies_to, resolve, url_key_for};
use crate::storage::{Catalog, CatalogStore};
use crate::title_data::{MatchType, Override, TabInfo};

#[derive(Debug, Clone)]
pub struct TitleManager<T, S> {
    client: CoordinatorClient<T>,
    store: S,
    catalog: Catalog,
    current_tab: Option<TabInfo>,
}

impl<T, S> TitleManager<T, S>
where
    T: BackgroundTransport + TabTransport,
    S: CatalogStore,
{
    pub fn new(transport: T, store: S) -> Self {
        TitleManager {
            client: CoordinatorClient::new(transport),
            store,
            catalog: Catalog::new(),
            current_tab: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_tab(&self) -> Option<&TabInfo> {
        self.current_tab.as_ref()
    }

    /// Saved title currently winning for the active tab, if any
    pub fn active_override(&self) -> Option<&Override> {
        let tab = self.current_tab.as_ref()?;
        resolve(&tab.url, &self.catalog.entries)
    }

    /// Load the catalog and the active tab. Storage failure leaves an empty catalog.
    pub async fn load(&mut self) {
        match self.store.load().await {
            Ok(catalog) => self.catalog = catalog,
            Err(e) => log::warn!("Could not load saved titles: {}", e),
        }
        self.refresh_tab().await;
    }

    /// Ask the background for the active tab and the page for its original title
    pub async fn refresh_tab(&mut self) {
        let Some(mut tab) = self.client.get_tab_info().await else {
            self.current_tab = None;
            return;
        };

        if let Some(status) = self.client.get_original_title(tab.tab_id).await {
            tab.original_title = Some(status.original_title);
            tab.is_enforced = status.is_enforced;
        }
        self.current_tab = Some(tab);
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.catalog).await {
            log::warn!("Could not save titles, keeping them for this session: {}", e);
        }
    }

    /// Apply `title` to the active tab and save it under the key for `match_type`
    pub async fn save_title(&mut self, title: &str, match_type: MatchType, now: f64) -> Result<Override, TitleError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TitleError::EmptyTitle);
        }
        let tab = self.current_tab.clone().ok_or(TitleError::NoActiveTab)?;
        let url_key = url_key_for(&tab.url, match_type);
        if url_key.is_empty() {
            return Err(TitleError::EmptyUrlKey);
        }

        self.client.update_title(tab.tab_id, title).await;

        let saved = self
            .catalog
            .upsert(&url_key, match_type, title, tab.best_original_title(), now);
        self.persist().await;

        if let Some(tab) = self.current_tab.as_mut() {
            tab.is_enforced = true;
        }
        Ok(saved)
    }

    /// Restore the active tab's title without touching saved entries
    pub async fn reset_title(&mut self) -> Result<(), TitleError> {
        let tab = self.current_tab.as_mut().ok_or(TitleError::NoActiveTab)?;
        self.client.reset_title(tab.tab_id).await;
        tab.is_enforced = false;
        Ok(())
    }

    /// Delete a saved title. If it applies to the active tab, the tab is reset.
    ///
    /// The entry on screen is not always the resolve winner (a lower-priority
    /// save shows until the next navigation), so any entry for this URL counts.
    pub async fn delete(&mut self, id: &str) -> Result<Override, TitleError> {
        let removed = self
            .catalog
            .remove(id)
            .ok_or_else(|| TitleError::UnknownEntry(id.to_string()))?;
        self.persist().await;

        let applies_here = self
            .current_tab
            .as_ref()
            .is_some_and(|tab| applies_to(&removed, &tab.url));
        if applies_here {
            self.reset_title().await?;
        }
        Ok(removed)
    }

    /// Edit a saved entry's key, title and match type
    pub async fn update_saved(
        &mut self,
        id: &str,
        url_key: &str,
        title: &str,
        match_type: MatchType,
    ) -> Result<Override, TitleError> {
        let (url_key, title) = (url_key.trim(), title.trim());
        if title.is_empty() {
            return Err(TitleError::EmptyTitle);
        }
        if url_key.is_empty() {
            return Err(TitleError::EmptyUrlKey);
        }

        let edited = self.catalog.edit(id, url_key, title, match_type)?;
        self.persist().await;
        Ok(edited)
    }

    /// Reset the active tab and delete every saved title that applies to it
    pub async fn clear_current_tab(&mut self) -> Result<Vec<Override>, TitleError> {
        self.reset_title().await?;

        let Some(tab) = self.current_tab.as_mut() else {
            return Ok(Vec::new());
        };

        let removed = self.catalog.remove_matching(&tab.url);

        if let Some(original) = tab.original_title.clone() {
            tab.title = original;
        }

        if !removed.is_empty() {
            self.persist().await;
        }
        Ok(removed)
    }

    pub fn search(&self, query: &str) -> Vec<&Override> {
        self.catalog.search(query)
    }
}
