/// In-memory stand-ins for the browser, used by unit tests
use crate::coordinator::{BackgroundTransport, Coordinator, TabTransport};
use crate::enforcer::TitleSurface;
use crate::error::TitleError;
use crate::messages::{BackgroundRequest, PageRequest};
use crate::navigation::PageContext;
use crate::storage::{Catalog, CatalogStore};
use crate::title_data::TabInfo;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A document title that records every write
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    title: String,
    writes: Vec<String>,
}

impl MemorySurface {
    pub fn new(title: &str) -> MemorySurface {
        MemorySurface {
            title: title.to_string(),
            writes: Vec::new(),
        }
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl TitleSurface for MemorySurface {
    fn current_title(&self) -> String {
        self.title.clone()
    }

    fn write_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.writes.push(title.to_string());
    }
}

/// chrome.storage.local stand-in; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Rc<RefCell<Catalog>>,
    failing: Rc<Cell<bool>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_catalog(catalog: Catalog) -> MemoryStore {
        let store = MemoryStore::default();
        *store.catalog.borrow_mut() = catalog;
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn stored(&self) -> Catalog {
        self.catalog.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl CatalogStore for MemoryStore {
    async fn load(&self) -> Result<Catalog, TitleError> {
        if self.failing.get() {
            return Err(TitleError::Storage("QUOTA_BYTES quota exceeded".to_string()));
        }
        Ok(self.catalog.borrow().clone())
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), TitleError> {
        if self.failing.get() {
            return Err(TitleError::Storage("QUOTA_BYTES quota exceeded".to_string()));
        }
        *self.catalog.borrow_mut() = catalog.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

struct LocalTab {
    id: i32,
    url: String,
    page: Rc<PageContext<MemorySurface>>,
}

struct BrowserState {
    tabs: Vec<LocalTab>,
    active: Option<i32>,
    next_id: i32,
    background_reachable: bool,
}

/// Tabs with live page contexts plus a background coordinator, wired in-process
#[derive(Clone)]
pub struct LocalBrowser {
    state: Rc<RefCell<BrowserState>>,
}

impl LocalBrowser {
    pub fn new() -> LocalBrowser {
        LocalBrowser {
            state: Rc::new(RefCell::new(BrowserState {
                tabs: Vec::new(),
                active: None,
                next_id: 100,
                background_reachable: true,
            })),
        }
    }

    /// Open a tab and make it active
    pub fn open_tab(&self, url: &str, surface: MemorySurface) -> i32 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.tabs.push(LocalTab {
            id,
            url: url.to_string(),
            page: Rc::new(PageContext::new(surface, url)),
        });
        state.active = Some(id);
        id
    }

    pub fn close_tab(&self, tab_id: i32) {
        let mut state = self.state.borrow_mut();
        if let Some(index) = state.tabs.iter().position(|t| t.id == tab_id) {
            let tab = state.tabs.remove(index);
            tab.page.close();
        }
        if state.active == Some(tab_id) {
            state.active = None;
        }
    }

    pub fn page(&self, tab_id: i32) -> Option<Rc<PageContext<MemorySurface>>> {
        self.state
            .borrow()
            .tabs
            .iter()
            .find(|t| t.id == tab_id)
            .map(|t| t.page.clone())
    }

    pub fn visible_title(&self, tab_id: i32) -> Option<String> {
        self.page(tab_id).map(|page| page.visible_title())
    }

    pub fn set_background_reachable(&self, reachable: bool) {
        self.state.borrow_mut().background_reachable = reachable;
    }
}

impl TabTransport for LocalBrowser {
    async fn active_tab(&self) -> Result<Option<TabInfo>, TitleError> {
        let state = self.state.borrow();
        let active = state
            .active
            .and_then(|id| state.tabs.iter().find(|t| t.id == id))
            .map(|tab| TabInfo::new(tab.id, tab.url.clone(), tab.page.visible_title()));
        Ok(active)
    }

    async fn send_to_tab(&self, tab_id: i32, request: &PageRequest) -> Result<Option<Value>, TitleError> {
        let page = self.page(tab_id).ok_or_else(|| {
            TitleError::Transport("Could not establish connection. Receiving end does not exist.".to_string())
        })?;

        serde_json::to_value(page.handle_request(request.clone()))
            .map(Some)
            .map_err(TitleError::payload)
    }
}

impl BackgroundTransport for LocalBrowser {
    async fn send_to_background(&self, request: &BackgroundRequest) -> Result<Option<Value>, TitleError> {
        if !self.state.borrow().background_reachable {
            return Err(TitleError::Transport("The message port closed before a response was received.".to_string()));
        }
        Ok(Coordinator::new(self.clone()).handle(request.clone()).await)
    }
}
