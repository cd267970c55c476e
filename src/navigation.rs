/// SPA navigation tracking and the per-page context
use crate::enforcer::{CorrectionTicket, TitleEnforcer, TitleSurface, WriteDecision};
use crate::matching::resolve;
use crate::messages::{PageReply, PageRequest};
use crate::storage::CatalogStore;
use crate::title_data::{Override, TitleStatus};
use std::cell::RefCell;

/// Remembers the last URL seen so each distinct location is resolved once
#[derive(Debug, Clone)]
pub struct NavigationWatcher {
    last_url: String,
}

impl NavigationWatcher {
    pub fn new(initial_url: impl Into<String>) -> NavigationWatcher {
        NavigationWatcher {
            last_url: initial_url.into(),
        }
    }

    /// Record a URL report (popstate, DOM activity, polling).
    /// Returns true when it is a new location that needs resolving.
    pub fn notice(&mut self, url: &str) -> bool {
        if url == self.last_url {
            return false;
        }
        log::debug!("Navigation {} -> {}", self.last_url, url);
        self.last_url = url.to_string();
        true
    }

    /// A settled resolution for `url` is still wanted
    pub fn is_current(&self, url: &str) -> bool {
        self.last_url == url
    }

    pub fn current_url(&self) -> &str {
        &self.last_url
    }
}

/// Everything the content script keeps for one page: the title surface, its
/// enforcer and the navigation watcher.
///
/// Single-threaded; no borrow is held across an await.
pub struct PageContext<S> {
    surface: RefCell<S>,
    enforcer: RefCell<TitleEnforcer>,
    watcher: RefCell<NavigationWatcher>,
}

impl<S: TitleSurface> PageContext<S> {
    pub fn new(surface: S, url: &str) -> PageContext<S> {
        let enforcer = TitleEnforcer::new(surface.current_title());
        PageContext {
            surface: RefCell::new(surface),
            enforcer: RefCell::new(enforcer),
            watcher: RefCell::new(NavigationWatcher::new(url)),
        }
    }

    pub fn apply_override(&self, title: &str) {
        let mut surface = self.surface.borrow_mut();
        self.enforcer.borrow_mut().apply_override(&mut *surface, title);
    }

    pub fn reset(&self) {
        let mut surface = self.surface.borrow_mut();
        self.enforcer.borrow_mut().reset(&mut *surface);
    }

    pub fn status(&self) -> TitleStatus {
        self.enforcer.borrow().status(&*self.surface.borrow())
    }

    pub fn is_enforcing(&self) -> bool {
        self.enforcer.borrow().is_enforcing()
    }

    pub fn visible_title(&self) -> String {
        self.surface.borrow().current_title()
    }

    /// Handle a runtime message; only `getOriginalTitle` carries data back
    pub fn handle_request(&self, request: PageRequest) -> PageReply {
        match request {
            PageRequest::SetTitle { title } => {
                self.apply_override(&title);
                PageReply::Ack(true)
            }
            PageRequest::ResetTitle => {
                self.reset();
                PageReply::Ack(true)
            }
            PageRequest::GetOriginalTitle => PageReply::Status(self.status()),
        }
    }

    /// Report a title change that did not come from the enforcer
    pub fn on_title_write(&self, new_title: &str) -> WriteDecision {
        self.enforcer.borrow_mut().observe_external_write(new_title)
    }

    /// Run a correction on its scheduled turn
    pub fn run_correction(&self, ticket: CorrectionTicket) -> bool {
        let mut surface = self.surface.borrow_mut();
        self.enforcer.borrow_mut().run_correction(&mut *surface, ticket)
    }

    /// Report the page URL; true when a settle-delayed resolution should follow
    pub fn on_url_change(&self, url: &str) -> bool {
        !self.is_closed() && self.watcher.borrow_mut().notice(url)
    }

    /// Re-resolve saved titles for `url` after it settled.
    ///
    /// Picks up the page's own title when not enforcing, loads the catalog and
    /// applies the best match. No match leaves the current state alone. A URL
    /// that has been superseded by a newer navigation is skipped.
    pub async fn resolve<C: CatalogStore>(&self, store: &C, url: &str) -> Option<Override> {
        if !self.still_wanted(url) {
            return None;
        }
        {
            let surface = self.surface.borrow();
            self.enforcer.borrow_mut().refresh_original(&*surface);
        }

        let catalog = match store.load().await {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Could not load saved titles: {}", e);
                return None;
            }
        };

        if !self.still_wanted(url) {
            log::debug!("Resolution for {} superseded", url);
            return None;
        }

        let matched = resolve(url, &catalog.entries)?.clone();
        log::debug!("{} matched saved title {:?} ({})", url, matched.title, matched.match_type.label());
        self.apply_override(&matched.title);
        Some(matched)
    }

    fn still_wanted(&self, url: &str) -> bool {
        !self.is_closed() && self.watcher.borrow().is_current(url)
    }

    /// `pagehide`. A page going into the back/forward cache comes back as the
    /// same document, so it stays live; only a real unload closes it.
    pub fn on_page_hide(&self, persisted: bool) {
        if persisted {
            log::debug!("Page frozen for back/forward cache");
            return;
        }
        self.close();
    }

    /// Page unload: queued corrections and pending resolutions become no-ops
    pub fn close(&self) {
        self.enforcer.borrow_mut().close();
    }

    pub fn is_closed(&self) -> bool {
        self.enforcer.borrow().is_closed()
    }
}
