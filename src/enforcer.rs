/// Page-level title enforcement
///
/// One `TitleEnforcer` owns the title state of one page. Every channel that can
/// change the visible title (the `document.title` setter, mutations of the
/// `<title>` element) reports into `observe_external_write`, which decides
/// whether the write may stay or must be corrected on the next turn.
use crate::title_data::TitleStatus;

/// The page's visible title
pub trait TitleSurface {
    fn current_title(&self) -> String;

    /// Write straight through to the page, bypassing interception.
    fn write_title(&mut self, title: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcementState {
    Free,
    Enforcing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTitleState {
    /// Last title not attributable to enforcement
    pub original_title: String,
    pub enforced_title: Option<String>,
}

impl PageTitleState {
    pub fn is_enforced(&self) -> bool {
        self.enforced_title.is_some()
    }
}

/// Handle for a deferred corrective write, valid for one page epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionTicket {
    epoch: u64,
}

/// What to do with a title write the enforcer did not make itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    Allow,
    /// Let the write land, then run the ticket on the next turn
    Correct(CorrectionTicket),
    /// Mismatch, but a correction is already queued
    AlreadyCorrecting,
}

#[derive(Debug)]
pub struct TitleEnforcer {
    state: PageTitleState,
    epoch: u64,
    pending: Option<CorrectionTicket>,
    closed: bool,
}

impl TitleEnforcer {
    /// Start in `Free`, seeded with whatever title the page has now
    pub fn new(initial_title: impl Into<String>) -> TitleEnforcer {
        TitleEnforcer {
            state: PageTitleState {
                original_title: initial_title.into(),
                enforced_title: None,
            },
            epoch: 0,
            pending: None,
            closed: false,
        }
    }

    pub fn state(&self) -> &PageTitleState {
        &self.state
    }

    pub fn enforcement(&self) -> EnforcementState {
        if self.state.is_enforced() {
            EnforcementState::Enforcing
        } else {
            EnforcementState::Free
        }
    }

    pub fn is_enforcing(&self) -> bool {
        self.state.is_enforced()
    }

    pub fn has_pending_correction(&self) -> bool {
        self.pending.is_some()
    }

    /// Invalidate any queued correction
    fn advance_epoch(&mut self) {
        self.epoch += 1;
        self.pending = None;
    }

    pub fn apply_override<S: TitleSurface>(&mut self, surface: &mut S, title: &str) {
        if self.closed {
            return;
        }
        if !self.is_enforcing() {
            self.state.original_title = surface.current_title();
        }

        log::debug!("Enforcing title {:?}", title);
        self.state.enforced_title = Some(title.to_string());
        self.advance_epoch();
        surface.write_title(title);
    }

    pub fn reset<S: TitleSurface>(&mut self, surface: &mut S) {
        if self.closed {
            return;
        }

        log::debug!("Restoring original title {:?}", self.state.original_title);
        self.state.enforced_title = None;
        self.advance_epoch();
        surface.write_title(&self.state.original_title);
    }

    pub fn observe_external_write(&mut self, new_title: &str) -> WriteDecision {
        match &self.state.enforced_title {
            None => {
                self.state.original_title = new_title.to_string();
                WriteDecision::Allow
            }
            Some(enforced) if enforced == new_title => WriteDecision::Allow,
            Some(_) if self.closed => WriteDecision::Allow,
            Some(_) => {
                if self.pending.is_some() {
                    return WriteDecision::AlreadyCorrecting;
                }
                log::debug!("Page wrote {:?} over the enforced title", new_title);
                let ticket = CorrectionTicket { epoch: self.epoch };
                self.pending = Some(ticket);
                WriteDecision::Correct(ticket)
            }
        }
    }

    /// Run a correction queued by `observe_external_write`.
    ///
    /// Returns whether the enforced title was written back. A ticket from an
    /// earlier epoch (override changed, reset, page closed) does nothing.
    pub fn run_correction<S: TitleSurface>(&mut self, surface: &mut S, ticket: CorrectionTicket) -> bool {
        if self.closed || ticket.epoch != self.epoch {
            log::debug!("Dropping stale title correction");
            return false;
        }
        self.pending = None;

        match &self.state.enforced_title {
            Some(enforced) if surface.current_title() != *enforced => {
                surface.write_title(enforced);
                true
            }
            _ => false,
        }
    }

    /// Pick up the page's own title as the original, unless enforcing
    pub fn refresh_original<S: TitleSurface>(&mut self, surface: &S) {
        if !self.is_enforcing() {
            self.state.original_title = surface.current_title();
        }
    }

    pub fn status<S: TitleSurface>(&self, surface: &S) -> TitleStatus {
        TitleStatus {
            original_title: self.state.original_title.clone(),
            current_title: surface.current_title(),
            is_enforced: self.is_enforcing(),
        }
    }

    /// The page is going away; nothing queued may write after this
    pub fn close(&mut self) {
        self.closed = true;
        self.advance_epoch();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
