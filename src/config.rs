/// Constants and timing settings for the extension

/// chrome.storage.local key holding the saved title catalog
pub const STORAGE_KEY: &str = "savedTitles";

/// Delay before re-resolving after a URL change, so the new page can set its own title first
pub const SETTLE_DELAY_MS: u32 = 100;

/// Delay for the corrective write after the page fights an enforced title (next turn)
pub const CORRECTION_DELAY_MS: u32 = 0;

/// Width used when showing saved URL keys in the popup list
pub const URL_DISPLAY_WIDTH: usize = 40;

/// Timer settings for a page context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub settle_delay_ms: u32,
    pub correction_delay_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            settle_delay_ms: SETTLE_DELAY_MS,
            correction_delay_ms: CORRECTION_DELAY_MS,
        }
    }
}
