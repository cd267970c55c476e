/// Message relay between the popup and the page enforcer
///
/// The background script owns a `Coordinator`; the popup talks to it through a
/// `CoordinatorClient`. Neither ever surfaces a transport error: an unreachable
/// tab (closed, navigated, no content script) reads as "no information".

use crate::error::TitleError;
use crate::messages::{BackgroundRequest, PageRequest};
use crate::title_data::{TabInfo, TitleStatus};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Tab-level messaging (chrome.tabs)
#[allow(async_fn_in_trait)]
pub trait TabTransport {
    async fn active_tab(&self) -> Result<Option<TabInfo>, TitleError>;

    async fn send_to_tab(&self, tab_id: i32, request: &PageRequest) -> Result<Option<Value>, TitleError>;
}

/// Popup to background messaging (chrome.runtime)
#[allow(async_fn_in_trait)]
pub trait BackgroundTransport {
    async fn send_to_background(&self, request: &BackgroundRequest) -> Result<Option<Value>, TitleError>;
}

fn decode<R: DeserializeOwned>(response: Option<Value>) -> Option<R> {
    let value = response.filter(|v| !v.is_null())?;
    serde_json::from_value(value)
        .map_err(|e| log::warn!("Unexpected response payload: {}", e))
        .ok()
}

fn settle<R>(what: &str, result: Result<Option<R>, TitleError>) -> Option<R> {
    result.unwrap_or_else(|e| {
        log::warn!("{} failed: {}", what, e);
        None
    })
}

/// Background-side relay
#[derive(Debug, Clone)]
pub struct Coordinator<T> {
    transport: T,
}

impl<T: TabTransport> Coordinator<T> {
    pub fn new(transport: T) -> Self {
        Coordinator { transport }
    }

    pub async fn get_tab_info(&self) -> Option<TabInfo> {
        settle("getTabInfo", self.transport.active_tab().await)
    }

    /// Fire-and-forget `setTitle` to the page
    pub async fn update_title(&self, tab_id: i32, title: &str) {
        let request = PageRequest::SetTitle { title: title.to_string() };
        settle("updateTitle", self.transport.send_to_tab(tab_id, &request).await);
    }

    /// Fire-and-forget `resetTitle` to the page
    pub async fn reset_title(&self, tab_id: i32) {
        settle("resetTitle", self.transport.send_to_tab(tab_id, &PageRequest::ResetTitle).await);
    }

    pub async fn get_original_title(&self, tab_id: i32) -> Option<TitleStatus> {
        let response = self.transport.send_to_tab(tab_id, &PageRequest::GetOriginalTitle).await;
        decode(settle("getOriginalTitle", response))
    }

    /// Dispatch one popup request; the value is what goes back to the popup
    pub async fn handle(&self, request: BackgroundRequest) -> Option<Value> {
        log::debug!("Background received {:?}", request);
        match request {
            BackgroundRequest::GetTabInfo => self
                .get_tab_info()
                .await
                .and_then(|tab| serde_json::to_value(tab).ok()),
            BackgroundRequest::UpdateTitle { tab_id, title } => {
                self.update_title(tab_id, &title).await;
                None
            }
            BackgroundRequest::ResetTitle { tab_id } => {
                self.reset_title(tab_id).await;
                None
            }
        }
    }
}

/// Popup-side handle on the coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorClient<T> {
    transport: T,
}

impl<T: BackgroundTransport + TabTransport> CoordinatorClient<T> {
    pub fn new(transport: T) -> Self {
        CoordinatorClient { transport }
    }

    pub async fn get_tab_info(&self) -> Option<TabInfo> {
        let response = self.transport.send_to_background(&BackgroundRequest::GetTabInfo).await;
        decode(settle("getTabInfo", response))
    }

    pub async fn update_title(&self, tab_id: i32, title: &str) {
        let request = BackgroundRequest::UpdateTitle {
            tab_id,
            title: title.to_string(),
        };
        settle("updateTitle", self.transport.send_to_background(&request).await);
    }

    pub async fn reset_title(&self, tab_id: i32) {
        let request = BackgroundRequest::ResetTitle { tab_id };
        settle("resetTitle", self.transport.send_to_background(&request).await);
    }

    /// Asks the page directly, without going through the background
    pub async fn get_original_title(&self, tab_id: i32) -> Option<TitleStatus> {
        let response = self.transport.send_to_tab(tab_id, &PageRequest::GetOriginalTitle).await;
        decode(settle("getOriginalTitle", response))
    }
}
