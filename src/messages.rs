/// Runtime message types exchanged between popup, background and page
use crate::title_data::TitleStatus;
use serde::{Deserialize, Serialize};

/// Requests the popup sends to the background script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BackgroundRequest {
    GetTabInfo,
    #[serde(rename_all = "camelCase")]
    UpdateTitle { tab_id: i32, title: String },
    #[serde(rename_all = "camelCase")]
    ResetTitle { tab_id: i32 },
}

/// Requests delivered to the content script of one tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageRequest {
    SetTitle { title: String },
    ResetTitle,
    GetOriginalTitle,
}

/// What the content script answers. Every request gets a reply so the
/// sender's channel closes cleanly; `setTitle` and `resetTitle` just get `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageReply {
    Status(TitleStatus),
    Ack(bool),
}
