/// chrome.* implementations of the transport and storage traits

use crate::config::STORAGE_KEY;
use crate::coordinator::{BackgroundTransport, TabTransport};
use crate::error::TitleError;
use crate::messages::{BackgroundRequest, PageRequest};
use crate::storage::{Catalog, CatalogStore};
use crate::title_data::TabInfo;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/chrome.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendToTab(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendToBackground(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = listenForMessages)]
    pub fn listen_for_messages(handler: &Closure<dyn FnMut(JsValue) -> JsValue>);
}

/// Serialize for JS as plain objects (not ES Maps)
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, TitleError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(TitleError::payload)
}

/// `null`/`undefined` read as no value
pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<Option<T>, TitleError> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(TitleError::payload)
}

/// chrome.tabs / chrome.runtime messaging
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Chrome;

impl TabTransport for Chrome {
    async fn active_tab(&self) -> Result<Option<TabInfo>, TitleError> {
        let tab_js = queryActiveTab().await.map_err(TitleError::transport)?;
        from_js(tab_js)
    }

    async fn send_to_tab(&self, tab_id: i32, request: &PageRequest) -> Result<Option<Value>, TitleError> {
        let message = to_js(request)?;
        let response = sendToTab(tab_id, message)
            .await
            .map_err(TitleError::transport)?;
        from_js(response)
    }
}

impl BackgroundTransport for Chrome {
    async fn send_to_background(&self, request: &BackgroundRequest) -> Result<Option<Value>, TitleError> {
        let message = to_js(request)?;
        let response = sendToBackground(message)
            .await
            .map_err(TitleError::transport)?;
        from_js(response)
    }
}

/// The catalog in chrome.storage.local
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChromeStorage;

impl CatalogStore for ChromeStorage {
    async fn load(&self) -> Result<Catalog, TitleError> {
        let storage_js = getStorage(STORAGE_KEY)
            .await
            .map_err(TitleError::storage)?;
        Ok(from_js(storage_js)?.unwrap_or_default())
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), TitleError> {
        let storage_js = to_js(catalog)?;
        setStorage(STORAGE_KEY, storage_js)
            .await
            .map_err(TitleError::storage)
    }
}
