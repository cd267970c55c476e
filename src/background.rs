/// Background script: relays popup requests to tabs

use crate::chrome::{Chrome, from_js, listen_for_messages, to_js};
use crate::coordinator::Coordinator;
use crate::messages::BackgroundRequest;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

async fn handle_message(message: JsValue) -> JsValue {
    let request = match from_js::<BackgroundRequest>(message) {
        Ok(Some(request)) => request,
        Ok(None) => return JsValue::UNDEFINED,
        Err(e) => {
            log::debug!("Ignoring message: {}", e);
            return JsValue::UNDEFINED;
        }
    };

    let Some(response) = Coordinator::new(Chrome).handle(request).await else {
        return JsValue::UNDEFINED;
    };
    to_js(&response).unwrap_or_else(|e| {
        log::warn!("Could not encode response: {}", e);
        JsValue::UNDEFINED
    })
}

pub fn start() {
    let on_message = Closure::<dyn FnMut(JsValue) -> JsValue>::new(|message: JsValue| {
        JsValue::from(future_to_promise(async move { Ok(handle_message(message).await) }))
    });
    listen_for_messages(&on_message);
    on_message.forget();

    log::info!("Tab Title Keeper background ready");
}
