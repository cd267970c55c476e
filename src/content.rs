/// Content script: wires one `PageContext` to the live document

use crate::chrome::{ChromeStorage, from_js, listen_for_messages, to_js};
use crate::config::Timings;
use crate::enforcer::{TitleSurface, WriteDecision};
use crate::messages::PageRequest;
use crate::navigation::PageContext;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[wasm_bindgen(module = "/content.js")]
extern "C" {
    fn readTitle() -> String;
    fn writeTitle(title: &str);
    fn currentUrl() -> String;
    fn interceptTitleWrites(on_write: &Closure<dyn FnMut(String)>);
    fn observeTitleElement(on_change: &Closure<dyn FnMut(String)>);
    fn observeLocation(on_change: &Closure<dyn FnMut(String)>);
    fn onPageHide(callback: &Closure<dyn FnMut(bool)>);
    fn scheduleTurn(callback: JsValue, delay_ms: u32);
}

/// `document.title`, read and written through the native accessor
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSurface;

impl TitleSurface for DocumentSurface {
    fn current_title(&self) -> String {
        readTitle()
    }

    fn write_title(&mut self, title: &str) {
        writeTitle(title);
    }
}

type Page = Rc<PageContext<DocumentSurface>>;

fn schedule(delay_ms: u32, task: impl FnOnce() + 'static) {
    scheduleTurn(Closure::once_into_js(task), delay_ms);
}

fn on_title_write(page: &Page, title: &str, timings: Timings) {
    if let WriteDecision::Correct(ticket) = page.on_title_write(title) {
        let page = page.clone();
        schedule(timings.correction_delay_ms, move || {
            page.run_correction(ticket);
        });
    }
}

fn resolve_now(page: &Page, url: String) {
    let page = page.clone();
    spawn_local(async move {
        page.resolve(&ChromeStorage, &url).await;
    });
}

fn on_message(page: &Page, message: JsValue) -> JsValue {
    let request = match from_js::<PageRequest>(message) {
        Ok(Some(request)) => request,
        Ok(None) => return JsValue::UNDEFINED,
        Err(e) => {
            log::debug!("Ignoring message: {}", e);
            return JsValue::UNDEFINED;
        }
    };

    to_js(&page.handle_request(request)).unwrap_or_else(|e| {
        log::warn!("Could not encode page reply: {}", e);
        JsValue::UNDEFINED
    })
}

/// Install the title hooks, navigation watcher and message listener
pub fn start(timings: Timings) {
    let url = currentUrl();
    let page: Page = Rc::new(PageContext::new(DocumentSurface, &url));

    let setter_hook = {
        let page = page.clone();
        Closure::<dyn FnMut(String)>::new(move |title: String| on_title_write(&page, &title, timings))
    };
    interceptTitleWrites(&setter_hook);
    setter_hook.forget();

    let element_hook = {
        let page = page.clone();
        Closure::<dyn FnMut(String)>::new(move |title: String| on_title_write(&page, &title, timings))
    };
    observeTitleElement(&element_hook);
    element_hook.forget();

    let location_hook = {
        let page = page.clone();
        Closure::<dyn FnMut(String)>::new(move |new_url: String| {
            if page.on_url_change(&new_url) {
                let page = page.clone();
                schedule(timings.settle_delay_ms, move || resolve_now(&page, new_url));
            }
        })
    };
    observeLocation(&location_hook);
    location_hook.forget();

    let message_hook = {
        let page = page.clone();
        Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |message: JsValue| on_message(&page, message))
    };
    listen_for_messages(&message_hook);
    message_hook.forget();

    let unload_hook = {
        let page = page.clone();
        Closure::<dyn FnMut(bool)>::new(move |persisted: bool| page.on_page_hide(persisted))
    };
    onPageHide(&unload_hook);
    unload_hook.forget();

    log::debug!("Title enforcer installed on {}", url);
    resolve_now(&page, url);
}
