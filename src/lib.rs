/// Tab Title Keeper - Chrome Extension for Custom Tab Titles
/// Built with Rust + WASM + Yew

mod background;
mod chrome;
pub mod config;
mod content;
pub mod coordinator;
pub mod enforcer;
pub mod error;
pub mod manager;
pub mod matching;
pub mod messages;
pub mod navigation;
pub mod storage;
pub mod title_data;
pub mod ui;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Relay popup requests to tabs
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}

// Enforce saved titles on the current page
#[wasm_bindgen]
pub fn start_content() {
    content::start(config::Timings::default());
}
