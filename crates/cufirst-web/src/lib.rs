//! Browser bindings for the CU FIRST site script.
//!
//! Every page feature looks up its own elements and quietly does nothing
//! when they are absent, so the same bundle serves every page.

use wasm_bindgen::prelude::*;

mod console;
mod contact;
mod dom;
mod events;
mod nav;
mod slideshow;

#[wasm_bindgen(start)]
pub fn start() {
    console::init();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let features: [(&str, fn(&web_sys::Document) -> Result<(), JsValue>); 4] = [
        ("navigation", nav::init),
        ("events", events::init),
        ("contact form", contact::init),
        ("slideshow", slideshow::init),
    ];
    for (name, init) in features {
        if let Err(err) = init(&document) {
            gloo_console::error!(format!("cufirst: {name} setup failed:"), err);
        }
    }
}
