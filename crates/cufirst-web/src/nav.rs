//! Mobile navigation toggle and footer year.

use std::cell::Cell;

use cufirst_core::{NavState, footer_year};
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::dom::listen;

pub fn init(document: &Document) -> Result<(), JsValue> {
    if let Some(year) = document.get_element_by_id("year") {
        let stamp = footer_year(chrono::Local::now()).to_string();
        year.set_text_content(Some(stamp.as_str()));
    }

    let (Some(button), Some(nav)) = (
        document.query_selector(".nav-toggle")?,
        document.get_element_by_id("site-nav"),
    ) else {
        return Ok(());
    };

    let state = Cell::new(NavState::from_open(nav.class_list().contains("open")));
    let target = button.clone();
    listen(&target, "click", move |_: web_sys::Event| {
        let mut current = state.get();
        let open = current.toggle();
        state.set(current);
        if let Err(err) = nav.class_list().toggle_with_force("open", open) {
            gloo_console::error!("cufirst: nav toggle failed:", err);
        }
        if let Err(err) = button.set_attribute("aria-expanded", current.aria_expanded()) {
            gloo_console::error!("cufirst: nav toggle failed:", err);
        }
    })
}
