//! Event cards from the `data-events` attribute.

use cufirst_core::{CardOptions, CardRenderer};
use wasm_bindgen::prelude::*;
use web_sys::Document;

pub fn init(document: &Document) -> Result<(), JsValue> {
    let Some(holder) = document.get_element_by_id("event-cards") else {
        return Ok(());
    };
    let payload = holder.get_attribute("data-events").unwrap_or_default();
    let renderer = CardRenderer::new(CardOptions::default());
    // Malformed payloads are logged by the renderer and leave the area empty.
    holder.set_inner_html(&renderer.render_payload_or_empty(&payload));
    Ok(())
}
