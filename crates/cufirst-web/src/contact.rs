//! Contact form wiring.
//!
//! Settings come from data attributes on `#contactForm`:
//! `data-endpoint` (required), `data-mode`, `data-allowed-origins` (space
//! separated) and `data-timeout-ms`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use cufirst_core::{
    ContactSettings, FormFields, FormReply, FormStatus, SiteError, Submission, SubmissionMode,
};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, FormData, HtmlFormElement, HtmlIFrameElement, MessageEvent};

use crate::dom::{duration_attr, listen, millis};

struct ContactForm {
    form: HtmlFormElement,
    status: Option<Element>,
    settings: ContactSettings,
    submission: RefCell<Submission>,
    timer: RefCell<Option<Timeout>>,
}

pub fn init(document: &Document) -> Result<(), JsValue> {
    let Some(form) = document.get_element_by_id("contactForm") else {
        gloo_console::warn!("cufirst: contact form not found, no handler attached");
        return Ok(());
    };
    let form: HtmlFormElement = form.dyn_into()?;

    let Some(settings) = read_settings(&form)? else {
        gloo_console::warn!("cufirst: contact form has no data-endpoint, leaving it alone");
        return Ok(());
    };
    let allow = settings.allow_list().map_err(to_js)?;

    let contact = Rc::new(ContactForm {
        status: document.get_element_by_id("form-status"),
        submission: RefCell::new(Submission::new(allow)),
        timer: RefCell::new(None),
        settings,
        form,
    });

    let weak = Rc::downgrade(&contact);
    listen(&contact.form, "submit", move |event: web_sys::Event| {
        event.prevent_default();
        if let Some(contact) = weak.upgrade() {
            if let Err(err) = contact.submit(&weak) {
                gloo_console::error!("cufirst: form send error:", err);
                let status = contact.submission.borrow_mut().on_network_error(&"submit failed");
                contact.settle(status);
            }
        }
    })?;

    if let Some(window) = web_sys::window() {
        let weak = Rc::downgrade(&contact);
        listen(&window, "message", move |event: MessageEvent| {
            let Some(contact) = weak.upgrade() else {
                return;
            };
            let Some(data) = message_data(&event.data()) else {
                return;
            };
            let status = contact
                .submission
                .borrow_mut()
                .on_message(&event.origin(), &data);
            contact.settle(status);
        })?;
    }

    gloo_console::log!("cufirst: contact form handler attached");
    Ok(())
}

fn read_settings(form: &HtmlFormElement) -> Result<Option<ContactSettings>, JsValue> {
    let Some(endpoint) = form
        .get_attribute("data-endpoint")
        .filter(|e| !e.trim().is_empty())
    else {
        return Ok(None);
    };

    let mut settings = ContactSettings {
        endpoint: Some(endpoint),
        site_origin: web_sys::window().and_then(|w| w.location().origin().ok()),
        ..ContactSettings::default()
    };
    if let Some(mode) = form.get_attribute("data-mode") {
        settings.mode = mode.parse::<SubmissionMode>().map_err(to_js)?;
    }
    if let Some(origins) = form.get_attribute("data-allowed-origins") {
        settings.allowed_origins = origins.split_whitespace().map(str::to_string).collect();
    }
    if let Some(timeout) = duration_attr(form, "data-timeout-ms") {
        settings.timeout_ms = timeout.as_millis() as u64;
    }
    Ok(Some(settings))
}

impl ContactForm {
    fn submit(&self, this: &Weak<Self>) -> Result<(), JsValue> {
        let status = self.submission.borrow_mut().begin();
        self.show(&status);
        self.arm_timer(this);

        match self.settings.mode {
            SubmissionMode::Fetch => {
                let fields = collect_fields(&self.form)?;
                let endpoint = self.endpoint().to_string();
                let this = this.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = send(&endpoint, &fields).await;
                    let Some(contact) = this.upgrade() else {
                        return;
                    };
                    let status = match outcome {
                        Ok(reply) => contact.submission.borrow_mut().on_reply(&reply),
                        Err(err) => {
                            gloo_console::error!("cufirst: form send error:", err.to_string());
                            contact.submission.borrow_mut().on_network_error(&err)
                        }
                    };
                    contact.settle(status);
                });
            }
            SubmissionMode::HiddenFrame => {
                self.ensure_frame()?;
                self.form.set_action(self.endpoint());
                self.form.set_method("post");
                self.form.set_target(&self.settings.frame_name);
                self.form.submit()?;
            }
        }
        Ok(())
    }

    fn endpoint(&self) -> &str {
        self.settings.endpoint.as_deref().unwrap_or_default()
    }

    /// Replaces the status text once the submission takes too long.
    fn arm_timer(&self, this: &Weak<Self>) {
        let this = this.clone();
        let timeout = Timeout::new(millis(self.settings.timeout()), move || {
            if let Some(contact) = this.upgrade() {
                let status = contact.submission.borrow_mut().on_timeout();
                contact.settle(status);
            }
        });
        self.timer.replace(Some(timeout));
    }

    fn ensure_frame(&self) -> Result<(), JsValue> {
        let Some(document) = self.form.owner_document() else {
            return Ok(());
        };
        let selector = format!("iframe[name=\"{}\"]", self.settings.frame_name);
        if document.query_selector(&selector)?.is_some() {
            return Ok(());
        }
        let frame: HtmlIFrameElement = document.create_element("iframe")?.dyn_into()?;
        frame.set_name(&self.settings.frame_name);
        frame.set_attribute("hidden", "")?;
        frame.set_attribute("title", "Contact form delivery")?;
        if let Some(body) = document.body() {
            body.append_child(&frame)?;
        }
        Ok(())
    }

    fn settle(&self, status: Option<FormStatus>) {
        if let Some(status) = status {
            self.show(&status);
        }
    }

    fn show(&self, status: &FormStatus) {
        if let Some(el) = &self.status {
            let text = status.text();
            el.set_text_content(Some(&*text));
        }
        if status.is_final() {
            self.timer.borrow_mut().take();
        }
        if status.resets_form() {
            self.form.reset();
        }
    }
}

async fn send(endpoint: &str, fields: &FormFields) -> Result<FormReply, gloo_net::Error> {
    let response = gloo_net::http::Request::post(endpoint)
        .json(fields)?
        .send()
        .await?;
    let reply = response.json::<FormReply>().await?;
    gloo_console::log!("cufirst: form endpoint replied:", format!("{reply:?}"));
    Ok(reply)
}

fn collect_fields(form: &HtmlFormElement) -> Result<FormFields, JsValue> {
    let data = FormData::new_with_form(form)?;
    let mut fields = FormFields::new();
    let Some(entries) = js_sys::try_iter(&data)? else {
        return Ok(fields);
    };
    for entry in entries {
        let pair = js_sys::Array::from(&entry?);
        // File inputs have no string value and are skipped.
        if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            fields.insert(name, value);
        }
    }
    Ok(fields)
}

/// Message data as JSON; strings stay strings so replies sent as text work.
fn message_data(data: &JsValue) -> Option<serde_json::Value> {
    if let Some(text) = data.as_string() {
        return Some(serde_json::Value::String(text));
    }
    let json: String = js_sys::JSON::stringify(data).ok()?.into();
    serde_json::from_str(&json).ok()
}

fn to_js(err: SiteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
