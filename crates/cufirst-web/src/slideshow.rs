//! Hero slideshow wiring.
//!
//! Markup: a `.hero-slider` root with `.slide` children and optional
//! `.slider-dot` indicators. `data-interval-ms` on the root overrides the
//! autoplay interval.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use cufirst_core::{PauseReason, SlideView, Slideshow};
use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, FocusEvent, KeyboardEvent, Node};

use crate::dom::{duration_attr, listen, millis, query_all};

type Show = Slideshow<DomSlides, Interval>;

struct DomSlides {
    slides: Vec<Element>,
    dots: Vec<Element>,
}

impl SlideView for DomSlides {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn activate(&mut self, index: usize) {
        for (i, slide) in self.slides.iter().enumerate() {
            let active = i == index;
            if let Err(err) = mark(slide, active, "aria-hidden", !active) {
                gloo_console::error!("cufirst: slide update failed:", err);
            }
        }
        for (i, dot) in self.dots.iter().enumerate() {
            let active = i == index;
            if let Err(err) = mark(dot, active, "aria-current", active) {
                gloo_console::error!("cufirst: slider dot update failed:", err);
            }
        }
    }
}

fn mark(element: &Element, active: bool, aria: &str, aria_value: bool) -> Result<(), JsValue> {
    element.class_list().toggle_with_force("active", active)?;
    element.set_attribute(aria, if aria_value { "true" } else { "false" })
}

/// Spawns the autoplay timer for a shared slideshow.
fn autoplay(show: Weak<RefCell<Show>>) -> impl FnOnce(Duration) -> Interval {
    move |interval| {
        Interval::new(millis(interval), move || {
            if let Some(show) = show.upgrade() {
                show.borrow_mut().next();
            }
        })
    }
}

pub fn init(document: &Document) -> Result<(), JsValue> {
    let Some(root) = document.query_selector(".hero-slider")? else {
        return Ok(());
    };
    let view = DomSlides {
        slides: query_all(&root, ".slide")?,
        dots: query_all(&root, ".slider-dot")?,
    };
    let dots = view.dots.clone();

    let mut show = Slideshow::new(view);
    if let Some(interval) = duration_attr(&root, "data-interval-ms") {
        show = show.with_interval(interval);
    }
    let show = Rc::new(RefCell::new(show));
    show.borrow_mut().start(autoplay(Rc::downgrade(&show)));

    for (index, dot) in dots.iter().enumerate() {
        let weak = Rc::downgrade(&show);
        listen(dot, "click", move |_: web_sys::Event| {
            if let Some(show) = weak.upgrade() {
                show.borrow_mut()
                    .navigate(index as isize, autoplay(weak.clone()));
            }
        })?;
    }

    if !root.has_attribute("tabindex") {
        root.set_attribute("tabindex", "0")?;
    }
    let weak = Rc::downgrade(&show);
    listen(&root, "keydown", move |event: KeyboardEvent| {
        if let Some(show) = weak.upgrade() {
            let handled = show
                .borrow_mut()
                .handle_key(&event.key(), autoplay(weak.clone()));
            if handled.is_some() {
                event.prevent_default();
            }
        }
    })?;

    for (kind, reason) in [("mouseenter", PauseReason::Hover), ("focusin", PauseReason::Focus)] {
        let weak = Rc::downgrade(&show);
        listen(&root, kind, move |_: web_sys::Event| {
            if let Some(show) = weak.upgrade() {
                show.borrow_mut().pause(reason);
            }
        })?;
    }

    let weak = Rc::downgrade(&show);
    listen(&root, "mouseleave", move |_: web_sys::Event| {
        if let Some(show) = weak.upgrade() {
            show.borrow_mut()
                .resume(PauseReason::Hover, autoplay(weak.clone()));
        }
    })?;

    let weak = Rc::downgrade(&show);
    let slider = root.clone();
    listen(&root, "focusout", move |event: FocusEvent| {
        // Focus moving between dots stays inside the slider.
        let next = event.related_target().and_then(|t| t.dyn_into::<Node>().ok());
        if next.is_some_and(|node| slider.contains(Some(&node))) {
            return;
        }
        if let Some(show) = weak.upgrade() {
            show.borrow_mut()
                .resume(PauseReason::Focus, autoplay(weak.clone()));
        }
    })?;

    // Listeners hold weak handles; the page keeps the slideshow alive.
    std::mem::forget(show);
    Ok(())
}
