//! Browser side effects: clipboard, timers and new tabs.

use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, HtmlTextAreaElement};

use trialview_core::scheduler::Task;
use trialview_core::{Clipboard, Scheduler, TaskHandle, TrialViewError};

/// Clipboard backed by `document.execCommand("copy")`.
pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    fn write_text(&mut self, text: &str) -> trialview_core::Result<()> {
        copy_with_textarea(text).map_err(|e| TrialViewError::Clipboard(format!("{:?}", e)))
    }
}

fn copy_with_textarea(text: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    textarea.set_value(text);
    textarea.set_attribute("readonly", "")?;
    textarea.set_attribute("style", "position:fixed;top:0;left:0;opacity:0")?;
    body.append_child(&textarea)?;
    textarea.select();

    let copied = document.dyn_into::<HtmlDocument>()?.exec_command("copy");
    textarea.remove();
    match copied? {
        true => Ok(()),
        false => Err(JsValue::from_str("copy command rejected")),
    }
}

/// Scheduler backed by `setTimeout`.
#[derive(Clone, Copy, Default)]
pub struct TimeoutScheduler;

pub struct TimeoutHandle(#[allow(dead_code)] Timeout);

// Dropping the inner `Timeout` clears it.
impl TaskHandle for TimeoutHandle {}

impl Scheduler for TimeoutScheduler {
    type Handle = TimeoutHandle;

    fn schedule(&self, delay: Duration, task: Task) -> TimeoutHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        TimeoutHandle(Timeout::new(millis, task))
    }
}

pub fn open_in_new_tab(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.open_with_url_and_target(url, "_blank") {
        log::warn!("failed to open {}: {:?}", url, e);
    }
}

/// Read a flag from localStorage (`"true"` means set).
pub fn local_flag(key: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(key).ok().flatten())
        .is_some_and(|v| v == "true")
}
