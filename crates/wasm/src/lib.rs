mod dom;
mod host;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use utopia_core::content::CivilDate;
use utopia_core::{HostEvent, Page, PageConfig};
use utopia_protocol::RenderCommand;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use crate::host::{BrowserHost, Dispatch};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn parse_config(config_json: Option<String>) -> Result<PageConfig, JsError> {
    match config_json {
        Some(json) => PageConfig::from_json(&json).map_err(|e| JsError::new(&e.to_string())),
        None => Ok(PageConfig::default()),
    }
}

fn today() -> Result<CivilDate, JsError> {
    let now = js_sys::Date::new_0();
    CivilDate::new(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .ok_or_else(|| JsError::new("host clock returned an invalid date"))
}

/// Compute the avatar transform for a scroll offset and viewport, as JSON.
#[wasm_bindgen]
pub fn compute_transform(scroll_y: f64, width: f64, height: f64) -> Result<String, JsError> {
    let params = utopia_core::compute_transform(scroll_y, width, height);
    serde_json::to_string(&params).map_err(|e| JsError::new(&e.to_string()))
}

/// Render the full page as static HTML (no window needed).
#[wasm_bindgen]
pub fn render_page_html(config_json: Option<String>) -> Result<String, JsError> {
    let config = parse_config(config_json)?;
    Ok(utopia_core::html::render_page_html(&config, &today()?))
}

struct Shared {
    window: Window,
    document: Document,
    page: RefCell<Option<Page<BrowserHost>>>,
    /// Events that arrived while the page was busy handling another one.
    queued: RefCell<VecDeque<HostEvent>>,
}

impl Shared {
    /// Run `f` against the mounted page, apply its commands, then drain any
    /// events raised re-entrantly in the meantime.
    fn with_page(&self, f: impl FnOnce(&mut Page<BrowserHost>) -> Vec<RenderCommand>) {
        let commands = match self.page.try_borrow_mut() {
            Ok(mut slot) => match slot.as_mut() {
                Some(page) => f(page),
                None => return,
            },
            Err(_) => {
                web_sys::console::warn_1(&"utopia: page busy, action dropped".into());
                return;
            }
        };
        dom::apply_commands(&self.window, &self.document, &commands);
        self.drain();
    }

    fn dispatch(&self, event: HostEvent) {
        self.queued.borrow_mut().push_back(event);
        if self.page.try_borrow_mut().is_ok() {
            self.drain();
        }
    }

    fn drain(&self) {
        loop {
            let Some(event) = self.queued.borrow_mut().pop_front() else {
                return;
            };
            let commands = match self.page.try_borrow_mut() {
                Ok(mut slot) => match slot.as_mut() {
                    Some(page) => page.dispatch(event),
                    None => return,
                },
                Err(_) => {
                    // Whoever holds the page drains after releasing it.
                    self.queued.borrow_mut().push_front(event);
                    return;
                }
            };
            dom::apply_commands(&self.window, &self.document, &commands);
        }
    }
}

/// The floating avatar, mounted on the current window.
///
/// Listeners live exactly as long as this object: `destroy()` (or freeing it
/// from JS) removes them and cancels any pending frame.
#[wasm_bindgen]
pub struct FloatAvatar {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl FloatAvatar {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FloatAvatar, JsError> {
        let config = parse_config(config_json)?;
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;

        let shared = Rc::new(Shared {
            window: window.clone(),
            document,
            page: RefCell::new(None),
            queued: RefCell::new(VecDeque::new()),
        });

        let weak = Rc::downgrade(&shared);
        let dispatch: Dispatch = Rc::new(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch(event);
            }
        });

        let page = Page::mount(BrowserHost::new(window, dispatch), config);
        let initial = page.initial_commands();
        *shared.page.borrow_mut() = Some(page);
        dom::apply_commands(&shared.window, &shared.document, &initial);
        web_sys::console::log_1(&"utopia: float avatar mounted".into());

        Ok(FloatAvatar { shared })
    }

    /// Show or hide the contact QR code.
    #[wasm_bindgen(js_name = toggleContact)]
    pub fn toggle_contact(&self) {
        self.shared.with_page(Page::toggle_contact);
    }

    /// Retry a failed QR code fetch.
    #[wasm_bindgen(js_name = retryQr)]
    pub fn retry_qr(&self) {
        self.shared.with_page(Page::retry_qr);
    }

    /// Scroll one viewport down (hero chevron).
    #[wasm_bindgen(js_name = scrollDown)]
    pub fn scroll_down(&self) {
        self.shared.with_page(|page| page.scroll_hint_clicked());
    }

    /// Current transform parameters as JSON.
    #[wasm_bindgen(getter)]
    pub fn transform(&self) -> Result<String, JsError> {
        let slot = self
            .shared
            .page
            .try_borrow()
            .map_err(|_| JsError::new("page busy"))?;
        let page = slot
            .as_ref()
            .ok_or_else(|| JsError::new("float avatar destroyed"))?;
        serde_json::to_string(&page.transform()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Unmount: detach listeners and cancel the pending frame.
    pub fn destroy(&self) {
        let page = match self.shared.page.try_borrow_mut() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if page.is_some() {
            drop(page);
            self.shared.queued.borrow_mut().clear();
            web_sys::console::log_1(&"utopia: float avatar destroyed".into());
        }
    }
}

impl Drop for FloatAvatar {
    fn drop(&mut self) {
        self.destroy();
    }
}
