use std::collections::HashMap;
use std::rc::Rc;

use utopia_core::{FrameRequest, Host, HostEvent, ListenerId, ListenerKind};
use utopia_protocol::{ImageDimensions, ViewportState};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, HtmlImageElement, Window};

/// Forwards host notifications into the mounted page.
pub type Dispatch = Rc<dyn Fn(HostEvent)>;

struct Listener {
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

struct PendingFrame {
    request: FrameRequest,
    handle: i32,
}

struct PendingImage {
    element: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

/// [`Host`] backed by the browser window.
///
/// Every closure handed to the browser is owned here, so dropping the host
/// (or unlistening) is what detaches it.
pub struct BrowserHost {
    window: Window,
    dispatch: Dispatch,
    listeners: HashMap<ListenerId, Listener>,
    next_listener: u64,
    frame: Option<PendingFrame>,
    /// Callback of the most recent frame. Replaced, never dropped while the
    /// browser may still invoke it.
    frame_closure: Option<Closure<dyn FnMut(f64)>>,
    next_frame: u64,
    image: Option<PendingImage>,
}

impl BrowserHost {
    pub fn new(window: Window, dispatch: Dispatch) -> Self {
        Self {
            window,
            dispatch,
            listeners: HashMap::new(),
            next_listener: 0,
            frame: None,
            frame_closure: None,
            next_frame: 0,
            image: None,
        }
    }

    fn detach_image(&mut self) {
        if let Some(image) = self.image.take() {
            image.element.set_onload(None);
            image.element.set_onerror(None);
        }
    }
}

impl Host for BrowserHost {
    fn dimensions(&self) -> Option<ViewportState> {
        let width = self.window.inner_width().ok()?.as_f64()?;
        let height = self.window.inner_height().ok()?.as_f64()?;
        Some(ViewportState::new(width, height))
    }

    fn scroll_y(&self) -> Option<f64> {
        self.window.scroll_y().ok()
    }

    fn listen(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;

        let (event, host_event) = match kind {
            ListenerKind::Resize => ("resize", HostEvent::Resize),
            ListenerKind::Scroll => ("scroll", HostEvent::Scroll),
        };
        let dispatch = Rc::clone(&self.dispatch);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            dispatch(host_event);
        });

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
        {
            web_sys::console::error_1(&format!("utopia: cannot listen for {event}: {e:?}").into());
        }
        self.listeners.insert(id, Listener { event, closure });
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        if let Some(listener) = self.listeners.remove(&id) {
            let _ = self.window.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
    }

    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_frame);
        self.next_frame += 1;

        let dispatch = Rc::clone(&self.dispatch);
        let closure = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            dispatch(HostEvent::Frame(request));
        });
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(handle) => self.frame = Some(PendingFrame { request, handle }),
            Err(e) => {
                web_sys::console::error_1(&format!("utopia: requestAnimationFrame: {e:?}").into());
            }
        }
        self.frame_closure = Some(closure);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Some(frame) = self.frame.take_if(|f| f.request == request) {
            let _ = self.window.cancel_animation_frame(frame.handle);
            self.frame_closure = None;
        }
    }

    fn load_image(&mut self, src: &str) {
        self.detach_image();
        let element = match HtmlImageElement::new() {
            Ok(element) => element,
            Err(e) => {
                web_sys::console::error_1(&format!("utopia: cannot create image: {e:?}").into());
                (self.dispatch)(HostEvent::ImageFailed);
                return;
            }
        };

        let onload = {
            let dispatch = Rc::clone(&self.dispatch);
            let element = element.clone();
            Closure::<dyn FnMut()>::new(move || {
                dispatch(HostEvent::ImageLoaded(ImageDimensions::new(
                    element.natural_width(),
                    element.natural_height(),
                )));
            })
        };
        let onerror = {
            let dispatch = Rc::clone(&self.dispatch);
            Closure::<dyn FnMut()>::new(move || dispatch(HostEvent::ImageFailed))
        };
        element.set_onload(Some(onload.as_ref().unchecked_ref()));
        element.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        element.set_src(src);

        self.image = Some(PendingImage {
            element,
            _onload: onload,
            _onerror: onerror,
        });
    }
}

impl Drop for BrowserHost {
    fn drop(&mut self) {
        let ids: Vec<_> = self.listeners.keys().copied().collect();
        for id in ids {
            self.unlisten(id);
        }
        if let Some(frame) = self.frame.take() {
            let _ = self.window.cancel_animation_frame(frame.handle);
        }
        self.detach_image();
    }
}
