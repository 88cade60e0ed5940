//! The seam between the page logic and whatever presents it.
//!
//! A browser window, a terminal, or an in-memory simulation all provide the
//! same handful of capabilities: report the viewport and scroll offset, deliver
//! resize/scroll notifications, schedule a callback for the next frame, and
//! fetch an image in the background.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use utopia_protocol::{ImageDimensions, ViewportState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A scheduled next-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    /// Registered as passive: the handler never blocks scrolling.
    Scroll,
}

/// Notifications a host feeds back into the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize,
    Scroll,
    /// A previously requested frame is being presented.
    Frame(FrameRequest),
    /// The image requested with [`Host::load_image`] finished loading.
    ImageLoaded(ImageDimensions),
    /// The image requested with [`Host::load_image`] could not be loaded.
    ImageFailed,
}

pub trait Host {
    /// Current viewport size, or `None` when there is no window.
    fn dimensions(&self) -> Option<ViewportState>;

    /// Current vertical scroll offset, or `None` when there is no window.
    fn scroll_y(&self) -> Option<f64>;

    fn listen(&mut self, kind: ListenerKind) -> ListenerId;

    fn unlisten(&mut self, id: ListenerId);

    /// Ask for a [`HostEvent::Frame`] before the next paint.
    fn request_frame(&mut self) -> FrameRequest;

    fn cancel_frame(&mut self, request: FrameRequest);

    /// Start fetching an image. Completion arrives as
    /// [`HostEvent::ImageLoaded`] or [`HostEvent::ImageFailed`].
    fn load_image(&mut self, src: &str);
}

#[derive(Debug, Default)]
struct SimulatedState {
    dimensions: Option<ViewportState>,
    scroll_y: Option<f64>,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    next_listener: u64,
    pending_frames: Vec<FrameRequest>,
    next_frame: u64,
    frames_requested: u64,
    image_requests: Vec<String>,
}

/// An in-memory host.
///
/// Clones share state, so a caller can keep a handle after moving one into a
/// mounted page and keep driving (or inspecting) it.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHost {
    state: Rc<RefCell<SimulatedState>>,
}

impl SimulatedHost {
    /// A host with no window: every dimension read reports nothing.
    pub fn windowless() -> Self {
        Self::default()
    }

    pub fn with_window(width: f64, height: f64) -> Self {
        let host = Self::default();
        {
            let mut state = host.state.borrow_mut();
            state.dimensions = Some(ViewportState::new(width, height));
            state.scroll_y = Some(0.0);
        }
        host
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.state.borrow_mut().dimensions = Some(ViewportState::new(width, height));
    }

    pub fn set_scroll_y(&self, scroll_y: f64) {
        self.state.borrow_mut().scroll_y = Some(scroll_y);
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.state.borrow().listeners.values().any(|k| *k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn pending_frames(&self) -> Vec<FrameRequest> {
        self.state.borrow().pending_frames.clone()
    }

    /// Total frames ever requested, cancelled or not.
    pub fn frames_requested(&self) -> u64 {
        self.state.borrow().frames_requested
    }

    /// Present the oldest pending frame, returning the event to dispatch.
    pub fn next_frame(&self) -> Option<HostEvent> {
        let mut state = self.state.borrow_mut();
        if state.pending_frames.is_empty() {
            return None;
        }
        Some(HostEvent::Frame(state.pending_frames.remove(0)))
    }

    pub fn take_image_requests(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().image_requests)
    }
}

impl Host for SimulatedHost {
    fn dimensions(&self) -> Option<ViewportState> {
        self.state.borrow().dimensions
    }

    fn scroll_y(&self) -> Option<f64> {
        self.state.borrow().scroll_y
    }

    fn listen(&mut self, kind: ListenerKind) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.insert(id, kind);
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.state.borrow_mut().listeners.remove(&id);
    }

    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        let request = FrameRequest(state.next_frame);
        state.next_frame += 1;
        state.frames_requested += 1;
        state.pending_frames.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.state
            .borrow_mut()
            .pending_frames
            .retain(|pending| *pending != request);
    }

    fn load_image(&mut self, src: &str) {
        self.state.borrow_mut().image_requests.push(src.to_string());
    }
}
