use utopia_protocol::ScrollState;

use crate::frame::FrameCoalescer;
use crate::host::{FrameRequest, Host};
use crate::observe::{Observers, SubscriptionId};

/// Scroll offset tracker, updated at most once per presented frame.
///
/// Scroll events only schedule a frame; the offset is read when the frame
/// arrives, so a burst of events collapses into one update carrying the
/// latest value.
#[derive(Debug, Default)]
pub struct ScrollTracker {
    state: ScrollState,
    frames: FrameCoalescer,
    updates: u64,
    observers: Observers<ScrollState>,
}

impl ScrollTracker {
    pub fn capture<H: Host>(host: &H) -> Self {
        Self {
            state: read(host),
            ..Self::default()
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn on_scroll<H: Host>(&mut self, host: &mut H) {
        if !self.frames.schedule(host) {
            tracing::trace!("scroll coalesced into pending frame");
        }
    }

    /// Apply the latest scroll offset if `request` is the pending frame.
    pub fn on_frame<H: Host>(&mut self, request: FrameRequest, host: &H) -> bool {
        if !self.frames.complete(request) {
            return false;
        }
        self.state = read(host);
        self.updates += 1;
        self.observers.notify(&self.state);
        true
    }

    pub fn cancel<H: Host>(&mut self, host: &mut H) {
        self.frames.cancel(host);
    }

    pub fn is_pending(&self) -> bool {
        self.frames.is_pending()
    }

    /// Number of frame-driven state updates applied so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Number of scroll events absorbed by an already pending frame.
    pub fn coalesced(&self) -> u64 {
        self.frames.coalesced()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ScrollState) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}

fn read<H: Host>(host: &H) -> ScrollState {
    ScrollState::new(host.scroll_y().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::host::{HostEvent, SimulatedHost};

    #[test]
    fn burst_of_scrolls_yields_single_update_with_latest_offset() {
        let mut host = SimulatedHost::with_window(1000.0, 1000.0);
        let mut tracker = ScrollTracker::capture(&host);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            tracker.subscribe(move |s| seen.borrow_mut().push(s.scroll_y));
        }

        for y in [10.0, 40.0, 90.0, 120.0] {
            host.set_scroll_y(y);
            tracker.on_scroll(&mut host);
        }
        assert_eq!(host.pending_frames().len(), 1);
        assert_eq!(tracker.state().scroll_y, 0.0);

        let Some(HostEvent::Frame(request)) = host.next_frame() else {
            panic!("expected a pending frame");
        };
        assert!(tracker.on_frame(request, &host));
        assert_eq!(*seen.borrow(), vec![120.0]);
        assert_eq!(tracker.updates(), 1);
        assert_eq!(tracker.coalesced(), 3);
    }

    #[test]
    fn negative_offset_reads_as_zero() {
        let mut host = SimulatedHost::with_window(100.0, 100.0);
        let mut tracker = ScrollTracker::capture(&host);
        host.set_scroll_y(-30.0);
        tracker.on_scroll(&mut host);
        let request = host.pending_frames()[0];
        tracker.on_frame(request, &host);
        assert_eq!(tracker.state().scroll_y, 0.0);
    }

    #[test]
    fn windowless_host_reads_zero_offset() {
        let tracker = ScrollTracker::capture(&SimulatedHost::windowless());
        assert_eq!(tracker.state(), ScrollState::default());
    }

    #[test]
    fn cancel_leaves_nothing_pending() {
        let mut host = SimulatedHost::with_window(100.0, 100.0);
        let mut tracker = ScrollTracker::capture(&host);
        tracker.on_scroll(&mut host);
        tracker.cancel(&mut host);
        assert!(!tracker.is_pending());
        assert!(host.pending_frames().is_empty());
    }
}
