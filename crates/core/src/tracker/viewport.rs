use utopia_protocol::ViewportState;

use crate::host::Host;
use crate::observe::{Observers, SubscriptionId};

#[derive(Debug, Default)]
pub struct ViewportTracker {
    state: ViewportState,
    observers: Observers<ViewportState>,
}

impl ViewportTracker {
    /// Snapshot the host's dimensions at mount. A host without a window
    /// yields a zero viewport.
    pub fn capture<H: Host>(host: &H) -> Self {
        Self {
            state: read(host),
            observers: Observers::new(),
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Re-read the host's dimensions. Returns `true` (and notifies) if they
    /// changed.
    pub fn on_resize<H: Host>(&mut self, host: &H) -> bool {
        let next = read(host);
        if next == self.state {
            return false;
        }
        tracing::trace!(width = next.width, height = next.height, "viewport resized");
        self.state = next;
        self.observers.notify(&next);
        true
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ViewportState) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}

fn read<H: Host>(host: &H) -> ViewportState {
    host.dimensions()
        .map(|d| ViewportState::new(d.width, d.height))
        .unwrap_or_else(ViewportState::zero)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::host::SimulatedHost;

    #[test]
    fn windowless_capture_is_zero() {
        let tracker = ViewportTracker::capture(&SimulatedHost::windowless());
        assert_eq!(tracker.state(), ViewportState::zero());
    }

    #[test]
    fn resize_notifies_only_on_change() {
        let host = SimulatedHost::with_window(800.0, 600.0);
        let mut tracker = ViewportTracker::capture(&host);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            tracker.subscribe(move |vp| seen.borrow_mut().push(*vp));
        }

        assert!(!tracker.on_resize(&host));
        host.resize(1024.0, 768.0);
        assert!(tracker.on_resize(&host));

        assert_eq!(*seen.borrow(), vec![ViewportState::new(1024.0, 768.0)]);
        assert_eq!(tracker.state().width, 1024.0);
    }
}
