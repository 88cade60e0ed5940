use crate::host::{FrameRequest, Host};

/// Batches bursts of events into a single update per presented frame.
///
/// Invariant: at most one frame request is outstanding at any time.
#[derive(Debug, Default)]
pub struct FrameCoalescer {
    pending: Option<FrameRequest>,
    coalesced: u64,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame unless one is already pending. Returns `true` if a new
    /// request was made.
    pub fn schedule<H: Host>(&mut self, host: &mut H) -> bool {
        if self.pending.is_some() {
            self.coalesced += 1;
            return false;
        }
        self.pending = Some(host.request_frame());
        true
    }

    /// Mark `request` as presented. Returns `false` for anything other than
    /// the outstanding request (stale or cancelled frames).
    pub fn complete(&mut self, request: FrameRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel<H: Host>(&mut self, host: &mut H) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Events absorbed into an already pending frame.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
