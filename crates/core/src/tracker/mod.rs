//! Observers of host window state.
//!
//! Each tracker holds the latest snapshot and notifies subscribers when it
//! changes. Listener registration is owned by the mounted page.

pub mod scroll;
pub mod viewport;

pub use scroll::ScrollTracker;
pub use viewport::ViewportTracker;
