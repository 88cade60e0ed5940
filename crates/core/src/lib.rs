//! Scroll-driven profile page logic.
//!
//! The crate is host-agnostic: a [`host::Host`] supplies window metrics and
//! event delivery, and [`page::Page`] answers each event with a list of
//! [`RenderCommand`](utopia_protocol::RenderCommand)s for the host to apply.

pub mod config;
pub mod content;
pub mod fade;
pub mod frame;
pub mod host;
pub mod html;
pub mod image;
pub mod mapper;
pub mod observe;
pub mod page;
pub mod render;
pub mod tracker;

pub use config::{AvatarConfig, ConfigError, FadeConfig, PageConfig, PhaseTwoOffset};
pub use host::{FrameRequest, Host, HostEvent, ListenerId, ListenerKind, SimulatedHost};
pub use mapper::{compute_transform, compute_transform_with};
pub use page::Page;
