//! The mounted page: trackers, mapper and renderer wired to a host.
//!
//! ```text
//!   Host ──HostEvent──▶ Page::dispatch ──▶ trackers ──▶ mapper ──▶ render
//!    ▲                                                               │
//!    └──────────────────────── Vec<RenderCommand> ◀──────────────────┘
//! ```
//!
//! All state lives in the `Page` instance. Mounting registers the resize and
//! scroll listeners; dropping the page removes them and cancels any pending
//! frame.

use utopia_protocol::{RenderCommand, ScrollState, TransformParams, ViewportState};

use crate::config::PageConfig;
use crate::fade::render_fades;
use crate::host::{Host, HostEvent, ListenerId, ListenerKind};
use crate::image::{QrLoader, QrState};
use crate::mapper::compute_transform_with;
use crate::observe::SubscriptionId;
use crate::render::render_avatar;
use crate::tracker::{ScrollTracker, ViewportTracker};

pub struct Page<H: Host> {
    host: H,
    config: PageConfig,
    viewport: ViewportTracker,
    scroll: ScrollTracker,
    qr: QrLoader,
    listeners: Vec<ListenerId>,
}

impl<H: Host> Page<H> {
    /// Capture the host's current state and start listening.
    pub fn mount(mut host: H, config: PageConfig) -> Self {
        let viewport = ViewportTracker::capture(&host);
        let scroll = ScrollTracker::capture(&host);
        let listeners = vec![
            host.listen(ListenerKind::Resize),
            host.listen(ListenerKind::Scroll),
        ];
        tracing::debug!(
            width = viewport.state().width,
            height = viewport.state().height,
            scroll_y = scroll.state().scroll_y,
            "page mounted"
        );
        let qr = QrLoader::new(config.content.qr_src.clone());
        Self {
            host,
            config,
            viewport,
            scroll,
            qr,
            listeners,
        }
    }

    /// Commands for the first paint.
    pub fn initial_commands(&self) -> Vec<RenderCommand> {
        let mut commands = self.frame_commands();
        commands.extend(self.qr.commands());
        commands
    }

    /// Handle one host notification.
    pub fn dispatch(&mut self, event: HostEvent) -> Vec<RenderCommand> {
        match event {
            HostEvent::Resize => {
                if !self.viewport.on_resize(&self.host) {
                    return Vec::new();
                }
                if self.scroll.is_pending() {
                    // The pending frame renders with the fresh viewport and
                    // the scroll offset it reads on arrival.
                    Vec::new()
                } else {
                    self.frame_commands()
                }
            }
            HostEvent::Scroll => {
                self.scroll.on_scroll(&mut self.host);
                Vec::new()
            }
            HostEvent::Frame(request) => {
                if self.scroll.on_frame(request, &self.host) {
                    self.frame_commands()
                } else {
                    Vec::new()
                }
            }
            HostEvent::ImageLoaded(dimensions) => self.qr.on_loaded(dimensions),
            HostEvent::ImageFailed => self.qr.on_failed(),
        }
    }

    /// The phone number was clicked.
    pub fn toggle_contact(&mut self) -> Vec<RenderCommand> {
        self.qr.toggle(&mut self.host)
    }

    pub fn retry_qr(&mut self) -> Vec<RenderCommand> {
        self.qr.retry(&mut self.host)
    }

    /// The hero chevron was clicked: scroll one viewport down.
    pub fn scroll_hint_clicked(&self) -> Vec<RenderCommand> {
        vec![RenderCommand::ScrollTo {
            top: self.viewport.state().height,
            smooth: true,
        }]
    }

    /// Transform for the latest viewport and scroll snapshots.
    pub fn transform(&self) -> TransformParams {
        let viewport = self.viewport.state();
        compute_transform_with(
            &self.config.avatar,
            self.scroll.state().scroll_y,
            viewport.width,
            viewport.height,
        )
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn scroll_tracker(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn qr_state(&self) -> QrState {
        self.qr.state()
    }

    /// Whether the contact card is currently revealed.
    pub fn contact_visible(&self) -> bool {
        self.qr.is_visible()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn subscribe_viewport(
        &mut self,
        callback: impl FnMut(&ViewportState) + 'static,
    ) -> SubscriptionId {
        self.viewport.subscribe(callback)
    }

    pub fn subscribe_scroll(
        &mut self,
        callback: impl FnMut(&ScrollState) + 'static,
    ) -> SubscriptionId {
        self.scroll.subscribe(callback)
    }

    fn frame_commands(&self) -> Vec<RenderCommand> {
        let mut commands = render_avatar(&self.transform(), &self.config.avatar);
        commands.extend(render_fades(
            &self.viewport.state(),
            &self.scroll.state(),
            &self.config.fade,
        ));
        commands
    }
}

impl<H: Host> Drop for Page<H> {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.host.unlisten(id);
        }
        self.scroll.cancel(&mut self.host);
        tracing::debug!("page unmounted");
    }
}

impl<H: Host> std::fmt::Debug for Page<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("viewport", &self.viewport.state())
            .field("scroll", &self.scroll.state())
            .field("qr", &self.qr.state())
            .field("contact_visible", &self.qr.is_visible())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;
    use utopia_protocol::ElementId;

    fn avatar_transform(cmds: &[RenderCommand]) -> Option<&str> {
        cmds.iter().find_map(|c| match c {
            RenderCommand::SetTransform {
                target: ElementId::FloatAvatar,
                transform,
                ..
            } => Some(transform.as_str()),
            _ => None,
        })
    }

    #[test]
    fn mount_registers_both_listeners() {
        let host = SimulatedHost::with_window(1000.0, 1000.0);
        let page = Page::mount(host.clone(), PageConfig::default());
        assert!(host.is_listening(ListenerKind::Resize));
        assert!(host.is_listening(ListenerKind::Scroll));
        assert_eq!(page.transform(), TransformParams::identity());
    }

    #[test]
    fn scroll_waits_for_frame() {
        let host = SimulatedHost::with_window(1000.0, 1000.0);
        let mut page = Page::mount(host.clone(), PageConfig::default());

        host.set_scroll_y(105.0);
        assert!(page.dispatch(HostEvent::Scroll).is_empty());
        assert_eq!(page.scroll().scroll_y, 0.0);

        let frame = host.next_frame().unwrap();
        let cmds = page.dispatch(frame);
        assert_eq!(
            avatar_transform(&cmds),
            Some("translate(-50%, -50%) translateX(0px) translateY(-105px) scale(0.825)")
        );
    }

    #[test]
    fn resize_recomputes_with_latest_scroll_snapshot() {
        let host = SimulatedHost::with_window(1000.0, 1000.0);
        let mut page = Page::mount(host.clone(), PageConfig::default());
        host.set_scroll_y(500.0);
        page.dispatch(HostEvent::Scroll);
        if let Some(frame) = host.next_frame() {
            page.dispatch(frame);
        }

        host.resize(500.0, 1000.0);
        let cmds = page.dispatch(HostEvent::Resize);
        // Limit is now -200; slide of -290 is clamped.
        assert_eq!(
            avatar_transform(&cmds),
            Some("translate(-50%, -50%) translateX(-200px) translateY(-420px) scale(0.35)")
        );
    }

    #[test]
    fn resize_during_pending_scroll_defers_to_frame() {
        let host = SimulatedHost::with_window(1000.0, 1000.0);
        let mut page = Page::mount(host.clone(), PageConfig::default());

        host.set_scroll_y(500.0);
        page.dispatch(HostEvent::Scroll);
        host.resize(500.0, 1000.0);
        assert!(page.dispatch(HostEvent::Resize).is_empty());
        assert_eq!(page.viewport().width, 500.0);

        let frame = host.next_frame().unwrap();
        let cmds = page.dispatch(frame);
        assert_eq!(
            avatar_transform(&cmds),
            Some("translate(-50%, -50%) translateX(-200px) translateY(-420px) scale(0.35)")
        );
    }

    #[test]
    fn unchanged_resize_emits_nothing() {
        let host = SimulatedHost::with_window(1000.0, 1000.0);
        let mut page = Page::mount(host, PageConfig::default());
        assert!(page.dispatch(HostEvent::Resize).is_empty());
    }

    #[test]
    fn scroll_hint_scrolls_one_viewport() {
        let page = Page::mount(SimulatedHost::with_window(800.0, 900.0), PageConfig::default());
        assert_eq!(
            page.scroll_hint_clicked(),
            vec![RenderCommand::ScrollTo {
                top: 900.0,
                smooth: true
            }]
        );
    }

    #[test]
    fn drop_releases_listeners_and_pending_frame() {
        let host = SimulatedHost::with_window(1000.0, 1000.0);
        {
            let mut page = Page::mount(host.clone(), PageConfig::default());
            page.dispatch(HostEvent::Scroll);
            assert_eq!(host.pending_frames().len(), 1);
        }
        assert_eq!(host.listener_count(), 0);
        assert!(host.pending_frames().is_empty());
    }
}
