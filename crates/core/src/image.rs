//! Lazily loaded contact QR code.
//!
//! The card stays hidden until the phone number is clicked. The first reveal
//! starts the fetch; later toggles only show or hide the card. A failed fetch
//! leaves a retry affordance instead of an endless placeholder.

use utopia_protocol::{ElementId, ImageDimensions, RenderCommand};

use crate::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrState {
    /// Never requested.
    Idle,
    Loading { attempt: u32 },
    Loaded(ImageDimensions),
    Failed { attempts: u32 },
}

#[derive(Debug)]
pub struct QrLoader {
    src: String,
    visible: bool,
    state: QrState,
}

impl QrLoader {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            visible: false,
            state: QrState::Idle,
        }
    }

    pub fn state(&self) -> QrState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the contact card, starting the fetch on first reveal.
    pub fn toggle<H: Host>(&mut self, host: &mut H) -> Vec<RenderCommand> {
        self.visible = !self.visible;
        if self.visible && self.state == QrState::Idle {
            self.start(host, 1);
        }
        self.commands()
    }

    /// Accept a load completion. Only the first completion of an in-flight
    /// attempt counts; anything else is ignored and yields no commands.
    pub fn on_loaded(&mut self, dimensions: ImageDimensions) -> Vec<RenderCommand> {
        let QrState::Loading { attempt } = self.state else {
            tracing::debug!(state = ?self.state, "ignoring QR load completion");
            return Vec::new();
        };
        tracing::debug!(
            attempt,
            width = dimensions.width,
            height = dimensions.height,
            "QR code loaded"
        );
        self.state = QrState::Loaded(dimensions);
        self.commands()
    }

    pub fn on_failed(&mut self) -> Vec<RenderCommand> {
        let QrState::Loading { attempt } = self.state else {
            return Vec::new();
        };
        tracing::warn!(attempt, src = %self.src, "QR code failed to load");
        self.state = QrState::Failed { attempts: attempt };
        self.commands()
    }

    /// Restart the fetch after a failure. No-op in any other state.
    pub fn retry<H: Host>(&mut self, host: &mut H) -> Vec<RenderCommand> {
        let QrState::Failed { attempts } = self.state else {
            return Vec::new();
        };
        self.start(host, attempts + 1);
        self.commands()
    }

    fn start<H: Host>(&mut self, host: &mut H, attempt: u32) {
        tracing::debug!(attempt, src = %self.src, "fetching QR code");
        self.state = QrState::Loading { attempt };
        host.load_image(&self.src);
    }

    /// Full visual state of the card.
    pub fn commands(&self) -> Vec<RenderCommand> {
        let (placeholder, image, retry) = match self.state {
            QrState::Idle => (false, false, false),
            QrState::Loading { .. } => (true, false, false),
            QrState::Loaded(_) => (false, true, false),
            QrState::Failed { .. } => (false, false, true),
        };
        let mut commands = vec![
            RenderCommand::SetVisible {
                target: ElementId::ContactCard,
                visible: self.visible,
            },
            RenderCommand::SetVisible {
                target: ElementId::QrPlaceholder,
                visible: placeholder,
            },
            RenderCommand::SetVisible {
                target: ElementId::QrRetry,
                visible: retry,
            },
        ];
        if let QrState::Loaded(dimensions) = self.state {
            commands.push(RenderCommand::SetImageSource {
                target: ElementId::QrCode,
                src: self.src.clone(),
            });
            commands.push(RenderCommand::SetMaxWidth {
                target: ElementId::ContactCard,
                css: card_width(dimensions),
            });
        }
        commands.push(RenderCommand::SetVisible {
            target: ElementId::QrCode,
            visible: image,
        });
        commands.push(RenderCommand::SetOpacity {
            target: ElementId::QrCode,
            opacity: if image { 1.0 } else { 0.0 },
        });
        commands
    }
}

/// Card width once the natural size is known: never wider than the image,
/// never wider than 90% of the viewport.
pub fn card_width(dimensions: ImageDimensions) -> Option<String> {
    if dimensions.width == 0 {
        return None;
    }
    Some(format!("min({}px, 90vw)", dimensions.width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;

    fn visible(cmds: &[RenderCommand], id: ElementId) -> Option<bool> {
        cmds.iter().find_map(|c| match c {
            RenderCommand::SetVisible { target, visible } if *target == id => Some(*visible),
            _ => None,
        })
    }

    #[test]
    fn first_reveal_starts_fetch_once() {
        let mut host = SimulatedHost::with_window(800.0, 600.0);
        let mut qr = QrLoader::new("qr.jpg");

        let cmds = qr.toggle(&mut host);
        assert_eq!(visible(&cmds, ElementId::ContactCard), Some(true));
        assert_eq!(visible(&cmds, ElementId::QrPlaceholder), Some(true));
        assert_eq!(host.take_image_requests(), vec!["qr.jpg".to_string()]);

        qr.toggle(&mut host);
        qr.toggle(&mut host);
        assert!(host.take_image_requests().is_empty());
        assert_eq!(qr.state(), QrState::Loading { attempt: 1 });
    }

    #[test]
    fn load_completion_is_applied_once() {
        let mut host = SimulatedHost::with_window(800.0, 600.0);
        let mut qr = QrLoader::new("qr.jpg");
        qr.toggle(&mut host);

        let cmds = qr.on_loaded(ImageDimensions::new(430, 430));
        assert_eq!(visible(&cmds, ElementId::QrCode), Some(true));
        assert_eq!(visible(&cmds, ElementId::QrPlaceholder), Some(false));
        assert!(cmds.contains(&RenderCommand::SetMaxWidth {
            target: ElementId::ContactCard,
            css: Some("min(430px, 90vw)".to_string()),
        }));

        assert!(qr.on_loaded(ImageDimensions::new(1, 1)).is_empty());
        assert_eq!(qr.state(), QrState::Loaded(ImageDimensions::new(430, 430)));
    }

    #[test]
    fn failure_offers_retry() {
        let mut host = SimulatedHost::with_window(800.0, 600.0);
        let mut qr = QrLoader::new("qr.jpg");
        qr.toggle(&mut host);
        host.take_image_requests();

        let cmds = qr.on_failed();
        assert_eq!(visible(&cmds, ElementId::QrRetry), Some(true));
        assert_eq!(visible(&cmds, ElementId::QrPlaceholder), Some(false));
        assert_eq!(qr.state(), QrState::Failed { attempts: 1 });

        let cmds = qr.retry(&mut host);
        assert_eq!(visible(&cmds, ElementId::QrRetry), Some(false));
        assert_eq!(qr.state(), QrState::Loading { attempt: 2 });
        assert_eq!(host.take_image_requests().len(), 1);
    }

    #[test]
    fn completion_without_request_is_ignored() {
        let mut qr = QrLoader::new("qr.jpg");
        assert!(qr.on_loaded(ImageDimensions::new(10, 10)).is_empty());
        assert!(qr.on_failed().is_empty());
        assert_eq!(qr.state(), QrState::Idle);
    }

    #[test]
    fn zero_width_leaves_card_unconstrained() {
        assert_eq!(card_width(ImageDimensions::new(0, 0)), None);
    }
}
