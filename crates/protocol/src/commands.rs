use serde::{Deserialize, Serialize};

/// Logical page elements a host can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementId {
    /// The fixed-position avatar image that follows the scroll.
    FloatAvatar,
    /// The "scroll down" chevron at the bottom of the hero section.
    ScrollHint,
    /// Title text inside the sticky header.
    HeaderTitle,
    /// Container around the contact QR code.
    ContactCard,
    /// The lazily fetched QR code image.
    QrCode,
    /// Pulsing skeleton shown while the QR code loads.
    QrPlaceholder,
    /// Retry affordance shown after the QR code failed to load.
    QrRetry,
}

impl ElementId {
    /// Stable DOM id used by both the static HTML and the browser host.
    pub fn dom_id(self) -> &'static str {
        match self {
            Self::FloatAvatar => "float-avatar",
            Self::ScrollHint => "scroll-hint",
            Self::HeaderTitle => "header-title",
            Self::ContactCard => "contact-card",
            Self::QrCode => "qr-code",
            Self::QrPlaceholder => "qr-placeholder",
            Self::QrRetry => "qr-retry",
        }
    }
}

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` per handled event. Hosts apply
/// this list in order; each command carries everything it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Replace the element's inline `transform`, and its `transition` when
    /// one is given.
    SetTransform {
        target: ElementId,
        transform: String,
        transition: Option<String>,
    },

    /// Set inline opacity in `[0, 1]`.
    SetOpacity { target: ElementId, opacity: f64 },

    /// Show or hide an element.
    SetVisible { target: ElementId, visible: bool },

    /// Point an image element at a new source.
    SetImageSource { target: ElementId, src: String },

    /// Constrain an element's width. `None` removes the constraint.
    SetMaxWidth {
        target: ElementId,
        css: Option<String>,
    },

    /// Scroll the window to an absolute vertical offset.
    ScrollTo { top: f64, smooth: bool },
}

impl RenderCommand {
    /// The element this command touches, if any.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::SetTransform { target, .. }
            | Self::SetOpacity { target, .. }
            | Self::SetVisible { target, .. }
            | Self::SetImageSource { target, .. }
            | Self::SetMaxWidth { target, .. } => Some(*target),
            Self::ScrollTo { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_ids_are_unique() {
        let all = [
            ElementId::FloatAvatar,
            ElementId::ScrollHint,
            ElementId::HeaderTitle,
            ElementId::ContactCard,
            ElementId::QrCode,
            ElementId::QrPlaceholder,
            ElementId::QrRetry,
        ];
        let mut ids: Vec<_> = all.iter().map(|e| e.dom_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn scroll_to_has_no_target() {
        let cmd = RenderCommand::ScrollTo {
            top: 100.0,
            smooth: true,
        };
        assert_eq!(cmd.target(), None);
    }

    #[test]
    fn commands_serialize_as_tagged_enums() {
        let cmd = RenderCommand::SetOpacity {
            target: ElementId::ScrollHint,
            opacity: 0.5,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(
            json,
            r#"{"SetOpacity":{"target":"ScrollHint","opacity":0.5}}"#
        );
    }
}
