use std::collections::HashMap;

use utopia_protocol::{ElementId, RenderCommand};

/// What the terminal currently shows, built up from render commands the
/// same way a browser's DOM would be.
#[derive(Debug, Default)]
pub struct Scene {
    pub avatar_transform: String,
    pub avatar_transition: Option<String>,
    opacity: HashMap<ElementId, f64>,
    visible: HashMap<ElementId, bool>,
    pub qr_src: Option<String>,
    pub card_width: Option<String>,
}

impl Scene {
    /// Apply commands in order. Returns the last requested scroll target.
    pub fn apply(&mut self, commands: &[RenderCommand]) -> Option<f64> {
        let mut scroll_to = None;
        for command in commands {
            match command {
                RenderCommand::SetTransform {
                    target: ElementId::FloatAvatar,
                    transform,
                    transition,
                } => {
                    self.avatar_transform.clone_from(transform);
                    if transition.is_some() {
                        self.avatar_transition.clone_from(transition);
                    }
                }
                RenderCommand::SetTransform { .. } => {}
                RenderCommand::SetOpacity { target, opacity } => {
                    self.opacity.insert(*target, *opacity);
                }
                RenderCommand::SetVisible { target, visible } => {
                    self.visible.insert(*target, *visible);
                }
                RenderCommand::SetImageSource { src, .. } => self.qr_src = Some(src.clone()),
                RenderCommand::SetMaxWidth { css, .. } => self.card_width.clone_from(css),
                RenderCommand::ScrollTo { top, .. } => scroll_to = Some(*top),
            }
        }
        scroll_to
    }

    /// Elements start fully opaque until told otherwise.
    pub fn opacity(&self, id: ElementId) -> f64 {
        self.opacity.get(&id).copied().unwrap_or(1.0)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.visible.get(&id).copied().unwrap_or(true)
    }
}
