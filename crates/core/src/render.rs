//! Transform parameters to render commands.

use utopia_protocol::{ElementId, RenderCommand, TransformParams};

use crate::config::AvatarConfig;

/// CSS transform for the avatar.
///
/// The element is centered on its own box first, then offset and scaled, in
/// that order.
pub fn transform_css(params: &TransformParams) -> String {
    format!(
        "translate(-50%, -50%) translateX({}px) translateY({}px) scale({})",
        css_number(params.translate_x),
        css_number(params.translate_y),
        css_number(params.scale),
    )
}

/// Short eased transition that hides per-frame jumps.
pub fn transition_css(config: &AvatarConfig) -> String {
    format!("transform {}s ease-out", css_number(config.transition_secs))
}

pub fn render_avatar(params: &TransformParams, config: &AvatarConfig) -> Vec<RenderCommand> {
    vec![RenderCommand::SetTransform {
        target: ElementId::FloatAvatar,
        transform: transform_css(params),
        transition: Some(transition_css(config)),
    }]
}

/// Format a number for CSS: at most three decimals, no trailing zeros, and
/// never `-0`.
pub fn css_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
