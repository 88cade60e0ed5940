//! Scroll-linked opacity of the hero chevron and the header title.

use utopia_protocol::{ElementId, RenderCommand, ScrollState, ViewportState, non_negative};

use crate::config::FadeConfig;

/// How far the hero section has scrolled out of view, in `[0, 1]`.
///
/// The hero starts at the top of the page, so progress is the scroll offset
/// over the hero's height.
pub fn scroll_progress(scroll_y: f64, hero_height: f64) -> f64 {
    let scroll_y = non_negative(scroll_y);
    let hero_height = non_negative(hero_height);
    if hero_height == 0.0 {
        return if scroll_y > 0.0 { 1.0 } else { 0.0 };
    }
    (scroll_y / hero_height).clamp(0.0, 1.0)
}

/// Interpolate opacity linearly across `range`, clamped at both ends.
pub fn fade_opacity(progress: f64, range: [f64; 2], opacity: [f64; 2]) -> f64 {
    let [start, end] = range;
    let [from, to] = opacity;
    if end <= start {
        return if progress < start { from } else { to };
    }
    let t = ((progress - start) / (end - start)).clamp(0.0, 1.0);
    from + (to - from) * t
}

pub fn hero_height(viewport: &ViewportState, config: &FadeConfig) -> f64 {
    non_negative(viewport.height - config.hero_inset)
}

pub fn render_fades(
    viewport: &ViewportState,
    scroll: &ScrollState,
    config: &FadeConfig,
) -> Vec<RenderCommand> {
    let progress = scroll_progress(scroll.scroll_y, hero_height(viewport, config));
    vec![
        RenderCommand::SetOpacity {
            target: ElementId::ScrollHint,
            opacity: fade_opacity(progress, config.hint_range, config.hint_opacity),
        },
        RenderCommand::SetOpacity {
            target: ElementId::HeaderTitle,
            opacity: fade_opacity(progress, config.title_range, config.title_opacity),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opacity_of(cmds: &[RenderCommand], id: ElementId) -> Option<f64> {
        cmds.iter().find_map(|c| match c {
            RenderCommand::SetOpacity { target, opacity } if *target == id => Some(*opacity),
            _ => None,
        })
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(scroll_progress(50.0, 100.0), 0.5);
        assert_eq!(scroll_progress(500.0, 100.0), 1.0);
        assert_eq!(scroll_progress(0.0, 0.0), 0.0);
        assert_eq!(scroll_progress(3.0, 0.0), 1.0);
    }

    #[test]
    fn hint_fades_out_over_first_tenth() {
        let config = FadeConfig::default();
        let vp = ViewportState::new(1000.0, 1064.0);
        let top = render_fades(&vp, &ScrollState::new(0.0), &config);
        let mid = render_fades(&vp, &ScrollState::new(50.0), &config);
        let gone = render_fades(&vp, &ScrollState::new(200.0), &config);
        assert_eq!(opacity_of(&top, ElementId::ScrollHint), Some(1.0));
        assert_eq!(opacity_of(&mid, ElementId::ScrollHint), Some(0.5));
        assert_eq!(opacity_of(&gone, ElementId::ScrollHint), Some(0.0));
    }

    #[test]
    fn title_fades_in_between_tenth_and_fifth() {
        let config = FadeConfig::default();
        let vp = ViewportState::new(1000.0, 1064.0);
        let before = render_fades(&vp, &ScrollState::new(100.0), &config);
        let mid = render_fades(&vp, &ScrollState::new(150.0), &config);
        let after = render_fades(&vp, &ScrollState::new(400.0), &config);
        assert_eq!(opacity_of(&before, ElementId::HeaderTitle), Some(0.0));
        let mid = opacity_of(&mid, ElementId::HeaderTitle).unwrap();
        assert!((mid - 0.5).abs() < 1e-9);
        assert_eq!(opacity_of(&after, ElementId::HeaderTitle), Some(1.0));
    }

    #[test]
    fn empty_range_steps() {
        assert_eq!(fade_opacity(0.2, [0.3, 0.3], [1.0, 0.0]), 1.0);
        assert_eq!(fade_opacity(0.3, [0.3, 0.3], [1.0, 0.0]), 0.0);
    }
}
