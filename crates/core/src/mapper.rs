//! Scroll offset to avatar transform.
//!
//! The avatar travels in two phases. While the scroll offset is below the
//! vertical threshold it moves up with the page and shrinks linearly. Past the
//! threshold it holds its smallest scale, sits at a fixed height, and slides
//! left until it reaches the horizontal limit.

use utopia_protocol::{TransformParams, non_negative};

use crate::config::{AvatarConfig, PhaseTwoOffset};

/// Map a scroll offset and viewport size to avatar transform parameters using
/// the default tuning.
pub fn compute_transform(
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> TransformParams {
    compute_transform_with(
        &AvatarConfig::default(),
        scroll_y,
        viewport_width,
        viewport_height,
    )
}

/// Map a scroll offset and viewport size to avatar transform parameters.
///
/// Total over all inputs: negative and NaN values are treated as zero, and a
/// zero-height viewport yields the identity transform at any scroll offset.
pub fn compute_transform_with(
    config: &AvatarConfig,
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> TransformParams {
    let scroll_y = non_negative(scroll_y);
    let vertical_threshold = vertical_threshold(config, viewport_height);
    let horizontal_limit = horizontal_limit(config, viewport_width);

    // Without a viewport height there is nothing to travel through.
    if vertical_threshold <= 0.0 {
        return TransformParams::identity();
    }

    if scroll_y <= vertical_threshold {
        let scale = (1.0 - (scroll_y / vertical_threshold) * config.shrink_per_threshold)
            .max(config.min_scale);
        TransformParams {
            scale,
            translate_x: 0.0,
            translate_y: 0.0 - scroll_y,
        }
    } else {
        let translate_y = match config.phase_two_offset {
            PhaseTwoOffset::DoubledThreshold => 0.0 - vertical_threshold * 2.0,
            PhaseTwoOffset::Continuous => 0.0 - vertical_threshold,
        };
        TransformParams {
            scale: config.min_scale,
            translate_x: (vertical_threshold - scroll_y).max(horizontal_limit),
            translate_y,
        }
    }
}

/// Scroll offset at which the avatar stops rising and starts sliding.
pub fn vertical_threshold(config: &AvatarConfig, viewport_height: f64) -> f64 {
    non_negative(viewport_height) * config.vertical_ratio
}

/// Leftmost horizontal displacement (always `<= 0`).
pub fn horizontal_limit(config: &AvatarConfig, viewport_width: f64) -> f64 {
    0.0 - non_negative(viewport_width) * config.horizontal_ratio
}
