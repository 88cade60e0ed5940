//! Page configuration, loadable from JSON.
//!
//! Every field has a default matching the published page, so an empty JSON
//! object (`{}`) is a valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ProfileContent;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Where the avatar sits vertically once the scroll passes the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTwoOffset {
    /// Jump to twice the threshold, as the published page does.
    #[default]
    DoubledThreshold,
    /// Stay where the first phase left off (`-threshold`).
    Continuous,
}

/// Tuning for the floating avatar's scroll mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Vertical threshold as a fraction of the viewport height.
    pub vertical_ratio: f64,
    /// Maximum leftward travel as a fraction of the viewport width.
    pub horizontal_ratio: f64,
    /// Scale lost over the full vertical phase.
    pub shrink_per_threshold: f64,
    /// Scale floor.
    pub min_scale: f64,
    /// Duration of the transform transition, in seconds.
    pub transition_secs: f64,
    pub phase_two_offset: PhaseTwoOffset,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            vertical_ratio: 0.21,
            horizontal_ratio: 0.4,
            shrink_per_threshold: 0.35,
            min_scale: 0.35,
            transition_secs: 0.1,
            phase_two_offset: PhaseTwoOffset::DoubledThreshold,
        }
    }
}

/// Scroll-linked fades of the hero chevron and the header title.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Progress range over which the scroll hint fades.
    pub hint_range: [f64; 2],
    pub hint_opacity: [f64; 2],
    /// Progress range over which the header title fades in.
    pub title_range: [f64; 2],
    pub title_opacity: [f64; 2],
    /// Height of the sticky header, subtracted from the viewport to get the
    /// hero section height.
    pub hero_inset: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            hint_range: [0.0, 0.1],
            hint_opacity: [1.0, 0.0],
            title_range: [0.1, 0.2],
            title_opacity: [0.0, 1.0],
            hero_inset: 64.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub avatar: AvatarConfig,
    pub fade: FadeConfig,
    pub content: ProfileContent,
}

impl PageConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.avatar;
        unit_interval("avatar.vertical_ratio", a.vertical_ratio)?;
        unit_interval("avatar.horizontal_ratio", a.horizontal_ratio)?;
        unit_interval("avatar.shrink_per_threshold", a.shrink_per_threshold)?;
        unit_interval("avatar.min_scale", a.min_scale)?;
        if a.min_scale == 0.0 {
            return Err(invalid("avatar.min_scale", "must be greater than zero"));
        }
        if !a.transition_secs.is_finite() || a.transition_secs < 0.0 {
            return Err(invalid(
                "avatar.transition_secs",
                "must be a finite, non-negative number of seconds",
            ));
        }

        let f = &self.fade;
        ordered_unit_range("fade.hint_range", f.hint_range)?;
        ordered_unit_range("fade.title_range", f.title_range)?;
        for (field, pair) in [
            ("fade.hint_opacity", f.hint_opacity),
            ("fade.title_opacity", f.title_opacity),
        ] {
            unit_interval(field, pair[0])?;
            unit_interval(field, pair[1])?;
        }
        if !f.hero_inset.is_finite() || f.hero_inset < 0.0 {
            return Err(invalid("fade.hero_inset", "must be finite and >= 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}

fn ordered_unit_range(field: &'static str, range: [f64; 2]) -> Result<(), ConfigError> {
    unit_interval(field, range[0])?;
    unit_interval(field, range[1])?;
    if range[0] > range[1] {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("start {} is after end {}", range[0], range[1]),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.avatar.vertical_ratio, 0.21);
        assert_eq!(config.fade.hero_inset, 64.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{ "avatar": { "phase_two_offset": "continuous", "min_scale": 0.5 } }"#;
        let config = PageConfig::from_json(json).unwrap();
        assert_eq!(config.avatar.phase_two_offset, PhaseTwoOffset::Continuous);
        assert_eq!(config.avatar.min_scale, 0.5);
        assert_eq!(config.avatar.horizontal_ratio, 0.4);
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let err = PageConfig::from_json(r#"{ "avatar": { "vertical_ratio": 1.5 } }"#);
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                field: "avatar.vertical_ratio",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_scale_floor() {
        let err = PageConfig::from_json(r#"{ "avatar": { "min_scale": 0.0 } }"#);
        assert!(matches!(err, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_reversed_fade_range() {
        let err = PageConfig::from_json(r#"{ "fade": { "title_range": [0.3, 0.2] } }"#);
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                field: "fade.title_range",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            PageConfig::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }
}
