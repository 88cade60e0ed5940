pub mod commands;
pub mod theme;
pub mod types;

pub use commands::{ElementId, RenderCommand};
pub use theme::ThemeToken;
pub use types::{
    ImageDimensions, Point, ScrollState, TransformParams, ViewportState, non_negative,
};
