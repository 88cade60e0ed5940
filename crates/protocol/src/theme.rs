use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Primary50,
    Primary200,
    Primary300,
    Primary500,
    Primary700,
    Primary800,
    Primary900,
    Primary950,

    /// The heart in the footer credits.
    Heart,
}
