//! Image elements.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Variant data of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    /// Source URI (remote URL or data URI).
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// CSS-style filter string, e.g. `grayscale(100%)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ImageElement {
    pub const PLACEHOLDER_SRC: &'static str = "https://placehold.co/300x200?text=Image";

    pub const DEFAULT_SIZE: Size = Size::new(300.0, 200.0);

    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            filter: None,
        }
    }

    /// Image pointing at the placeholder source.
    pub fn placeholder() -> Self {
        Self::new(Self::PLACEHOLDER_SRC, "Image")
    }

    /// Check if the source is an inline data URI.
    pub fn is_data_uri(&self) -> bool {
        self.src.starts_with("data:")
    }
}
