//! Text elements.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Variant data of a text element: plain text, newlines are line breaks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(default)]
    pub content: String,
}

impl TextElement {
    /// Placeholder content for freshly placed text boxes.
    pub const PLACEHOLDER: &'static str = "Double-click to edit";

    pub const DEFAULT_SIZE: Size = Size::new(200.0, 100.0);

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Non-blank lines of the content, trimmed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}
