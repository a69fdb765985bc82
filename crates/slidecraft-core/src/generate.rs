//! AI outline generation contract.
//!
//! The generator only produces text outlines; mapping them to slides is done
//! here with the regular content-slide layout.

use crate::slide::Slide;
use crate::storage::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Generator returned no slides")]
    Empty,
    #[error("Generation failed: {0}")]
    Backend(String),
}

/// One generated slide: a title and free body text (one point per line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideOutline {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub slide_count: usize,
}

/// Produces slide outlines from a prompt.
pub trait OutlineGenerator: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> BoxFuture<'_, Result<Vec<SlideOutline>, GenerationError>>;
}

impl SlideOutline {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Lay the outline out as a title + bullet-body slide. `number` (1-based)
    /// names slides whose title came back blank.
    pub fn to_slide(&self, number: usize) -> Slide {
        let title = match self.title.trim() {
            "" => format!("Slide {number}"),
            title => title.to_string(),
        };
        let lines: Vec<&str> = self
            .content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        Slide::content_slide(&title, &lines)
    }
}

/// Map outlines to slides in order.
pub fn outlines_to_slides(outlines: &[SlideOutline]) -> Vec<Slide> {
    outlines
        .iter()
        .enumerate()
        .map(|(i, outline)| outline.to_slide(i + 1))
        .collect()
}
