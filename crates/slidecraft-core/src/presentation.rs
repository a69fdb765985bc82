//! The presentation document: title, theme and slides.

use crate::slide_list::SlideList;
use crate::theme::{Theme, find_theme};

/// Title of a presentation nobody has named yet.
pub const DEFAULT_TITLE: &str = "Untitled Presentation";

/// Theme selected for new presentations.
pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    /// Store-assigned id, once saved.
    pub id: Option<i64>,
    pub title: String,
    pub theme_id: String,
    pub slides: SlideList,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl Presentation {
    /// A new unsaved presentation seeded with the default title and content slides.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            theme_id: DEFAULT_THEME.to_string(),
            slides: SlideList::default(),
        }
    }

    /// Whether the title was never set.
    pub fn is_untitled(&self) -> bool {
        let title = self.title.trim();
        title.is_empty() || title == DEFAULT_TITLE
    }

    /// Apply a theme to every slide. Returns `None` for an unknown theme id.
    pub fn apply_theme(&mut self, theme_id: &str) -> Option<&'static Theme> {
        let theme = find_theme(theme_id)?;
        theme.apply(self.slides.slides_mut());
        self.theme_id = theme.id.to_string();
        Some(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::Background;

    #[test]
    fn test_new_presentation() {
        let presentation = Presentation::default();
        assert!(presentation.is_untitled());
        assert_eq!(presentation.slides.len(), 2);
        assert_eq!(presentation.id, None);
    }

    #[test]
    fn test_apply_theme() {
        let mut presentation = Presentation::new("Deck");
        let theme = presentation.apply_theme("dark").unwrap();
        assert_eq!(presentation.theme_id, "dark");
        for slide in presentation.slides.slides() {
            assert_eq!(slide.background, Background::Color(theme.background_color.into()));
        }
        assert!(presentation.apply_theme("neon").is_none());
        assert_eq!(presentation.theme_id, "dark");
    }
}
