//! Theme catalog and bulk theme application.

use crate::elements::{ElementKind, ElementStyle};
use crate::slide::{Background, Slide};

/// A named palette applied across a whole presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub background_color: &'static str,
    pub heading_font: &'static str,
    pub body_font: &'static str,
}

const THEMES: &[Theme] = &[
    Theme {
        id: "default",
        name: "Default",
        primary_color: "#4f46e5",
        secondary_color: "#374151",
        background_color: "#ffffff",
        heading_font: "Inter",
        body_font: "Inter",
    },
    Theme {
        id: "modern",
        name: "Modern",
        primary_color: "#0ea5e9",
        secondary_color: "#475569",
        background_color: "#f8fafc",
        heading_font: "Poppins",
        body_font: "Inter",
    },
    Theme {
        id: "minimal",
        name: "Minimal",
        primary_color: "#111111",
        secondary_color: "#555555",
        background_color: "#fafafa",
        heading_font: "Helvetica Neue",
        body_font: "Helvetica",
    },
    Theme {
        id: "dark",
        name: "Dark",
        primary_color: "#f9fafb",
        secondary_color: "#d1d5db",
        background_color: "#111827",
        heading_font: "Inter",
        body_font: "Inter",
    },
    Theme {
        id: "corporate",
        name: "Corporate",
        primary_color: "#1e3a8a",
        secondary_color: "#475569",
        background_color: "#ffffff",
        heading_font: "Roboto",
        body_font: "Open Sans",
    },
    Theme {
        id: "creative",
        name: "Creative",
        primary_color: "#db2777",
        secondary_color: "#7c3aed",
        background_color: "#fff7ed",
        heading_font: "Montserrat",
        body_font: "Lato",
    },
];

/// All available themes.
pub fn catalog() -> &'static [Theme] {
    THEMES
}

/// Look up a theme by id.
pub fn find_theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

impl Theme {
    /// Rewrite every slide's background and every text element's color and font.
    ///
    /// Bold text is treated as a heading (primary color, heading font); all
    /// other text gets the secondary color and body font. The previous values
    /// are overwritten.
    pub fn apply(&self, slides: &mut [Slide]) {
        for slide in slides.iter_mut() {
            slide.background = Background::Color(self.background_color.to_string());
            for element in slide.elements.iter_mut() {
                if !matches!(element.kind, ElementKind::Text(_)) {
                    continue;
                }
                let style = element.style.get_or_insert_with(ElementStyle::default);
                let (color, font) = if style.is_bold() {
                    (self.primary_color, self.heading_font)
                } else {
                    (self.secondary_color, self.body_font)
                };
                style.color = Some(color.to_string());
                style.font_family = Some(font.to_string());
            }
        }
    }
}
