//! Slide document model.

use crate::elements::{Element, ElementStyle, TextAlign, topmost_at};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Logical canvas size every slide is laid out in.
pub const CANVAS_SIZE: Size = Size::new(1280.0, 720.0);

/// Default slide background color.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Bullet prefix applied to body lines.
pub const BULLET: &str = "• ";

/// Slide identifier.
///
/// Slides created in the editor get a local id derived from the creation
/// time; once persisted they carry the id assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlideId {
    Local(u64),
    Persisted(i64),
}

impl SlideId {
    /// Allocate a fresh local id (milliseconds since the epoch, strictly increasing).
    pub fn new_local() -> Self {
        static LAST_LOCAL_ID: AtomicU64 = AtomicU64::new(0);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut last = LAST_LOCAL_ID.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_LOCAL_ID.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return SlideId::Local(next),
                Err(actual) => last = actual,
            }
        }
    }

    /// Store-assigned id, if the slide has been persisted.
    pub fn persisted(&self) -> Option<i64> {
        match self {
            SlideId::Persisted(id) => Some(*id),
            SlideId::Local(_) => None,
        }
    }

    /// Whether the slide still has to be created in the store.
    pub fn is_new(&self) -> bool {
        matches!(self, SlideId::Local(_))
    }
}

/// Slide background, tagged by `type` with a single `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    Color(String),
    Image(String),
    Gradient(String),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(DEFAULT_BACKGROUND.to_string())
    }
}

impl Background {
    pub fn value(&self) -> &str {
        match self {
            Background::Color(v) | Background::Image(v) | Background::Gradient(v) => v,
        }
    }

    /// Flat color for consumers that only understand a color column.
    /// Image and gradient backgrounds report the default background.
    pub fn flat_color(&self) -> &str {
        match self {
            Background::Color(c) => c,
            Background::Image(_) | Background::Gradient(_) => DEFAULT_BACKGROUND,
        }
    }
}

/// Transition played when the slide is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    None,
    Fade,
    Slide,
    Zoom,
    Flip,
}

/// One slide: elements in z-order (first = back), background and transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    /// Display title, shown in the slide list.
    #[serde(default)]
    pub title: String,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub transition: Transition,
}

impl Slide {
    /// Create a slide with the given elements and a fresh local id.
    pub fn new(title: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            id: SlideId::new_local(),
            title: title.into(),
            elements,
            background: Background::default(),
            transition: Transition::default(),
        }
    }

    /// Title slide: a large centered title and a subtitle.
    pub fn title_slide(title: &str, subtitle: &str) -> Self {
        let mut subtitle_style = ElementStyle::body(28.0);
        subtitle_style.text_align = Some(TextAlign::Center);
        subtitle_style.color = Some("#6b7280".to_string());
        Self::new(
            title,
            vec![
                Element::text(
                    title,
                    Rect::new(140.0, 240.0, 1140.0, 360.0),
                    ElementStyle::title(60.0),
                ),
                Element::text(
                    subtitle,
                    Rect::new(240.0, 380.0, 1040.0, 440.0),
                    subtitle_style,
                ),
            ],
        )
    }

    /// Content slide: a heading and one body element holding bullet lines.
    pub fn content_slide(title: &str, lines: &[&str]) -> Self {
        let mut heading = ElementStyle::title(44.0);
        heading.text_align = Some(TextAlign::Left);
        let body: Vec<String> = lines.iter().map(|l| bulletize(l)).collect();
        Self::new(
            title,
            vec![
                Element::text(title, Rect::new(80.0, 60.0, 1200.0, 150.0), heading),
                Element::text(
                    body.join("\n"),
                    Rect::new(80.0, 180.0, 1200.0, 620.0),
                    ElementStyle::body(28.0),
                ),
            ],
        )
    }

    /// The content slide appended by "add slide".
    pub fn default_content() -> Self {
        Self::content_slide("Slide Title", &DEFAULT_BULLETS)
    }

    /// Deep copy with a fresh local id and fresh element ids.
    pub fn duplicate(&self) -> Self {
        Self {
            id: SlideId::new_local(),
            title: self.title.clone(),
            elements: self.elements.iter().map(Element::clone_with_new_id).collect(),
            background: self.background.clone(),
            transition: self.transition,
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Topmost element hit by a canvas point.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<&Element> {
        topmost_at(&self.elements, point, tolerance)
    }

    /// Plain text of every text element, in z-order.
    pub fn text_contents(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(Element::text_content)
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                let el = self.elements.remove(pos);
                self.elements.push(el);
                true
            }
            _ => false,
        }
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                let el = self.elements.remove(pos);
                self.elements.insert(0, el);
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer towards the front.
    pub fn bring_forward(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                self.elements.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer towards the back.
    pub fn send_backward(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.elements.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }
}

const DEFAULT_BULLETS: [&str; 4] = [
    "Add your first key point here",
    "Support it with a second point",
    "Keep each bullet short and clear",
    "Finish with a takeaway",
];

/// Prefix a line with a bullet marker unless it already starts with one.
pub fn bulletize(line: &str) -> String {
    let line = line.trim();
    if has_bullet(line) {
        line.to_string()
    } else {
        format!("{BULLET}{line}")
    }
}

fn has_bullet(line: &str) -> bool {
    line.starts_with('•')
        || line.starts_with("- ")
        || line.starts_with("* ")
        || line.starts_with('·')
        || line.starts_with('▪')
}

/// The two slides a new presentation starts with.
pub fn default_slides() -> Vec<Slide> {
    vec![
        Slide::title_slide("PRESENTATION TITLE", "Subtitle or Author Name"),
        Slide::default_content(),
    ]
}
