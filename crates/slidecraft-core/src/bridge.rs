//! Encoding slides into flat text records and back.
//!
//! The store only knows a free-text `content` column and a
//! `background_color` column. A slide is written as a readable preamble (its
//! text, for list views and search) followed by a hidden trailer carrying
//! the whole slide as JSON:
//!
//! ```text
//! <preamble>
//!
//! <!-- slide-data:{"elements":[...],"background":{...},"transition":"fade"} -->
//! ```
//!
//! `<` and `>` are written as `\u003c` / `\u003e` inside the JSON, so the
//! payload can never contain a marker and the last marker in the content is
//! always the trailer. Decoding never fails: content without a usable trailer
//! is rebuilt heuristically from its text.

use crate::elements::{ChartKind, Element, ElementStyle, ShapeKind, new_element_id};
use crate::slide::{Background, BULLET, Slide, SlideId, Transition, bulletize};
use crate::storage::SlideRecord;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Opening of the hidden trailer.
pub const MARKER_PREFIX: &str = "<!-- slide-data:";
/// Closing of the hidden trailer.
pub const MARKER_SUFFIX: &str = "-->";

/// Preamble used for slides with neither text nor a title.
pub const UNTITLED_PREAMBLE: &str = "Untitled Slide";

/// Title and body used when content holds nothing to rebuild from.
pub const FALLBACK_TITLE: &str = "Slide Title";
pub const FALLBACK_BODY: &str = "Click to edit";

/// The two store columns a slide is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSlide {
    pub content: String,
    pub background_color: String,
}

#[derive(Serialize)]
struct PayloadOut<'a> {
    title: &'a str,
    elements: Vec<Element>,
    background: &'a Background,
    transition: Transition,
}

#[derive(Deserialize)]
struct PayloadIn {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    elements: Vec<Value>,
    #[serde(default)]
    background: Option<Background>,
    #[serde(default)]
    transition: Transition,
}

/// Why the trailer could not be used.
#[derive(Debug, Error)]
enum TrailerError {
    #[error("no slide-data marker")]
    Missing,
    #[error("unterminated slide-data marker")]
    Unterminated,
    #[error("invalid slide-data JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a slide into its `content` and `background_color` columns.
pub fn serialize(slide: &Slide) -> serde_json::Result<EncodedSlide> {
    Ok(EncodedSlide {
        content: encode(slide)?,
        background_color: slide.background.flat_color().to_string(),
    })
}

/// Encode a slide into the `content` column. Elements without an id get
/// one in the written payload.
pub fn encode(slide: &Slide) -> serde_json::Result<String> {
    let mut elements = slide.elements.clone();
    for element in &mut elements {
        if element.ensure_id() {
            log::debug!("Assigned id {} to element without one", element.id);
        }
    }
    let payload = PayloadOut {
        title: &slide.title,
        elements,
        background: &slide.background,
        transition: slide.transition,
    };
    let json = serde_json::to_string(&payload)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e");
    Ok(format!("{}\n\n{MARKER_PREFIX}{json} {MARKER_SUFFIX}", preamble(slide)))
}

/// Human-readable text of a slide: its text elements separated by blank lines.
pub fn preamble(slide: &Slide) -> String {
    let texts: Vec<&str> = slide
        .text_contents()
        .filter(|t| !t.trim().is_empty())
        .collect();
    if !texts.is_empty() {
        texts.join("\n\n")
    } else if !slide.title.trim().is_empty() {
        slide.title.clone()
    } else {
        UNTITLED_PREAMBLE.to_string()
    }
}

/// Rebuild a slide from a stored record. The slide takes the record's id.
pub fn deserialize(record: &SlideRecord) -> Slide {
    let mut slide = decode(&record.content, &record.background_color);
    slide.id = SlideId::Persisted(record.id);
    slide
}

/// Rebuild a slide from `content`, falling back to a text heuristic when the
/// trailer is missing or unusable. `background_color` is used when the
/// payload carries no background.
pub fn decode(content: &str, background_color: &str) -> Slide {
    let (text, trailer) = match content.rfind(MARKER_PREFIX) {
        Some(start) => (
            &content[..start],
            parse_trailer(&content[start + MARKER_PREFIX.len()..]),
        ),
        None => (content, Err(TrailerError::Missing)),
    };
    match trailer {
        Ok(payload) if payload_is_readable(&payload) => from_payload(payload, background_color),
        Ok(_) => {
            log::warn!("Rebuilding slide from plain text: no readable element in trailer");
            fallback_slide(text, background_color)
        }
        Err(err) => {
            log::warn!("Rebuilding slide from plain text: {err}");
            fallback_slide(text, background_color)
        }
    }
}

fn parse_trailer(rest: &str) -> Result<PayloadIn, TrailerError> {
    let json = rest
        .trim_end()
        .strip_suffix(MARKER_SUFFIX)
        .ok_or(TrailerError::Unterminated)?;
    Ok(serde_json::from_str(json)?)
}

/// A trailer that lists elements must yield at least one of them.
fn payload_is_readable(payload: &PayloadIn) -> bool {
    payload.elements.is_empty() || payload.elements.iter().any(|value| {
        let mut value = value.clone();
        repair_element(&mut value);
        serde_json::from_value::<Element>(value).is_ok()
    })
}

fn from_payload(payload: PayloadIn, background_color: &str) -> Slide {
    let elements = payload
        .elements
        .into_iter()
        .filter_map(|mut value| {
            repair_element(&mut value);
            match serde_json::from_value::<Element>(value) {
                Ok(element) => Some(element),
                Err(err) => {
                    log::warn!("Dropping unreadable element: {err}");
                    None
                }
            }
        })
        .collect();
    let mut slide = Slide::new(payload.title.unwrap_or_default(), elements);
    slide.background = payload
        .background
        .unwrap_or_else(|| color_background(background_color));
    slide.transition = payload.transition;
    slide
}

/// Patch a missing id and repair shape data written by a buggy upstream.
fn repair_element(value: &mut Value) {
    let Some(element) = value.as_object_mut() else {
        return;
    };
    let has_id = element
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty());
    if !has_id {
        let id = new_element_id();
        log::debug!("Patched element without id as {id}");
        element.insert("id".into(), Value::String(id));
    }
    match element.get("type").and_then(Value::as_str) {
        Some("shape") => repair_shape(element),
        Some("chart") => repair_chart(element),
        _ => {}
    }
}

/// An unknown chart kind falls back to a bar chart.
fn repair_chart(element: &mut Map<String, Value>) {
    let known = element
        .get("chartType")
        .is_none_or(|kind| serde_json::from_value::<ChartKind>(kind.clone()).is_ok());
    if !known {
        log::debug!("Chart has an unknown chart type; using bar");
        element.insert("chartType".into(), Value::String("bar".into()));
    }
}

fn repair_shape(element: &mut Map<String, Value>) {
    let kind = element
        .get("shapeType")
        .and_then(Value::as_str)
        .and_then(ShapeKind::from_name);
    let kind = kind.unwrap_or_else(|| {
        log::debug!(
            "Shape {} has no recognized shape type; using rectangle",
            element.get("id").and_then(Value::as_str).unwrap_or_default()
        );
        element.insert("shapeType".into(), Value::String(ShapeKind::Rectangle.name().into()));
        ShapeKind::Rectangle
    });
    let (fill, stroke) = kind.default_colors();
    for (key, default) in [("fill", fill), ("stroke", stroke)] {
        if !element.get(key).is_some_and(Value::is_string) {
            element.insert(key.into(), Value::String(default.into()));
        }
    }
}

fn color_background(color: &str) -> Background {
    if color.trim().is_empty() {
        Background::default()
    } else {
        Background::Color(color.to_string())
    }
}

/// Rebuild a slide from plain text: the first line becomes a centered title,
/// every further line a bulleted body element below it.
fn fallback_slide(text: &str, background_color: &str) -> Slide {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let mut slide = match lines.next() {
        Some(first) => {
            let stripped = first.trim_start_matches('#').trim();
            let title = if stripped.is_empty() { first } else { stripped };
            let mut elements = vec![Element::text(
                title,
                Rect::new(80.0, 60.0, 1200.0, 160.0),
                ElementStyle::title(44.0),
            )];
            elements.extend(lines.enumerate().map(|(i, line)| {
                let top = 200.0 + i as f64 * 60.0;
                Element::text(
                    bulletize(line),
                    Rect::new(100.0, top, 1180.0, top + 50.0),
                    ElementStyle::body(24.0),
                )
            }));
            Slide::new(title, elements)
        }
        None => Slide::new(
            FALLBACK_TITLE,
            vec![
                Element::text(
                    FALLBACK_TITLE,
                    Rect::new(80.0, 60.0, 1200.0, 160.0),
                    ElementStyle::title(44.0),
                ),
                Element::text(
                    format!("{BULLET}{FALLBACK_BODY}"),
                    Rect::new(100.0, 200.0, 1180.0, 250.0),
                    ElementStyle::body(24.0),
                ),
            ],
        ),
    };
    slide.background = color_background(background_color);
    slide
}
