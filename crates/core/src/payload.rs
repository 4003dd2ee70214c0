//! Wire payload serializer
//!
//! Converts the store contents into the two-section payload consumed by the
//! remote rendering service. Pure and deterministic; safe to call repeatedly.
//!
//! The `pages` selector is asymmetric on purpose: text fields emit an
//! open-ended range ("2-") while checkboxes and images emit the exact page
//! number. The rendering service interprets the range as "this page onward",
//! so normalizing it would change where elements land across pages.

use crate::annotation::{AnnotationKind, TextStyle};
use crate::store::AnnotationStore;
use serde::Serialize;

/// Glyph rendered for a checked checkbox
pub const CHECKMARK: &str = "\u{2713}";

/// Wire-level tag for a text field entry
const WIRE_TEXT: &str = "text";

/// Outbound payload for the rendering call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    /// Source document URL
    pub url: String,

    pub inline: bool,

    /// Text-like entries (text fields and both checkbox variants)
    pub annotations: Vec<OverlayEntry>,

    /// Image entries
    pub images: Vec<ImageEntry>,
}

/// One text-like entry in the `annotations` section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OverlayEntry {
    Text(TextEntry),
    Checkbox(CheckboxEntry),
}

/// Wire shape of a text field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEntry {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: u8,
    /// Open-ended page range, e.g. "2-"
    pub pages: String,
    #[serde(rename = "fontName")]
    pub font_name: String,
    #[serde(rename = "fontBold")]
    pub font_bold: bool,
    #[serde(rename = "fontItalic")]
    pub font_italic: bool,
    #[serde(rename = "fontStrikeout")]
    pub font_strikeout: bool,
    #[serde(rename = "fontUnderline")]
    pub font_underline: bool,
    pub color: String,
    pub alignment: String,
    pub transparent: bool,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub id: String,
}

/// Wire shape of a checkbox (checked or unchecked)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckboxEntry {
    /// Checkmark glyph for the checked variant, empty otherwise
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Exact page number, e.g. "2"
    pub pages: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub id: String,
}

/// One entry in the `images` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageEntry {
    pub url: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Exact page number
    pub pages: String,
}

fn open_page_range(page: u32) -> String {
    format!("{page}-")
}

fn exact_page(page: u32) -> String {
    page.to_string()
}

fn text_entry(
    annotation: &crate::annotation::Annotation,
    text: &str,
    style: &TextStyle,
) -> TextEntry {
    TextEntry {
        text: text.to_owned(),
        x: annotation.x(),
        y: annotation.y(),
        size: style.font_size,
        pages: open_page_range(annotation.page()),
        font_name: style.font_family.as_str().to_owned(),
        font_bold: style.bold,
        font_italic: style.italic,
        font_strikeout: style.strikeout,
        font_underline: style.underline,
        color: style.color.to_hex(),
        alignment: style.alignment.as_str().to_owned(),
        transparent: style.transparent,
        entry_type: WIRE_TEXT.to_owned(),
        id: annotation.id().to_string(),
    }
}

fn checkbox_entry(
    annotation: &crate::annotation::Annotation,
    wire_type: &str,
    text: &str,
) -> CheckboxEntry {
    CheckboxEntry {
        text: text.to_owned(),
        x: annotation.x(),
        y: annotation.y(),
        width: annotation.width(),
        height: annotation.height(),
        pages: exact_page(annotation.page()),
        entry_type: wire_type.to_owned(),
        id: annotation.id().to_string(),
    }
}

/// Build the outbound payload from the current store contents
///
/// Partitions the ordered annotation list into text-like and image groups,
/// preserving relative order within each group. Wire tags diverge from the
/// internal ones: `TextField` becomes `text` and `CheckedCheckbox` becomes
/// `CheckboxChecked`; plain `Checkbox` is carried unchanged.
pub fn build_render_payload(store: &AnnotationStore, source_url: &str) -> RenderPayload {
    let mut annotations = Vec::new();
    let mut images = Vec::new();

    for annotation in store.annotations() {
        match annotation.kind() {
            AnnotationKind::TextField { text, style } => {
                annotations.push(OverlayEntry::Text(text_entry(annotation, text, style)));
            }
            AnnotationKind::Checkbox => {
                annotations.push(OverlayEntry::Checkbox(checkbox_entry(
                    annotation, "Checkbox", "",
                )));
            }
            AnnotationKind::CheckedCheckbox => {
                annotations.push(OverlayEntry::Checkbox(checkbox_entry(
                    annotation,
                    "CheckboxChecked",
                    CHECKMARK,
                )));
            }
            AnnotationKind::Image { url } => {
                images.push(ImageEntry {
                    url: url.clone(),
                    x: annotation.x(),
                    y: annotation.y(),
                    width: annotation.width(),
                    height: annotation.height(),
                    pages: exact_page(annotation.page()),
                });
            }
        }
    }

    RenderPayload {
        url: source_url.to_owned(),
        inline: false,
        annotations,
        images,
    }
}
