//! Annotation entity model
//!
//! Defines the tagged union of placeable elements (text fields, checkboxes,
//! images) tracked during one editing session. Positions are expressed in
//! page-surface pixels at 100% zoom with a top-left origin.

use serde::{Deserialize, Serialize};

/// Unique identifier for an annotation
///
/// Generated at creation and immutable for the lifetime of the entity.
pub type AnnotationId = uuid::Uuid;

/// Minimum font size for text fields (in points)
pub const MIN_FONT_SIZE: u8 = 8;

/// Maximum font size for text fields (in points)
pub const MAX_FONT_SIZE: u8 = 72;

/// Smallest extent an annotation box may be resized to
pub const MIN_EXTENT: f32 = 1.0;

/// RGB color, carried on the wire as a `#RRGGBB` hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };

    /// Create a new color
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as a `#RRGGBB` hex string
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a `#RRGGBB` hex string
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(s.to_owned()))?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_owned()));
        }

        let channel = |range| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(s.to_owned()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Error parsing a hex color string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0}")]
pub struct ColorParseError(pub String);

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Closed set of font families supported by the rendering service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    Courier,
    Arial,
    Verdana,
}

impl FontFamily {
    /// Wire-level font name
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Courier => "Courier",
            FontFamily::Arial => "Arial",
            FontFamily::Verdana => "Verdana",
        }
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Visual styling for text field annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(rename = "fontFamily")]
    pub font_family: FontFamily,

    /// Font size in points, domain 8-72
    #[serde(rename = "fontSize")]
    pub font_size: u8,

    #[serde(rename = "fontBold")]
    pub bold: bool,

    #[serde(rename = "fontItalic")]
    pub italic: bool,

    #[serde(rename = "fontUnderline")]
    pub underline: bool,

    #[serde(rename = "fontStrikeout")]
    pub strikeout: bool,

    pub color: Color,

    pub alignment: Alignment,

    /// Suppresses the background fill on render
    pub transparent: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: FontFamily::Helvetica,
            font_size: 14,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            color: Color::BLACK,
            alignment: Alignment::Left,
            transparent: false,
        }
    }
}

/// Variant-specific annotation payload
///
/// Checked and unchecked boxes are distinct variants rather than a boolean
/// flag, so each variant maps to exactly one wire representation. An `Image`
/// cannot be constructed without a resolved resource URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AnnotationKind {
    TextField {
        /// Field content, may be empty
        text: String,

        #[serde(flatten)]
        style: TextStyle,
    },

    /// Unchecked box, no extra attributes
    Checkbox,

    /// Checked box, no extra attributes
    CheckedCheckbox,

    Image {
        /// URL of an already-uploaded image resource, never empty
        url: String,
    },
}

impl AnnotationKind {
    /// Internal variant tag, matching the JSON-export discriminant
    pub fn tag(&self) -> &'static str {
        match self {
            AnnotationKind::TextField { .. } => "TextField",
            AnnotationKind::Checkbox => "Checkbox",
            AnnotationKind::CheckedCheckbox => "CheckedCheckbox",
            AnnotationKind::Image { .. } => "Image",
        }
    }
}

/// One placeable element on the document
///
/// Created only through the placement factory, mutated through partial
/// updates, and removed individually or via a bulk clear. The id and the
/// variant are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    id: AnnotationId,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    /// Zero-based page index; not validated against an actual page count
    page: u32,
    #[serde(flatten)]
    kind: AnnotationKind,
}

impl Annotation {
    /// Create a new annotation with a generated id
    ///
    /// Crate-private so that entities are only ever built by the factory.
    pub(crate) fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        page: u32,
        kind: AnnotationKind,
    ) -> Self {
        Self {
            id: AnnotationId::new_v4(),
            x,
            y,
            width: width.max(MIN_EXTENT),
            height: height.max(MIN_EXTENT),
            page,
            kind,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Zero-based page index this annotation belongs to
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn kind(&self) -> &AnnotationKind {
        &self.kind
    }

    /// Merge a partial update into this entity
    ///
    /// Geometry fields apply to every variant. Text and style fields apply
    /// only to `TextField`, the url only to `Image`; fields that do not fit
    /// the variant are ignored. Out-of-domain values are clamped rather than
    /// rejected. The id and the variant are unrepresentable in
    /// [`AnnotationUpdate`] and therefore can never change.
    pub(crate) fn apply_update(&mut self, update: &AnnotationUpdate) {
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(width) = update.width {
            self.width = width.max(MIN_EXTENT);
        }
        if let Some(height) = update.height {
            self.height = height.max(MIN_EXTENT);
        }
        if let Some(page) = update.page {
            self.page = page;
        }

        match &mut self.kind {
            AnnotationKind::TextField { text, style } => {
                if let Some(new_text) = &update.text {
                    *text = new_text.clone();
                }
                if let Some(font_family) = update.font_family {
                    style.font_family = font_family;
                }
                if let Some(font_size) = update.font_size {
                    style.font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
                }
                if let Some(bold) = update.bold {
                    style.bold = bold;
                }
                if let Some(italic) = update.italic {
                    style.italic = italic;
                }
                if let Some(underline) = update.underline {
                    style.underline = underline;
                }
                if let Some(strikeout) = update.strikeout {
                    style.strikeout = strikeout;
                }
                if let Some(color) = update.color {
                    style.color = color;
                }
                if let Some(alignment) = update.alignment {
                    style.alignment = alignment;
                }
                if let Some(transparent) = update.transparent {
                    style.transparent = transparent;
                }
            }
            AnnotationKind::Image { url } => {
                // An image must always reference an uploaded resource, so an
                // empty replacement url is ignored.
                if let Some(new_url) = &update.url {
                    if !new_url.is_empty() {
                        *url = new_url.clone();
                    }
                }
            }
            AnnotationKind::Checkbox | AnnotationKind::CheckedCheckbox => {}
        }
    }
}

/// Partial update for an existing annotation
///
/// Every field is optional; absent fields leave the entity untouched. The
/// struct deliberately carries no id and no variant tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationUpdate {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub page: Option<u32>,

    pub text: Option<String>,
    pub font_family: Option<FontFamily>,
    pub font_size: Option<u8>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikeout: Option<bool>,
    pub color: Option<Color>,
    pub alignment: Option<Alignment>,
    pub transparent: Option<bool>,

    pub url: Option<String>,
}
