//! Placement factory
//!
//! Pure constructors producing well-formed, default-populated annotations.
//! No caller ever hand-assembles an entity; every factory call generates a
//! fresh unique id.

use crate::annotation::{Annotation, AnnotationKind, TextStyle};

/// Default box for a single-line text field
const TEXT_FIELD_WIDTH: f32 = 180.0;
const TEXT_FIELD_HEIGHT: f32 = 32.0;

/// Default box for a small square checkbox control
const CHECKBOX_EXTENT: f32 = 18.0;

/// Default box for a placeholder image
const IMAGE_EXTENT: f32 = 120.0;

/// Create a text field at the given position and page
///
/// Starts empty, Helvetica 14, black, left-aligned, opaque background.
pub fn text_field(x: f32, y: f32, page: u32) -> Annotation {
    Annotation::new(
        x,
        y,
        TEXT_FIELD_WIDTH,
        TEXT_FIELD_HEIGHT,
        page,
        AnnotationKind::TextField {
            text: String::new(),
            style: TextStyle::default(),
        },
    )
}

/// Create a checkbox at the given position and page
pub fn checkbox(x: f32, y: f32, page: u32, checked: bool) -> Annotation {
    let kind = if checked {
        AnnotationKind::CheckedCheckbox
    } else {
        AnnotationKind::Checkbox
    };
    Annotation::new(x, y, CHECKBOX_EXTENT, CHECKBOX_EXTENT, page, kind)
}

/// Create an image annotation referencing an already-uploaded resource
///
/// Contract: `url` must point at a completed upload; an image annotation
/// never exists without one.
pub fn image(x: f32, y: f32, page: u32, url: String) -> Annotation {
    debug_assert!(!url.is_empty(), "image annotations require an uploaded url");
    Annotation::new(
        x,
        y,
        IMAGE_EXTENT,
        IMAGE_EXTENT,
        page,
        AnnotationKind::Image { url },
    )
}
