//! Overlay editor core
//!
//! In-memory annotation model backing the interactive document editor:
//! the entity model, the session-scoped store, placement defaults, the
//! drop-target router with its deferred image-upload path, and the payload
//! serializer for the remote rendering service.

pub mod annotation;
pub mod drop;
pub mod factory;
pub mod payload;
pub mod store;

pub use annotation::{
    Alignment, Annotation, AnnotationId, AnnotationKind, AnnotationUpdate, Color, ColorParseError,
    FontFamily, TextStyle, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
pub use drop::{
    route, route_and_upload, validate_image_type, DropError, DropGesture, DropKind, DropOutcome,
    ImageSource, ImageUploader, PendingImageDrop, UploadError, ACCEPTED_IMAGE_TYPES,
};
pub use payload::{
    build_render_payload, CheckboxEntry, ImageEntry, OverlayEntry, RenderPayload, TextEntry,
};
pub use store::{AnnotationStore, StoreError, StoreResult};
