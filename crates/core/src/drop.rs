//! Drop-target routing
//!
//! Translates a drag-and-drop gesture into a store mutation. Text and
//! checkbox drops place synchronously; an image drop is two-phase because a
//! resource URL must be obtained from the upload service first. The pending
//! placement records the store generation at gesture time so that an upload
//! resolving after a session reset is discarded instead of applied to a
//! cleared store.

use crate::annotation::AnnotationId;
use crate::factory;
use crate::store::{AnnotationStore, StoreError};
use async_trait::async_trait;

/// Media types the upload service accepts for image annotations
pub const ACCEPTED_IMAGE_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/bmp",
    "image/webp",
];

/// Annotation kind carried through the platform drag-data channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Text,
    Checkbox,
    CheckedCheckbox,
    Image,
}

impl DropKind {
    /// Parse the drag-data tag written by the drag source
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(DropKind::Text),
            "checkbox" => Some(DropKind::Checkbox),
            "checkedCheckbox" => Some(DropKind::CheckedCheckbox),
            "image" => Some(DropKind::Image),
            _ => None,
        }
    }

    /// Tag written into the drag-data channel
    pub fn tag(&self) -> &'static str {
        match self {
            DropKind::Text => "text",
            DropKind::Checkbox => "checkbox",
            DropKind::CheckedCheckbox => "checkedCheckbox",
            DropKind::Image => "image",
        }
    }
}

/// A completed drag gesture, with the target position already translated
/// into page-surface coordinates by the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropGesture {
    pub kind: DropKind,
    pub x: f32,
    pub y: f32,
    /// Active page index at the time of the drop
    pub page: u32,
}

/// Image file handed to the upload service
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Failure reported by the upload service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("upload failed: {message}")]
pub struct UploadError {
    pub message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External collaborator that stores a blob and returns its URL
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, source: &ImageSource) -> Result<String, UploadError>;
}

/// Errors surfaced by the drop router
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropError {
    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of routing a gesture
#[derive(Debug)]
pub enum DropOutcome {
    /// The entity was created synchronously
    Placed(AnnotationId),

    /// An image drop; placement is deferred until the upload resolves
    NeedsUpload(PendingImageDrop),
}

/// Recorded intent of an image drop awaiting its upload
///
/// Holds the drop position and the store generation observed at gesture
/// time. Completion against a store whose generation has advanced is stale
/// and creates nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingImageDrop {
    x: f32,
    y: f32,
    page: u32,
    generation: u64,
}

impl PendingImageDrop {
    /// Materialize the image annotation with the resolved url
    ///
    /// Returns `Ok(None)` when the session was reset while the upload was in
    /// flight; the resolution is discarded and the store is untouched. A
    /// late-resolving upload is appended at the end of the current order
    /// rather than restored to its original gesture position.
    pub fn complete(
        self,
        store: &mut AnnotationStore,
        url: String,
    ) -> Result<Option<AnnotationId>, DropError> {
        if store.generation() != self.generation {
            tracing::debug!(
                page = self.page,
                "discarding stale image upload after session reset"
            );
            return Ok(None);
        }

        let annotation = factory::image(self.x, self.y, self.page, url);
        let id = annotation.id();
        store.add(annotation)?;
        Ok(Some(id))
    }
}

/// Check a dropped file's media type against the accepted image set
pub fn validate_image_type(content_type: &str) -> Result<(), DropError> {
    if ACCEPTED_IMAGE_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(DropError::UnsupportedImageType(content_type.to_owned()))
    }
}

/// Route a gesture to a store mutation
///
/// Text and checkbox kinds place immediately. An image kind returns a
/// [`PendingImageDrop`]; the caller runs the upload and calls
/// [`PendingImageDrop::complete`] on success.
pub fn route(store: &mut AnnotationStore, gesture: &DropGesture) -> Result<DropOutcome, DropError> {
    let annotation = match gesture.kind {
        DropKind::Text => factory::text_field(gesture.x, gesture.y, gesture.page),
        DropKind::Checkbox => factory::checkbox(gesture.x, gesture.y, gesture.page, false),
        DropKind::CheckedCheckbox => factory::checkbox(gesture.x, gesture.y, gesture.page, true),
        DropKind::Image => {
            return Ok(DropOutcome::NeedsUpload(PendingImageDrop {
                x: gesture.x,
                y: gesture.y,
                page: gesture.page,
                generation: store.generation(),
            }));
        }
    };

    let id = annotation.id();
    store.add(annotation)?;
    Ok(DropOutcome::Placed(id))
}

/// Route a gesture, driving the image upload flow to completion
///
/// Convenience for callers that do not interleave other edits during the
/// upload. `source` is only consulted for image drops. Returns the new id,
/// or `None` when a resolved upload was discarded as stale.
pub async fn route_and_upload(
    store: &mut AnnotationStore,
    uploader: &dyn ImageUploader,
    gesture: &DropGesture,
    source: &ImageSource,
) -> Result<Option<AnnotationId>, DropError> {
    match route(store, gesture)? {
        DropOutcome::Placed(id) => Ok(Some(id)),
        DropOutcome::NeedsUpload(pending) => {
            validate_image_type(&source.content_type)?;
            let url = uploader.upload(source).await.map_err(|error| {
                tracing::warn!(file = %source.file_name, %error, "image upload failed");
                error
            })?;
            pending.complete(store, url)
        }
    }
}
