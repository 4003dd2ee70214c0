//! Editing session state machine
//!
//! Owns one annotation store for the lifetime of one loaded source document
//! and drives the apply flow against the remote rendering service:
//! `Empty -> Editing -> Applying -> Modified`. Store mutations and drop
//! routing happen while editing; apply is guarded by "document loaded and at
//! least one annotation exists" and leaves the store untouched on failure so
//! the user can retry without re-entering annotations.

use async_trait::async_trait;
use overlay_core::{build_render_payload, AnnotationStore, RenderPayload};

/// Phase of the editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No source document loaded
    Empty,

    /// Document loaded; store mutations and drop routing allowed
    Editing,

    /// Apply call in flight
    Applying,

    /// Apply succeeded; the modified document URL is available
    Modified,
}

/// Where keyboard focus currently is
///
/// Delete/backspace removes the selected annotation only when focus is on
/// the editing canvas; inside a text-input control the gesture belongs to
/// the in-progress text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Canvas,
    TextInput,
}

/// Failure reported by the rendering service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    /// Error carrying the service-provided message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Generic fallback when the service gave no usable message
    pub fn generic() -> Self {
        Self::new("document rendering failed")
    }
}

/// External collaborator that renders the payload into a modified document
/// and returns its URL
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, payload: &RenderPayload) -> Result<String, RenderError>;
}

/// Errors surfaced by the apply action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// Rejected before any external call
    #[error("no document loaded")]
    NoDocument,

    /// Rejected before any external call
    #[error("nothing to apply: the document has no annotations")]
    NoAnnotations,

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// One editing session against one source document
#[derive(Debug)]
pub struct EditingSession {
    phase: SessionPhase,
    source_url: Option<String>,
    modified_url: Option<String>,
    store: AnnotationStore,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditingSession {
    /// Create a session with no document loaded
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Empty,
            source_url: None,
            modified_url: None,
            store: AnnotationStore::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// URL of the loaded source document
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// URL of the rendered result, available in the `Modified` phase
    pub fn modified_url(&self) -> Option<&str> {
        self.modified_url.as_deref()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Mutable store access for edits and drop routing
    ///
    /// Mutations are meaningful only while editing; the apply guard and the
    /// generation counter protect the other phases.
    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    /// Load a source document and start editing
    ///
    /// Replacing an already-loaded document clears all annotations, which
    /// also invalidates any image upload still in flight.
    pub fn load_document(&mut self, url: impl Into<String>) {
        self.store.clear_all();
        self.source_url = Some(url.into());
        self.modified_url = None;
        self.phase = SessionPhase::Editing;
    }

    /// Discard the document and return to the empty state
    pub fn discard_document(&mut self) {
        self.store.clear_all();
        self.source_url = None;
        self.modified_url = None;
        self.phase = SessionPhase::Empty;
    }

    /// Clear all annotations and continue editing the same document
    ///
    /// Used after a successful apply-and-download cycle.
    pub fn reset(&mut self) {
        self.store.clear_all();
        self.modified_url = None;
        self.phase = if self.source_url.is_some() {
            SessionPhase::Editing
        } else {
            SessionPhase::Empty
        };
    }

    /// Send the current annotations to the rendering service
    ///
    /// Guarded by "document loaded AND at least one annotation exists";
    /// otherwise rejected with no call made. On success the session moves to
    /// `Modified` and the new document URL is returned; on failure it moves
    /// back to `Editing` with the store untouched.
    pub async fn apply(&mut self, renderer: &dyn DocumentRenderer) -> Result<String, ApplyError> {
        let source_url = self.source_url.clone().ok_or(ApplyError::NoDocument)?;
        if self.store.is_empty() {
            return Err(ApplyError::NoAnnotations);
        }

        self.phase = SessionPhase::Applying;
        let payload = build_render_payload(&self.store, &source_url);

        match renderer.render(&payload).await {
            Ok(url) => {
                tracing::info!(count = self.store.len(), "annotations applied");
                self.modified_url = Some(url.clone());
                self.phase = SessionPhase::Modified;
                Ok(url)
            }
            Err(error) => {
                tracing::warn!(%error, "apply failed; session stays editable");
                self.phase = SessionPhase::Editing;
                Err(ApplyError::Render(error))
            }
        }
    }

    /// Handle a delete/backspace key press
    ///
    /// Removes the selected annotation and returns `true` if something was
    /// removed. Suppressed while focus is inside a text-input control so an
    /// in-progress text edit is never destroyed.
    pub fn handle_delete_key(&mut self, focus: InputFocus) -> bool {
        if focus == InputFocus::TextInput {
            return false;
        }
        match self.store.selected() {
            Some(id) => self.store.remove(id).is_some(),
            None => false,
        }
    }

    /// Export the current annotation list as pretty JSON
    ///
    /// Emits the internal tagged-union form for inspection and debugging,
    /// not the wire payload.
    pub fn export_annotations(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.store.annotations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::factory;

    struct FixedRenderer(Result<String, RenderError>);

    #[async_trait]
    impl DocumentRenderer for FixedRenderer {
        async fn render(&self, _payload: &RenderPayload) -> Result<String, RenderError> {
            self.0.clone()
        }
    }

    fn editing_session() -> EditingSession {
        let mut session = EditingSession::new();
        session.load_document("https://files.example/source.pdf");
        session
    }

    #[test]
    fn new_session_is_empty() {
        let session = EditingSession::new();
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert_eq!(session.source_url(), None);
    }

    #[test]
    fn loading_a_document_starts_editing() {
        let session = editing_session();
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert_eq!(session.source_url(), Some("https://files.example/source.pdf"));
    }

    #[test]
    fn replacing_the_document_clears_annotations() {
        let mut session = editing_session();
        session
            .store_mut()
            .add(factory::text_field(0.0, 0.0, 0))
            .expect("add should succeed");

        session.load_document("https://files.example/other.pdf");
        assert!(session.store().is_empty());
        assert_eq!(session.phase(), SessionPhase::Editing);
    }

    #[tokio::test]
    async fn apply_without_document_is_rejected() {
        let mut session = EditingSession::new();
        let renderer = FixedRenderer(Ok("unused".to_owned()));

        let result = session.apply(&renderer).await;
        assert_eq!(result, Err(ApplyError::NoDocument));
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[tokio::test]
    async fn apply_without_annotations_is_rejected() {
        let mut session = editing_session();
        let renderer = FixedRenderer(Ok("unused".to_owned()));

        let result = session.apply(&renderer).await;
        assert_eq!(result, Err(ApplyError::NoAnnotations));
        assert_eq!(session.phase(), SessionPhase::Editing);
    }

    #[tokio::test]
    async fn successful_apply_moves_to_modified() {
        let mut session = editing_session();
        session
            .store_mut()
            .add(factory::checkbox(0.0, 0.0, 0, true))
            .expect("add should succeed");
        let renderer = FixedRenderer(Ok("https://files.example/result.pdf".to_owned()));

        let url = session.apply(&renderer).await.expect("apply should succeed");
        assert_eq!(url, "https://files.example/result.pdf");
        assert_eq!(session.phase(), SessionPhase::Modified);
        assert_eq!(session.modified_url(), Some("https://files.example/result.pdf"));
        // The store keeps its contents until an explicit reset.
        assert_eq!(session.store().len(), 1);
    }

    #[tokio::test]
    async fn failed_apply_returns_to_editing_with_store_intact() {
        let mut session = editing_session();
        session
            .store_mut()
            .add(factory::text_field(0.0, 0.0, 0))
            .expect("add should succeed");
        let renderer = FixedRenderer(Err(RenderError::new("quota exceeded")));

        let result = session.apply(&renderer).await;
        assert_eq!(
            result,
            Err(ApplyError::Render(RenderError::new("quota exceeded")))
        );
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.modified_url(), None);
    }

    #[tokio::test]
    async fn reset_after_apply_returns_to_editing_same_document() {
        let mut session = editing_session();
        session
            .store_mut()
            .add(factory::checkbox(0.0, 0.0, 0, false))
            .expect("add should succeed");
        let renderer = FixedRenderer(Ok("https://files.example/result.pdf".to_owned()));
        session.apply(&renderer).await.expect("apply should succeed");

        session.reset();

        assert_eq!(session.phase(), SessionPhase::Editing);
        assert!(session.store().is_empty());
        assert_eq!(session.source_url(), Some("https://files.example/source.pdf"));
        assert_eq!(session.modified_url(), None);
    }

    #[test]
    fn discard_returns_to_empty() {
        let mut session = editing_session();
        session
            .store_mut()
            .add(factory::text_field(0.0, 0.0, 0))
            .expect("add should succeed");

        session.discard_document();

        assert_eq!(session.phase(), SessionPhase::Empty);
        assert_eq!(session.source_url(), None);
        assert!(session.store().is_empty());
    }

    #[test]
    fn delete_key_removes_selected_annotation() {
        let mut session = editing_session();
        let annotation = factory::text_field(0.0, 0.0, 0);
        let id = annotation.id();
        session
            .store_mut()
            .add(annotation)
            .expect("add should succeed");
        session.store_mut().select(id);

        assert!(session.handle_delete_key(InputFocus::Canvas));
        assert!(session.store().is_empty());
        assert_eq!(session.store().selected(), None);
    }

    #[test]
    fn delete_key_is_suppressed_inside_text_inputs() {
        let mut session = editing_session();
        let annotation = factory::text_field(0.0, 0.0, 0);
        let id = annotation.id();
        session
            .store_mut()
            .add(annotation)
            .expect("add should succeed");
        session.store_mut().select(id);

        assert!(!session.handle_delete_key(InputFocus::TextInput));
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().selected(), Some(id));
    }

    #[test]
    fn delete_key_without_selection_is_a_no_op() {
        let mut session = editing_session();
        session
            .store_mut()
            .add(factory::text_field(0.0, 0.0, 0))
            .expect("add should succeed");

        assert!(!session.handle_delete_key(InputFocus::Canvas));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn export_emits_the_tagged_union_form() {
        let mut session = editing_session();
        session
            .store_mut()
            .add(factory::checkbox(1.0, 2.0, 0, true))
            .expect("add should succeed");

        let json = session.export_annotations().expect("export should succeed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("export is json");

        assert_eq!(value[0]["type"], "CheckedCheckbox");
        assert_eq!(value[0]["x"], 1.0);
        // Not the wire payload: no pages selector in the export form.
        assert!(value[0].get("pages").is_none());
    }
}
