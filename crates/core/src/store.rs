//! Annotation store
//!
//! Sole owner of the annotation collection and the single-selection pointer
//! for the lifetime of one editing session. Insertion order is preserved and
//! defines layering and listing order. All mutations are synchronous and
//! all-or-nothing at the single-entity granularity.

use crate::annotation::{Annotation, AnnotationId, AnnotationUpdate};

/// Errors that can occur during store mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An annotation with this id is already present. Cannot happen when all
    /// entities come from the placement factory.
    #[error("annotation already exists: {0}")]
    DuplicateId(AnnotationId),

    /// No annotation with this id is present
    #[error("annotation not found: {0}")]
    NotFound(AnnotationId),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory annotation collection for one editing session
///
/// Owned exclusively by the active session; never shared across sessions.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    /// Ordered collection; position is layering order
    annotations: Vec<Annotation>,

    /// At most one annotation is selected at any time
    selected: Option<AnnotationId>,

    /// Bumped on every bulk clear so that in-flight asynchronous work
    /// resolving against an earlier session can be detected as stale
    generation: u64,
}

impl AnnotationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation to the ordered collection
    pub fn add(&mut self, annotation: Annotation) -> StoreResult<()> {
        let id = annotation.id();
        if self.annotations.iter().any(|a| a.id() == id) {
            return Err(StoreError::DuplicateId(id));
        }
        self.annotations.push(annotation);
        Ok(())
    }

    /// Merge a partial update into the annotation matching `id`
    ///
    /// Fields absent from the update are untouched; the id and variant are
    /// not expressible in [`AnnotationUpdate`] and therefore cannot change.
    pub fn update(&mut self, id: AnnotationId, update: &AnnotationUpdate) -> StoreResult<()> {
        let annotation = self
            .annotations
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(StoreError::NotFound(id))?;

        annotation.apply_update(update);
        Ok(())
    }

    /// Remove an annotation by id
    ///
    /// Clears the selection if the removed entity was selected. No-op
    /// (returns `None`) if the id is absent.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id() == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.annotations.remove(index))
    }

    /// Empty the collection and clear the selection
    ///
    /// Advances the store generation; any upload still in flight against the
    /// previous contents will resolve stale and be discarded.
    pub fn clear_all(&mut self) {
        self.annotations.clear();
        self.selected = None;
        self.generation += 1;
    }

    /// Set the selection pointer
    ///
    /// Selecting an id that is not present clears the selection instead of
    /// failing.
    pub fn select(&mut self, id: AnnotationId) {
        if self.annotations.iter().any(|a| a.id() == id) {
            self.selected = Some(id);
        } else {
            self.selected = None;
        }
    }

    /// Clear the selection pointer
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected annotation id, if any
    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    /// Get an annotation by id
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    /// Read-only view of the collection in insertion order
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of annotations in the store
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Monotonic counter identifying the current session contents
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store = AnnotationStore::new();
        let annotation = factory::checkbox(0.0, 0.0, 0, false);
        let duplicate = annotation.clone();

        store.add(annotation).expect("first add should succeed");
        assert_eq!(
            store.add(duplicate.clone()),
            Err(StoreError::DuplicateId(duplicate.id()))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_stay_unique_across_mutation_sequences() {
        let mut store = AnnotationStore::new();
        for i in 0..8 {
            store
                .add(factory::text_field(i as f32, 0.0, 0))
                .expect("add should succeed");
        }
        let victim = store.annotations()[3].id();
        store.remove(victim);
        store
            .add(factory::checkbox(0.0, 0.0, 1, true))
            .expect("add should succeed");

        let mut ids: Vec<_> = store.annotations().iter().map(|a| a.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn removing_selected_annotation_clears_selection() {
        let mut store = AnnotationStore::new();
        let annotation = factory::text_field(0.0, 0.0, 0);
        let id = annotation.id();
        store.add(annotation).expect("add should succeed");

        store.select(id);
        assert_eq!(store.selected(), Some(id));

        store.remove(id);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn removing_other_annotation_keeps_selection() {
        let mut store = AnnotationStore::new();
        let kept = factory::text_field(0.0, 0.0, 0);
        let removed = factory::checkbox(5.0, 5.0, 0, false);
        let kept_id = kept.id();
        let removed_id = removed.id();
        store.add(kept).expect("add should succeed");
        store.add(removed).expect("add should succeed");

        store.select(kept_id);
        store.remove(removed_id);
        assert_eq!(store.selected(), Some(kept_id));
    }

    #[test]
    fn selecting_unknown_id_clears_selection() {
        let mut store = AnnotationStore::new();
        let annotation = factory::text_field(0.0, 0.0, 0);
        let id = annotation.id();
        store.add(annotation).expect("add should succeed");
        store.select(id);

        store.select(AnnotationId::new_v4());
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn clear_all_empties_store_and_selection() {
        let mut store = AnnotationStore::new();
        let annotation = factory::checkbox(0.0, 0.0, 0, true);
        let id = annotation.id();
        store.add(annotation).expect("add should succeed");
        store.select(id);

        store.clear_all();

        assert!(store.is_empty());
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn clear_all_advances_generation() {
        let mut store = AnnotationStore::new();
        let before = store.generation();
        store.clear_all();
        assert_eq!(store.generation(), before + 1);
    }

    #[test]
    fn update_of_missing_id_is_reported() {
        let mut store = AnnotationStore::new();
        let id = AnnotationId::new_v4();
        assert_eq!(
            store.update(id, &AnnotationUpdate::default()),
            Err(StoreError::NotFound(id))
        );
    }

    #[test]
    fn insertion_order_survives_updates() {
        let mut store = AnnotationStore::new();
        let a = factory::text_field(0.0, 0.0, 0);
        let b = factory::checkbox(0.0, 0.0, 0, false);
        let c = factory::text_field(0.0, 0.0, 1);
        let ids = [a.id(), b.id(), c.id()];
        store.add(a).expect("add should succeed");
        store.add(b).expect("add should succeed");
        store.add(c).expect("add should succeed");

        store
            .update(
                ids[1],
                &AnnotationUpdate {
                    x: Some(99.0),
                    ..Default::default()
                },
            )
            .expect("update should succeed");
        store
            .update(
                ids[0],
                &AnnotationUpdate {
                    page: Some(4),
                    ..Default::default()
                },
            )
            .expect("update should succeed");

        let listed: Vec<_> = store.annotations().iter().map(|a| a.id()).collect();
        assert_eq!(listed, ids);
    }
}
