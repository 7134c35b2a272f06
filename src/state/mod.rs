//! In-memory owner of native-space annotations.

use crate::adapter::LabelOwner;
use crate::collapse::IdCollapser;
use crate::geometry::{Rectangle, Rectangles};

/// Single writer for the stored rectangles. Updates replace the whole mapping.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    rectangles: Rectangles,
    selected: Option<String>,
    revision: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rectangles(rectangles: Rectangles) -> Self {
        Self {
            rectangles,
            ..Self::default()
        }
    }

    pub fn rectangles(&self) -> &Rectangles {
        &self.rectangles
    }

    pub fn rectangle(&self, id: &str) -> Option<&Rectangle> {
        self.rectangles.get(id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Number of replacements applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Short labels for every stored id, keyed by id.
    pub fn labels(&self, min_prefix_len: usize) -> Vec<(String, String)> {
        let collapser =
            IdCollapser::new(min_prefix_len).with_source(self.rectangles.keys().cloned());
        self.rectangles
            .keys()
            .map(|id| (id.clone(), collapser.collapse(id)))
            .collect()
    }

    fn drop_dangling_selection(&mut self) {
        let dangling = self
            .selected
            .as_ref()
            .is_some_and(|id| !self.rectangles.contains_key(id));
        if dangling {
            tracing::debug!(selected = ?self.selected, "clearing selection of removed rectangle");
            self.selected = None;
        }
    }
}

impl LabelOwner for AnnotationStore {
    fn on_rectangles_change(&mut self, rectangles: Rectangles) {
        self.rectangles = rectangles;
        self.revision = self.revision.saturating_add(1);
        self.drop_dangling_selection();
        tracing::debug!(
            count = self.rectangles.len(),
            revision = self.revision,
            "stored rectangles replaced"
        );
    }

    fn on_selection_change(&mut self, id: Option<String>) {
        self.selected = id;
        self.drop_dangling_selection();
    }
}
