// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image annotation store.
//!
//! The store keeps the committed annotations for every image that has been
//! saved, plus one working set for the image currently on screen. The
//! working set is never synced back implicitly; only [`AnnotationStore::commit`]
//! promotes it.

use super::annotation::{Annotation, ImageKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Committed annotations keyed by image.
pub type CommittedMap = BTreeMap<ImageKey, Vec<Annotation>>;

/// Exportable view of the committed store.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ExportDocument<'a> {
    pub images: &'a CommittedMap,
}

/// Committed and working annotation sets.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    committed: CommittedMap,
    working: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed annotations for `key`, or an empty set.
    pub fn load_working_set(&self, key: &str) -> Vec<Annotation> {
        self.committed.get(key).cloned().unwrap_or_default()
    }

    /// Replace the working set wholesale.
    pub fn replace_working(&mut self, annotations: Vec<Annotation>) {
        self.working = annotations;
    }

    /// Store the working set as the committed set for `key` (last write wins).
    pub fn commit(&mut self, key: &str) {
        self.committed.insert(key.to_string(), self.working.clone());
    }

    /// Replace one working entry by position. Returns false if out of range.
    pub fn mutate_working(&mut self, index: usize, annotation: Annotation) -> bool {
        match self.working.get_mut(index) {
            Some(slot) => {
                *slot = annotation;
                true
            }
            None => false,
        }
    }

    /// Append to the end of the working set.
    pub fn append_working(&mut self, annotation: Annotation) {
        self.working.push(annotation);
    }

    /// Remove the working entry with `id`. Returns false if absent.
    pub fn remove_working(&mut self, id: &str) -> bool {
        let before = self.working.len();
        self.working.retain(|a| a.id != id);
        self.working.len() != before
    }

    pub fn working(&self) -> &[Annotation] {
        &self.working
    }

    /// Preload committed sets, e.g. from a previous export.
    pub fn seed_committed(&mut self, entries: CommittedMap) {
        self.committed.extend(entries);
    }

    pub fn export(&self) -> ExportDocument<'_> {
        ExportDocument {
            images: &self.committed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str) -> Annotation {
        Annotation::new(id, 1.0, 2.0, 3.0, 4.0)
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = AnnotationStore::new();
        assert!(store.load_working_set("img1").is_empty());
    }

    #[test]
    fn test_commit_copies_working() {
        let mut store = AnnotationStore::new();
        store.append_working(rect("a"));
        store.commit("img1");
        store.append_working(rect("b"));

        assert_eq!(store.load_working_set("img1"), vec![rect("a")]);
        assert_eq!(store.working().len(), 2);
    }

    #[test]
    fn test_commit_last_write_wins() {
        let mut store = AnnotationStore::new();
        store.append_working(rect("a"));
        store.commit("img1");
        store.replace_working(Vec::new());
        store.commit("img1");
        assert_eq!(store.export().images["img1"], Vec::<Annotation>::new());
    }

    #[test]
    fn test_mutate_preserves_order() {
        let mut store = AnnotationStore::new();
        store.append_working(rect("a"));
        store.append_working(rect("b"));
        store.append_working(rect("c"));

        assert!(store.mutate_working(1, Annotation::new("b", 9.0, 9.0, 9.0, 9.0)));
        let ids: Vec<_> = store.working().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(store.working()[1].x, 9.0);

        assert!(!store.mutate_working(3, rect("d")));
        assert_eq!(store.working().len(), 3);
    }

    #[test]
    fn test_remove_working() {
        let mut store = AnnotationStore::new();
        store.append_working(rect("a"));
        store.append_working(rect("b"));

        assert!(!store.remove_working("zzz"));
        assert!(store.remove_working("a"));
        assert_eq!(store.working(), &[rect("b")]);
    }

    #[test]
    fn test_seed_committed() {
        let mut store = AnnotationStore::new();
        let mut seed = CommittedMap::new();
        seed.insert("img2".to_string(), vec![rect("x")]);
        store.seed_committed(seed);
        assert_eq!(store.load_working_set("img2"), vec![rect("x")]);
    }
}
