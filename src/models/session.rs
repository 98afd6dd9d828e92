// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation interaction state machine.
//!
//! [`Session`] is the single explicit state record for a labeling session:
//! the image sequence, the current image, the annotation store, the draft
//! being drawn and the current selection. Each input event has one update
//! function; the render adapter feeds events in through [`Session::handle`]
//! and redraws from [`Session::shapes`].
//!
//! Drawing and selection are mutually exclusive by gating: while an id is
//! selected, draw gestures are ignored entirely.

use super::annotation::{new_annotation_id, Annotation, Point};
use super::store::{AnnotationStore, CommittedMap, ExportDocument};
use crate::util::geometry;
use serde::Deserialize;

/// Key code for Backspace.
pub const KEY_BACKSPACE: u32 = 8;
/// Key code for Delete.
pub const KEY_DELETE: u32 = 46;

/// Whether a key code triggers deletion of the selected annotation.
pub fn is_delete_key(code: u32) -> bool {
    code == KEY_BACKSPACE || code == KEY_DELETE
}

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The image / empty canvas area.
    Background,
    /// An annotation with the given id.
    Shape(String),
}

/// Canvas and keyboard input.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PointerDown { pos: Point, target: Target },
    PointerMove { pos: Point },
    PointerUp,
    PointerEnter(Target),
    PointerLeave(Target),
    /// A shape was dragged to a new origin.
    DragEnd {
        index: usize,
        id: String,
        x: f64,
        y: f64,
    },
    /// A shape's transform handles were released.
    TransformEnd {
        index: usize,
        id: String,
        x: f64,
        y: f64,
        scale_x: f64,
        scale_y: f64,
    },
    KeyDown(u32),
}

/// Instruction back to the render adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Reset the transform node's scale factors to 1.
    ResetScale,
}

/// Cursor the render adapter should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Crosshair,
    Move,
}

/// Whether selection is cleared on navigation and on delete.
///
/// Both default to `false`: the selected id survives image changes and
/// deletion, and keeps gating new draws until an explicit deselect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    pub clear_on_navigate: bool,
    pub clear_on_delete: bool,
}

/// A rectangle under construction.
#[derive(Debug, Clone, PartialEq)]
struct Draft {
    anchor: Point,
    annotation: Annotation,
}

/// One entry of the render list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeView<'a> {
    pub annotation: &'a Annotation,
    /// Position in the working set; `None` for the draft.
    pub index: Option<usize>,
    pub selected: bool,
}

impl ShapeView<'_> {
    pub fn is_draft(&self) -> bool {
        self.index.is_none()
    }
}

/// Labeling session state.
#[derive(Debug, Clone)]
pub struct Session {
    images: Vec<String>,
    current_index: usize,
    store: AnnotationStore,
    draft: Option<Draft>,
    selected_id: Option<String>,
    cursor: CursorHint,
    policy: SelectionPolicy,
}

impl Session {
    /// Create a session over a fixed image sequence, starting at the first image.
    pub fn new(images: Vec<String>, policy: SelectionPolicy) -> Self {
        Self {
            images,
            current_index: 0,
            store: AnnotationStore::new(),
            draft: None,
            selected_id: None,
            cursor: CursorHint::default(),
            policy,
        }
    }

    /// Seed the committed store.
    ///
    /// The working set is reloaded only when the seed has an entry for the
    /// current image; otherwise unsaved edits on screen are kept.
    pub fn resume(&mut self, committed: CommittedMap) {
        let reload = self
            .current_key()
            .filter(|key| committed.contains_key(*key))
            .map(str::to_string);
        self.store.seed_committed(committed);
        if let Some(key) = reload {
            let working = self.store.load_working_set(&key);
            self.store.replace_working(working);
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_key(&self) -> Option<&str> {
        self.images.get(self.current_index).map(String::as_str)
    }

    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.images.len()
    }

    pub fn working(&self) -> &[Annotation] {
        self.store.working()
    }

    pub fn draft(&self) -> Option<&Annotation> {
        self.draft.as_ref().map(|d| &d.annotation)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// Render list: working annotations in draw order, then the draft.
    pub fn shapes(&self) -> Vec<ShapeView<'_>> {
        let selected = self.selected_id.as_deref();
        let mut shapes: Vec<ShapeView<'_>> = self
            .store
            .working()
            .iter()
            .enumerate()
            .map(|(i, annotation)| ShapeView {
                annotation,
                index: Some(i),
                selected: Some(annotation.id.as_str()) == selected,
            })
            .collect();

        if let Some(draft) = &self.draft {
            shapes.push(ShapeView {
                annotation: &draft.annotation,
                index: None,
                selected: false,
            });
        }
        shapes
    }

    /// Apply one canvas or keyboard event.
    pub fn handle(&mut self, event: Event) -> Effect {
        match event {
            Event::PointerDown { pos, target } => self.pointer_down(pos, target),
            Event::PointerMove { pos } => self.pointer_move(pos),
            Event::PointerUp => self.pointer_up(),
            Event::PointerEnter(target) => self.pointer_enter(&target),
            Event::PointerLeave(target) => self.pointer_leave(&target),
            Event::DragEnd { index, id, x, y } => self.drag_end(index, &id, Point::new(x, y)),
            Event::TransformEnd {
                index,
                id,
                x,
                y,
                scale_x,
                scale_y,
            } => return self.transform_end(index, &id, Point::new(x, y), scale_x, scale_y),
            Event::KeyDown(code) => self.key_down(code),
        }
        Effect::None
    }

    fn pointer_down(&mut self, pos: Point, target: Target) {
        match target {
            Target::Shape(id) => {
                log::info!("Selected annotation {}", id);
                self.selected_id = Some(id);
            }
            Target::Background => {
                if self.selected_id.take().is_some() {
                    log::info!("Deselected annotation");
                    return;
                }
                if self.draft.is_none() {
                    let id = new_annotation_id();
                    let annotation = geometry::draft_from_points(pos, pos, &id);
                    self.draft = Some(Draft {
                        anchor: pos,
                        annotation,
                    });
                    log::debug!("Started draft at ({:.1}, {:.1})", pos.x, pos.y);
                }
            }
        }
    }

    fn pointer_move(&mut self, pos: Point) {
        if self.selected_id.is_some() {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.annotation = geometry::draft_from_points(draft.anchor, pos, &draft.annotation.id);
        }
    }

    fn pointer_up(&mut self) {
        if self.selected_id.is_some() {
            if self.draft.is_some() {
                log::debug!("Pointer up ignored while a selection is active");
            }
            return;
        }
        if let Some(draft) = self.draft.take() {
            let a = &draft.annotation;
            log::info!(
                "Added annotation {} ({:.1}, {:.1}, {:.1}x{:.1})",
                a.id,
                a.x,
                a.y,
                a.width,
                a.height
            );
            self.store.append_working(draft.annotation);
        }
    }

    fn pointer_enter(&mut self, target: &Target) {
        self.cursor = match target {
            Target::Background => CursorHint::Crosshair,
            Target::Shape(_) => CursorHint::Move,
        };
    }

    fn pointer_leave(&mut self, target: &Target) {
        if let Target::Shape(_) = target {
            self.cursor = CursorHint::Crosshair;
        }
    }

    /// The working entry at `index`, if its id still matches.
    fn working_at(&self, index: usize, id: &str) -> Option<&Annotation> {
        let found = self.store.working().get(index).filter(|a| a.id == id);
        if found.is_none() {
            log::debug!("Ignoring stale transform for {} at index {}", id, index);
        }
        found
    }

    fn drag_end(&mut self, index: usize, id: &str, origin: Point) {
        let Some(current) = self.working_at(index, id) else {
            return;
        };
        let moved = Annotation {
            x: origin.x,
            y: origin.y,
            ..current.clone()
        };
        self.store.mutate_working(index, moved);
        log::info!("Moved annotation {} to ({:.1}, {:.1})", id, origin.x, origin.y);
    }

    fn transform_end(
        &mut self,
        index: usize,
        id: &str,
        origin: Point,
        scale_x: f64,
        scale_y: f64,
    ) -> Effect {
        let Some(current) = self.working_at(index, id) else {
            return Effect::None;
        };
        let resized = geometry::resize(current, origin, scale_x, scale_y);
        log::info!(
            "Resized annotation {} to {:.1}x{:.1}",
            id,
            resized.width,
            resized.height
        );
        self.store.mutate_working(index, resized);
        Effect::ResetScale
    }

    fn key_down(&mut self, code: u32) {
        if !is_delete_key(code) {
            return;
        }
        let Some(id) = self.selected_id.clone() else {
            return;
        };
        if self.store.remove_working(&id) {
            log::info!("Deleted annotation {}, total: {}", id, self.store.working().len());
        }
        if self.policy.clear_on_delete {
            self.selected_id = None;
        }
    }

    /// Step to the previous image. No-op at the first image.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.navigate_to(self.current_index - 1);
        true
    }

    /// Step to the next image. No-op at the last image.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.navigate_to(self.current_index + 1);
        true
    }

    /// Uncommitted edits to the outgoing image are discarded.
    fn navigate_to(&mut self, index: usize) {
        self.draft = None;
        self.current_index = index;
        let working = self.store.load_working_set(&self.images[index]);
        self.store.replace_working(working);
        if self.policy.clear_on_navigate {
            self.selected_id = None;
        }
        log::info!(
            "Showing image {}/{}: {} ({} annotations)",
            index + 1,
            self.images.len(),
            self.images[index],
            self.store.working().len()
        );
    }

    /// Commit the working set for the current image.
    pub fn save(&mut self) {
        if let Some(key) = self.images.get(self.current_index) {
            self.store.commit(key);
            log::info!(
                "Saved {} annotations for {}",
                self.store.working().len(),
                key
            );
        }
    }

    /// The committed store, ready to serialize.
    pub fn export(&self) -> ExportDocument<'_> {
        self.store.export()
    }
}
