// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Resize handles for the selected annotation.
//!
//! A [`TransformNode`] mirrors the selected rectangle while it is being
//! moved or resized. Resizing changes only the node's origin and scale
//! factors; the new size is folded back into the annotation when the
//! gesture ends, after which the scale is reset to 1.

use crate::models::annotation::{Annotation, Point};

/// One of the eight resize handles, as fractions of the node box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub u: f64,
    pub v: f64,
}

/// Corners and edge midpoints.
pub const HANDLES: [Handle; 8] = [
    Handle { u: 0.0, v: 0.0 },
    Handle { u: 0.5, v: 0.0 },
    Handle { u: 1.0, v: 0.0 },
    Handle { u: 1.0, v: 0.5 },
    Handle { u: 1.0, v: 1.0 },
    Handle { u: 0.5, v: 1.0 },
    Handle { u: 0.0, v: 1.0 },
    Handle { u: 0.0, v: 0.5 },
];

/// Position and scale of the shape under transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl TransformNode {
    /// Attach a node to an annotation with unit scale.
    pub fn attach(annotation: &Annotation) -> Self {
        Self {
            id: annotation.id.clone(),
            x: annotation.x,
            y: annotation.y,
            width: annotation.width,
            height: annotation.height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Follow the annotation's committed geometry, keeping the current scale.
    pub fn sync(&mut self, annotation: &Annotation) {
        self.id.clone_from(&annotation.id);
        self.x = annotation.x;
        self.y = annotation.y;
        self.width = annotation.width;
        self.height = annotation.height;
    }

    pub fn reset_scale(&mut self) {
        self.scale_x = 1.0;
        self.scale_y = 1.0;
    }

    /// The rectangle as currently displayed.
    pub fn displayed(&self) -> Annotation {
        Annotation::new(
            self.id.clone(),
            self.x,
            self.y,
            self.width * self.scale_x,
            self.height * self.scale_y,
        )
    }

    /// Canvas position of a handle.
    pub fn handle_position(&self, handle: Handle) -> Point {
        Point::new(
            self.x + handle.u * self.width * self.scale_x,
            self.y + handle.v * self.height * self.scale_y,
        )
    }

    /// The handle within `radius` of `point`, if any.
    pub fn hit_handle(&self, point: Point, radius: f64) -> Option<Handle> {
        HANDLES.iter().copied().find(|&h| {
            let p = self.handle_position(h);
            let dx = p.x - point.x;
            let dy = p.y - point.y;
            (dx * dx + dy * dy).sqrt() <= radius
        })
    }

    /// Move the node's origin by a drag delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Drag a handle to `pointer`, keeping the opposite edge fixed.
    pub fn drag_handle(&mut self, handle: Handle, pointer: Point) {
        if handle.u == 1.0 && self.width != 0.0 {
            self.scale_x = (pointer.x - self.x) / self.width;
        } else if handle.u == 0.0 && self.width != 0.0 {
            let right = self.x + self.width * self.scale_x;
            self.x = pointer.x;
            self.scale_x = (right - pointer.x) / self.width;
        }

        if handle.v == 1.0 && self.height != 0.0 {
            self.scale_y = (pointer.y - self.y) / self.height;
        } else if handle.v == 0.0 && self.height != 0.0 {
            let bottom = self.y + self.height * self.scale_y;
            self.y = pointer.y;
            self.scale_y = (bottom - pointer.y) / self.height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> TransformNode {
        TransformNode::attach(&Annotation::new("n", 10.0, 10.0, 100.0, 50.0))
    }

    #[test]
    fn test_bottom_right_scales() {
        let mut n = node();
        n.drag_handle(Handle { u: 1.0, v: 1.0 }, Point::new(210.0, 35.0));
        assert_eq!((n.x, n.y), (10.0, 10.0));
        assert_eq!(n.scale_x, 2.0);
        assert_eq!(n.scale_y, 0.5);
        assert_eq!(n.displayed().width, 200.0);
    }

    #[test]
    fn test_top_left_moves_origin_and_keeps_far_edges() {
        let mut n = node();
        n.drag_handle(Handle { u: 0.0, v: 0.0 }, Point::new(60.0, 20.0));
        assert_eq!((n.x, n.y), (60.0, 20.0));
        assert_eq!(n.scale_x, 0.5);
        assert_eq!(n.scale_y, 0.8);
        let shown = n.displayed();
        assert_eq!(shown.x + shown.width, 110.0);
        assert_eq!(shown.y + shown.height, 60.0);
    }

    #[test]
    fn test_edge_handle_scales_one_axis() {
        let mut n = node();
        n.drag_handle(Handle { u: 0.5, v: 1.0 }, Point::new(500.0, 110.0));
        assert_eq!(n.scale_x, 1.0);
        assert_eq!(n.scale_y, 2.0);
    }

    #[test]
    fn test_zero_extent_keeps_scale() {
        let mut n = TransformNode::attach(&Annotation::new("z", 0.0, 0.0, 0.0, 0.0));
        n.drag_handle(Handle { u: 1.0, v: 1.0 }, Point::new(30.0, 30.0));
        assert_eq!((n.scale_x, n.scale_y), (1.0, 1.0));
    }

    #[test]
    fn test_hit_handle_and_reset() {
        let mut n = node();
        assert_eq!(n.hit_handle(Point::new(111.0, 61.0), 4.0), Some(HANDLES[4]));
        assert_eq!(n.hit_handle(Point::new(60.0, 35.0), 4.0), None);

        n.drag_handle(HANDLES[4], Point::new(210.0, 110.0));
        n.reset_scale();
        assert_eq!((n.scale_x, n.scale_y), (1.0, 1.0));
    }
}
