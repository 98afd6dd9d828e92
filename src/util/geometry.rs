// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module derives rectangle geometry from pointer positions and
//! transform scale factors, and maps between screen pixels and canvas
//! coordinates. Everything here is pure.

use crate::models::annotation::{Annotation, Point};

/// Minimum width of a rectangle after a resize.
pub const MIN_WIDTH: f64 = 5.0;

/// Size of the drawing canvas in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Placement of the canvas on screen: top-left offset and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasView {
    pub origin: Point,
    pub scale: f64,
}

impl CanvasView {
    /// Fit a canvas into an available screen area, preserving aspect ratio
    /// and centering it.
    pub fn fit(canvas: CanvasSize, area_min: Point, area_width: f64, area_height: f64) -> Self {
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            return Self {
                origin: area_min,
                scale: 1.0,
            };
        }

        let scale = (area_width / canvas.width).min(area_height / canvas.height);
        let x_offset = (area_width - canvas.width * scale) / 2.0;
        let y_offset = (area_height - canvas.height * scale) / 2.0;

        Self {
            origin: Point::new(area_min.x + x_offset, area_min.y + y_offset),
            scale,
        }
    }
}

/// Build a draft rectangle spanning from the anchor to the pointer.
///
/// Extents are not normalized: dragging up or left from the anchor yields
/// negative width or height.
pub fn draft_from_points(anchor: Point, pointer: Point, id: &str) -> Annotation {
    Annotation {
        id: id.to_string(),
        x: anchor.x,
        y: anchor.y,
        width: pointer.x - anchor.x,
        height: pointer.y - anchor.y,
    }
}

/// Finalize a resize from the pre-transform rectangle and the transform
/// node's position and scale factors.
///
/// Width is floored at [`MIN_WIDTH`]; height passes through unclamped.
/// The caller must reset the node's scale factors to 1 afterwards.
pub fn resize(previous: &Annotation, origin: Point, scale_x: f64, scale_y: f64) -> Annotation {
    Annotation {
        id: previous.id.clone(),
        x: origin.x,
        y: origin.y,
        width: (previous.width * scale_x).max(MIN_WIDTH),
        height: previous.height * scale_y,
    }
}

/// Convert screen pixel coordinates to canvas coordinates.
pub fn screen_to_canvas(pixel_x: f64, pixel_y: f64, view: &CanvasView) -> Point {
    Point {
        x: (pixel_x - view.origin.x) / view.scale,
        y: (pixel_y - view.origin.y) / view.scale,
    }
}

/// Convert canvas coordinates to screen pixel coordinates.
pub fn canvas_to_screen(point: &Point, view: &CanvasView) -> (f64, f64) {
    (
        view.origin.x + point.x * view.scale,
        view.origin.y + point.y * view.scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_from_points() {
        let draft = draft_from_points(Point::new(10.0, 20.0), Point::new(40.0, 25.0), "d");
        assert_eq!(draft, Annotation::new("d", 10.0, 20.0, 30.0, 5.0));
    }

    #[test]
    fn test_draft_keeps_negative_extents() {
        let draft = draft_from_points(Point::new(10.0, 20.0), Point::new(4.0, 2.0), "d");
        assert_eq!(draft.width, -6.0);
        assert_eq!(draft.height, -18.0);

        let empty = draft_from_points(Point::new(3.0, 3.0), Point::new(3.0, 3.0), "d");
        assert_eq!(empty.width, 0.0);
        assert_eq!(empty.height, 0.0);
    }

    #[test]
    fn test_resize_scales_and_moves() {
        let prev = Annotation::new("r", 0.0, 0.0, 100.0, 50.0);
        let out = resize(&prev, Point::new(7.0, 8.0), 1.5, 0.5);
        assert_eq!(out, Annotation::new("r", 7.0, 8.0, 150.0, 25.0));
    }

    #[test]
    fn test_resize_clamps_width_only() {
        let prev = Annotation::new("r", 0.0, 0.0, 100.0, 50.0);

        let out = resize(&prev, Point::new(0.0, 0.0), 0.01, 0.01);
        assert_eq!(out.width, MIN_WIDTH);
        assert_eq!(out.height, 0.5);

        let out = resize(&prev, Point::new(0.0, 0.0), -1.0, -1.0);
        assert_eq!(out.width, MIN_WIDTH);
        assert_eq!(out.height, -50.0);

        let out = resize(&prev, Point::new(0.0, 0.0), 1.0, 0.0);
        assert_eq!(out.height, 0.0);
    }

    #[test]
    fn test_screen_canvas_roundtrip() {
        let view = CanvasView {
            origin: Point::new(120.0, 40.0),
            scale: 0.5,
        };
        let pixel_x = 960.0;
        let pixel_y = 540.0;

        let canvas = screen_to_canvas(pixel_x, pixel_y, &view);
        let (screen_x, screen_y) = canvas_to_screen(&canvas, &view);

        assert!((screen_x - pixel_x).abs() < 0.0001);
        assert!((screen_y - pixel_y).abs() < 0.0001);
    }

    #[test]
    fn test_fit_centers_canvas() {
        let canvas = CanvasSize {
            width: 200.0,
            height: 100.0,
        };
        let view = CanvasView::fit(canvas, Point::new(0.0, 0.0), 400.0, 400.0);
        assert_eq!(view.scale, 2.0);
        assert_eq!(view.origin, Point::new(0.0, 100.0));

        // Top-left corner of the canvas maps to the view origin
        let tl = screen_to_canvas(0.0, 100.0, &view);
        assert_eq!(tl, Point::new(0.0, 0.0));
    }
}
