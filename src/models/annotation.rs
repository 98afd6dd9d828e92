// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the rectangle annotation and the canvas-space point
//! it is built from. Coordinates are canvas units; extents may be negative
//! while a rectangle is being drawn up or left from its anchor.

use serde::{Deserialize, Serialize};

/// Stable key identifying one image in the sequence (its locator).
pub type ImageKey = String;

/// A 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangular bounding box annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Annotation {
    /// Create an annotation with the given id and geometry.
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized (min, max) corners, flipping negative extents.
    pub fn bounds(&self) -> (Point, Point) {
        let x2 = self.x + self.width;
        let y2 = self.y + self.height;
        (
            Point::new(self.x.min(x2), self.y.min(y2)),
            Point::new(self.x.max(x2), self.y.max(y2)),
        )
    }

    /// Check if a point lies inside the (normalized) rectangle.
    pub fn contains(&self, point: Point) -> bool {
        let (min, max) = self.bounds();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Generate a fresh annotation identifier.
pub fn new_annotation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
