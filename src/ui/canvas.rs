// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and annotation.
//!
//! This module renders the current image, the annotation shapes and the
//! resize handles of the selected shape, and turns raw egui pointer input
//! into session [`Event`]s. It keeps only presentation state: the gesture
//! in progress and the transform node of the selected shape.

use super::transformer::{Handle, TransformNode, HANDLES};
use crate::models::annotation::{Annotation, Point};
use crate::models::session::{Effect, Event, Session, ShapeView, Target};
use crate::util::geometry::{canvas_to_screen, screen_to_canvas, CanvasSize, CanvasView};

/// Handle grab radius in screen pixels.
const HANDLE_RADIUS: f32 = 6.0;

/// Pointer gesture in progress on the canvas.
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Draw,
    Move {
        index: usize,
        id: String,
        last: Point,
        moved: bool,
    },
    Resize {
        index: usize,
        id: String,
        handle: Handle,
    },
}

/// Presentation state carried between frames.
#[derive(Debug)]
pub struct CanvasState {
    gesture: Gesture,
    node: Option<TransformNode>,
    hovered: Option<Target>,
    last_pos: Option<Point>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            node: None,
            hovered: None,
            last_pos: None,
        }
    }
}

impl CanvasState {
    /// Apply an instruction returned by the session.
    pub fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ResetScale => {
                if let Some(node) = self.node.as_mut() {
                    node.reset_scale();
                }
            }
            Effect::None => {}
        }
    }

    /// Whether the pointer is currently over the canvas.
    pub fn is_hovered(&self) -> bool {
        self.hovered.is_some()
    }

    /// Forget gestures and hover state, e.g. after the image changed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keep the transform node attached to the selected annotation.
    fn sync_node(&mut self, session: &Session) {
        let selected = session
            .selected_id()
            .and_then(|id| session.working().iter().find(|a| a.id == id));

        let Some(annotation) = selected else {
            self.node = None;
            return;
        };

        let attached = self.node.as_ref().is_some_and(|n| n.id == annotation.id);
        if !attached {
            self.node = Some(TransformNode::attach(annotation));
        } else if self.gesture == Gesture::Idle {
            if let Some(node) = self.node.as_mut() {
                node.sync(annotation);
            }
        }
    }
}

/// Topmost working annotation under `pos`.
fn hit_test<'a>(shapes: &[ShapeView<'a>], pos: Point) -> Option<(usize, &'a Annotation)> {
    shapes.iter().rev().find_map(|shape| match shape.index {
        Some(index) if shape.annotation.contains(pos) => Some((index, shape.annotation)),
        _ => None,
    })
}

/// Display the canvas and translate pointer input into session events.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    state: &mut CanvasState,
    image_texture: Option<&egui::TextureHandle>,
    canvas_size: Option<CanvasSize>,
) -> Vec<Event> {
    let mut events = Vec::new();

    let Some(size) = canvas_size else {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.spinner();
                ui.label(
                    egui::RichText::new("Loading image...").color(egui::Color32::from_gray(200)),
                );
            });
        });
        return events;
    };

    let available = ui.available_rect_before_wrap();
    let view = CanvasView::fit(
        size,
        Point::new(available.min.x as f64, available.min.y as f64),
        available.width() as f64,
        available.height() as f64,
    );
    let to_screen = |p: Point| {
        let (x, y) = canvas_to_screen(&p, &view);
        egui::pos2(x as f32, y as f32)
    };
    let canvas_rect = egui::Rect::from_min_max(
        to_screen(Point::new(0.0, 0.0)),
        to_screen(Point::new(size.width, size.height)),
    );

    let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());
    state.sync_node(session);
    let shapes = session.shapes();

    // Pointer input
    let (pressed, released, latest) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.latest_pos(),
        )
    });
    let pos = latest.map(|p| screen_to_canvas(p.x as f64, p.y as f64, &view));
    let inside = response.hovered() && latest.is_some_and(|p| canvas_rect.contains(p));

    let hovered = match pos {
        Some(p) if inside => Some(match hit_test(&shapes, p) {
            Some((_, annotation)) => Target::Shape(annotation.id.clone()),
            None => Target::Background,
        }),
        _ => None,
    };
    if hovered != state.hovered {
        if let Some(old @ Target::Shape(_)) = state.hovered.take() {
            events.push(Event::PointerLeave(old));
        }
        if let Some(target) = &hovered {
            events.push(Event::PointerEnter(target.clone()));
        }
        state.hovered = hovered;
    }

    if let Some(p) = pos.filter(|_| pressed && inside) {
        let handle_radius = HANDLE_RADIUS as f64 / view.scale;
        let on_handle = state
            .node
            .as_ref()
            .and_then(|node| node.hit_handle(p, handle_radius).map(|h| (node.id.clone(), h)));

        if let Some((id, handle)) = on_handle {
            if let Some(index) = session.working().iter().position(|a| a.id == id) {
                state.gesture = Gesture::Resize { index, id, handle };
            }
        } else if let Some((index, annotation)) = hit_test(&shapes, p) {
            events.push(Event::PointerDown {
                pos: p,
                target: Target::Shape(annotation.id.clone()),
            });
            state.node = Some(TransformNode::attach(annotation));
            state.gesture = Gesture::Move {
                index,
                id: annotation.id.clone(),
                last: p,
                moved: false,
            };
        } else {
            events.push(Event::PointerDown {
                pos: p,
                target: Target::Background,
            });
            state.gesture = Gesture::Draw;
        }
    }

    if let Some(p) = pos {
        if state.last_pos != Some(p) {
            if inside || state.gesture == Gesture::Draw {
                events.push(Event::PointerMove { pos: p });
            }
            match (&mut state.gesture, state.node.as_mut()) {
                (Gesture::Move { last, moved, .. }, Some(node)) if *last != p => {
                    node.translate(p.x - last.x, p.y - last.y);
                    *last = p;
                    *moved = true;
                }
                (Gesture::Resize { handle, .. }, Some(node)) => node.drag_handle(*handle, p),
                _ => {}
            }
        }
        state.last_pos = Some(p);
    }

    if released {
        let gesture = std::mem::replace(&mut state.gesture, Gesture::Idle);
        if inside || gesture != Gesture::Idle {
            events.push(Event::PointerUp);
        }
        match (gesture, state.node.as_ref()) {
            (Gesture::Move { index, id, moved: true, .. }, Some(node)) => {
                events.push(Event::DragEnd {
                    index,
                    id,
                    x: node.x,
                    y: node.y,
                });
            }
            (Gesture::Resize { index, id, .. }, Some(node)) => {
                events.push(Event::TransformEnd {
                    index,
                    id,
                    x: node.x,
                    y: node.y,
                    scale_x: node.scale_x,
                    scale_y: node.scale_y,
                });
            }
            _ => {}
        }
    }

    // Rendering
    let painter = ui.painter_at(canvas_rect);
    match image_texture {
        Some(texture) => painter.image(
            texture.id(),
            canvas_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        ),
        None => painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40)),
    };

    for shape in &shapes {
        let displayed = match state.node.as_ref() {
            Some(node) if shape.selected && node.id == shape.annotation.id => node.displayed(),
            _ => shape.annotation.clone(),
        };
        draw_rect(&painter, &displayed, &to_screen, shape.is_draft());
    }

    if let Some(node) = state.node.as_ref() {
        draw_handles(&painter, node, &to_screen);
    }

    events
}

/// Draw a rectangle, flipping negative extents.
fn draw_rect(
    painter: &egui::Painter,
    annotation: &Annotation,
    to_screen: &impl Fn(Point) -> egui::Pos2,
    is_draft: bool,
) {
    let (min, max) = annotation.bounds();
    let rect = egui::Rect::from_two_pos(to_screen(min), to_screen(max));
    let stroke_color = if is_draft {
        egui::Color32::LIGHT_BLUE
    } else {
        egui::Color32::BLUE
    };

    painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 128));
    painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.5, stroke_color));
}

fn draw_handles(
    painter: &egui::Painter,
    node: &TransformNode,
    to_screen: &impl Fn(Point) -> egui::Pos2,
) {
    let (min, max) = node.displayed().bounds();
    painter.rect_stroke(
        egui::Rect::from_two_pos(to_screen(min), to_screen(max)),
        0.0,
        egui::Stroke::new(1.0, egui::Color32::from_rgb(0, 161, 255)),
    );

    for handle in HANDLES {
        let center = to_screen(node.handle_position(handle));
        let rect = egui::Rect::from_center_size(center, egui::vec2(HANDLE_RADIUS, HANDLE_RADIUS) * 1.5);
        painter.rect_filled(rect, 0.0, egui::Color32::WHITE);
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, egui::Color32::from_rgb(0, 161, 255)));
    }
}
