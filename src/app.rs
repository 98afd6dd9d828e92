// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the labeling session to the UI: it loads the current
//! image in the background, forwards canvas and keyboard input to the
//! session, and runs the Previous/Next/Save/Submit commands.

use crate::config::{self, LabelerConfig};
use crate::io::media::{LoadedImage, PendingImage};
use crate::io::serialization;
use crate::models::session::{CursorHint, Event, Session, KEY_BACKSPACE, KEY_DELETE};
use crate::ui::{canvas, toolbar};
use crate::util::geometry::CanvasSize;
use std::path::{Path, PathBuf};

/// Main application state.
pub struct LabelerApp {
    /// Annotation state machine and store
    session: Session,

    /// Canvas gesture and transform state
    canvas: canvas::CanvasState,

    /// Load in flight for the current image; replaced on every image change
    pending_image: Option<PendingImage>,

    /// Texture of the current image
    image_texture: Option<egui::TextureHandle>,

    /// Canvas size reported by the last completed load
    canvas_size: Option<CanvasSize>,

    /// Canvas size used when an image cannot be loaded
    fallback_canvas: CanvasSize,

    /// Suggested export path
    output: PathBuf,

    /// Directory relative image keys are loaded from
    base_dir: PathBuf,
}

impl LabelerApp {
    /// Create the application and start loading the first image.
    pub fn new(config: LabelerConfig) -> Self {
        let [width, height] = config.fallback_canvas;
        let mut app = Self {
            session: Session::new(config.images, config.selection),
            canvas: canvas::CanvasState::default(),
            pending_image: None,
            image_texture: None,
            canvas_size: None,
            fallback_canvas: CanvasSize { width, height },
            output: config.output,
            base_dir: config.base_dir,
        };

        if let Some(path) = config.resume_from {
            app.resume_from(&path);
        }
        app.start_image_load();
        app
    }

    /// Begin loading the current image, detaching any previous load.
    fn start_image_load(&mut self) {
        self.image_texture = None;
        self.canvas_size = None;
        self.pending_image = self
            .session
            .current_key()
            .map(|key| PendingImage::spawn(key, config::image_path(&self.base_dir, key)));
    }

    fn on_image_changed(&mut self) {
        self.canvas.reset();
        self.start_image_load();
    }

    /// Check for a completed image load.
    fn poll_image(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_image.as_mut() else {
            return;
        };
        let Some(result) = pending.poll() else {
            ctx.request_repaint();
            return;
        };
        let key = pending.key().to_string();
        self.pending_image = None;

        match result {
            Ok(loaded) => self.show_image(ctx, &key, loaded),
            Err(e) => {
                log::error!("Failed to load image {}: {}", key, e);
                self.canvas_size = Some(self.fallback_canvas);
            }
        }
    }

    fn show_image(&mut self, ctx: &egui::Context, key: &str, loaded: LoadedImage) {
        let size = [loaded.width as usize, loaded.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
        let texture = ctx.load_texture(key, color_image, egui::TextureOptions::LINEAR);

        self.image_texture = Some(texture);
        self.canvas_size = Some(loaded.canvas_size());
    }

    /// Seed the committed store from a previous export.
    fn resume_from(&mut self, path: &Path) {
        match serialization::import_json(path) {
            Ok(committed) => {
                log::info!(
                    "Resumed {} images from {}",
                    committed.len(),
                    path.display()
                );
                self.session.resume(committed);
            }
            Err(e) => log::error!("Failed to import annotations: {:#}", e),
        }
    }

    /// Export the committed store to a user-chosen file.
    fn submit(&self) {
        let file_name = self
            .output
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(serialization::DEFAULT_EXPORT_NAME);
        let mut dialog = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name(file_name);
        if let Some(dir) = self.output.parent().filter(|d| !d.as_os_str().is_empty()) {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            return;
        };
        match serialization::export(&self.session.export(), &path) {
            Ok(()) => log::info!("Exported annotations to {}", path.display()),
            Err(e) => log::error!("Failed to export annotations: {:#}", e),
        }
    }

    fn status(&self) -> String {
        let mut status = format!(
            "Image {}/{}: {} | {} annotations",
            self.session.current_index() + 1,
            self.session.images().len(),
            self.session.current_key().unwrap_or_default(),
            self.session.working().len()
        );
        if let Some(draft) = self.session.draft() {
            status.push_str(&format!(" | drawing {:.0}x{:.0}", draft.width, draft.height));
        } else if self.session.selected_id().is_some() {
            status.push_str(" | selection active");
        }
        status
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Resume From Export...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Annotations", &["json"])
                            .pick_file()
                        {
                            self.resume_from(&path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Submit...").clicked() {
                        self.submit();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Command buttons
        let status = self.status();
        let action = egui::TopBottomPanel::bottom("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.session.has_previous(),
                    self.session.has_next(),
                    &status,
                )
            })
            .inner;

        match action {
            toolbar::ToolbarAction::Previous => {
                if self.session.previous() {
                    self.on_image_changed();
                }
            }
            toolbar::ToolbarAction::Next => {
                if self.session.next() {
                    self.on_image_changed();
                }
            }
            toolbar::ToolbarAction::Save => self.session.save(),
            toolbar::ToolbarAction::Submit => self.submit(),
            toolbar::ToolbarAction::None => {}
        }

        // Handle Delete/Backspace to delete the selected annotation
        if !ctx.wants_keyboard_input() {
            let (delete, backspace) = ctx.input(|i| {
                (
                    i.key_pressed(egui::Key::Delete),
                    i.key_pressed(egui::Key::Backspace),
                )
            });
            if delete {
                self.session.handle(Event::KeyDown(KEY_DELETE));
            }
            if backspace {
                self.session.handle(Event::KeyDown(KEY_BACKSPACE));
            }
        }

        // Main canvas (center)
        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(
                    ui,
                    &self.session,
                    &mut self.canvas,
                    self.image_texture.as_ref(),
                    self.canvas_size,
                )
            })
            .inner;

        for event in events {
            let effect = self.session.handle(event);
            self.canvas.apply(effect);
        }

        if self.canvas.is_hovered() {
            ctx.set_cursor_icon(match self.session.cursor() {
                CursorHint::Crosshair => egui::CursorIcon::Crosshair,
                CursorHint::Move => egui::CursorIcon::Move,
            });
        }
    }
}
