// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Navigation and save/submit buttons.

/// Button pressed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Previous,
    Next,
    Save,
    Submit,
}

/// Display the command buttons. Previous/Next are disabled at the ends of
/// the image sequence.
pub fn show(ui: &mut egui::Ui, has_previous: bool, has_next: bool, status: &str) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.add_enabled(has_previous, egui::Button::new("◀ Previous")).clicked() {
            action = ToolbarAction::Previous;
        }
        if ui.add_enabled(has_next, egui::Button::new("Next ▶")).clicked() {
            action = ToolbarAction::Next;
        }

        ui.separator();

        if ui.button("Save").clicked() {
            action = ToolbarAction::Save;
        }
        if ui.button("Submit").clicked() {
            action = ToolbarAction::Submit;
        }

        ui.separator();

        ui.label(egui::RichText::new(status).italics().weak());
    });

    action
}
