// src/ui/side_panel.rs

use eframe::egui::{self, Context, Ui};

use crate::document::Path;
use crate::ui::central_panel::SharedController;
use crate::utils::{format_distance, MeasurementUnit};

/// Left panel with the measuring toggle and a list of measured paths.
pub struct SidePanel {
    controller: SharedController,
    pub show_side_panel: bool,
}

impl SidePanel {
    pub fn new(controller: SharedController) -> Self {
        Self {
            controller,
            show_side_panel: true,
        }
    }

    pub fn update(&mut self, ctx: &Context) {
        if !self.show_side_panel {
            return;
        }

        egui::SidePanel::left("measure_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.show_controls(ui);
                ui.separator();
                self.show_paths(ui);
            });
    }

    fn show_controls(&self, ui: &mut Ui) {
        ui.heading("Measure");
        let mut controller = self.controller.write();

        let mut measuring = controller.is_measuring();
        if ui.toggle_value(&mut measuring, "Measuring").clicked() {
            controller.toggle_measuring();
        }
        if ui.button("Clear all").clicked() {
            controller.clear_all();
        }

        let current = controller.paths().unit();
        ui.horizontal(|ui| {
            for &unit in MeasurementUnit::all() {
                if ui.selectable_label(current == unit, unit.name()).clicked() {
                    controller.set_unit(unit);
                }
            }
        });

        ui.small("Click to add points, click the last point or press Esc to finish.");
        ui.small("Ctrl-click the end of a finished line to continue it.");
    }

    fn show_paths(&self, ui: &mut Ui) {
        ui.heading("Measurements");
        let controller = self.controller.read();
        let paths = controller.paths();

        if paths.is_empty() {
            ui.label("Nothing measured yet.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for path in paths.paths() {
                ui.label(path_summary(path, paths.unit()));
            }
        });
    }
}

fn path_summary(path: &Path, unit: MeasurementUnit) -> String {
    let state = if path.is_building() { " (drawing)" } else { "" };
    format!(
        "#{}: {} points, {}{}",
        path.id() + 1,
        path.len(),
        format_distance(path.total_distance(), unit),
        state
    )
}
