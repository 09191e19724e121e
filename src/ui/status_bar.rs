// src/ui/status_bar.rs

use eframe::egui::{self, Context};

use crate::ui::central_panel::SharedController;
use crate::utils::format_distance;

pub struct StatusBar {
    controller: SharedController,
}

impl StatusBar {
    pub fn new(controller: SharedController) -> Self {
        Self { controller }
    }

    pub fn update(&mut self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let controller = self.controller.read(); // Keep the read lock short.

            let coord_label = match ui.input().pointer.hover_pos() {
                Some(pos) => controller.surface().to_coordinate(pos).to_string(),
                None => String::new(),
            };

            let total_label = controller
                .paths()
                .active_path()
                .map(|path| {
                    format!(
                        "Current: {}",
                        format_distance(path.total_distance(), controller.paths().unit())
                    )
                })
                .unwrap_or_default();

            ui.horizontal(|ui| {
                ui.label(controller.state().name());
                ui.label(total_label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(coord_label);
                });
            });
        });
    }
}
