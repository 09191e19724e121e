// src/ui/menu.rs

use eframe::egui::{self, Context};

use crate::ui::central_panel::SharedController;
use crate::utils::MeasurementUnit;

pub struct MenuBar {
    controller: SharedController,
}

impl MenuBar {
    pub fn new(controller: SharedController) -> Self {
        Self { controller }
    }

    /// Draws the menu. Returns `true` when the user asked to quit.
    pub fn update(&mut self, ctx: &Context, show_side_panel: &mut bool) -> bool {
        let mut quit = false;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Measure", |ui| {
                    let mut controller = self.controller.write();
                    let label = if controller.is_measuring() {
                        "Stop measuring"
                    } else {
                        "Start measuring"
                    };
                    if ui.button(label).clicked() {
                        controller.toggle_measuring();
                        ui.close_menu();
                    }
                    if ui.button("Clear all").clicked() {
                        controller.clear_all();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        quit = true;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Units", |ui| {
                    let mut controller = self.controller.write();
                    let current = controller.paths().unit();
                    for &unit in MeasurementUnit::all() {
                        if ui.radio(current == unit, unit.name()).clicked() {
                            controller.set_unit(unit);
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut controller = self.controller.write();
                    let mut bearings = controller.options().show_bearings;
                    if ui.checkbox(&mut bearings, "Bearings").clicked() {
                        controller.set_show_bearings(bearings);
                    }
                    let mut arrows = controller.options().show_arrows;
                    if ui.checkbox(&mut arrows, "Direction arrows").clicked() {
                        controller.set_show_arrows(arrows);
                    }
                    ui.checkbox(show_side_panel, "Measurements panel");
                });
            });
        });
        quit
    }
}
