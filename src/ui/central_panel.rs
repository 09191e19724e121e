//! Central panel: paints the map and translates egui pointer and keyboard
//! input into [`MapEvent`]s for the measuring controller.

use std::sync::Arc;

use eframe::egui::{self, Color32, Context, Pos2, Sense};
use parking_lot::RwLock;

use crate::editor::{Key, MapEvent, MeasureController, Modifiers};
use crate::ui::map_surface::{cursor_icon, EguiSurface};

pub type SharedController = Arc<RwLock<MeasureController<EguiSurface>>>;

pub struct CentralPanel {
    controller: SharedController,
    /// Last pointer position forwarded, to send moves only when it changes.
    last_pointer: Option<Pos2>,
}

impl CentralPanel {
    pub fn new(controller: SharedController) -> Self {
        Self {
            controller,
            last_pointer: None,
        }
    }

    pub fn update(&mut self, ctx: &Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_rgb(24, 32, 40)))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let response = ui.interact(rect, ui.id().with("map"), Sense::click_and_drag());

                let shared = Arc::clone(&self.controller);
                let mut controller = shared.write();
                controller.surface_mut().center_once(rect);

                // --- Zoom and pan ---
                let scroll = ui.input().scroll_delta.y;
                if response.hovered() && scroll.abs() > 0.0 {
                    if let Some(pointer) = ui.input().pointer.hover_pos() {
                        controller
                            .surface_mut()
                            .zoom_at(pointer, 1.0 + scroll * 0.002);
                    }
                }
                if response.dragged_by(egui::PointerButton::Primary)
                    || response.dragged_by(egui::PointerButton::Middle)
                {
                    controller.surface_mut().pan_by(response.drag_delta());
                }

                // --- Input forwarding ---
                for event in self.collect_events(ui, &response, &controller) {
                    controller.handle_event(event);
                }

                // --- Drawing ---
                let painter = ui.painter_at(rect);
                let surface = controller.surface();
                surface.paint_graticule(&painter, rect);
                surface.paint(&painter);
                if response.hovered() {
                    ui.output().cursor_icon = cursor_icon(surface);
                }
            });
    }

    fn collect_events(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        controller: &MeasureController<EguiSurface>,
    ) -> Vec<MapEvent> {
        let surface = controller.surface();
        let input = ui.input();
        let mut events = Vec::new();

        if input.key_pressed(egui::Key::Escape) {
            events.push(MapEvent::Key(Key::Escape));
        }

        let Some(pointer) = input.pointer.interact_pos() else {
            self.last_pointer = None;
            return events;
        };
        let at = surface.to_coordinate(pointer);

        if response.hovered() && self.last_pointer != Some(pointer) {
            events.push(MapEvent::PointerMove { at });
            self.last_pointer = Some(pointer);
        }
        if response.hovered() && input.pointer.button_pressed(egui::PointerButton::Primary) {
            events.push(MapEvent::PointerDown {
                at,
                target: surface.hit_test(pointer),
            });
        }
        if input.pointer.primary_released() {
            events.push(MapEvent::PointerUp { at });
        }
        if response.clicked() {
            events.push(MapEvent::Click {
                at,
                target: surface.hit_test(pointer),
                modifiers: Modifiers {
                    ctrl: input.modifiers.ctrl || input.modifiers.command,
                    shift: input.modifiers.shift,
                    alt: input.modifiers.alt,
                },
            });
        }
        events
    }
}
