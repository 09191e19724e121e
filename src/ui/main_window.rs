//! # Main Window Module
//!
//! The demo host: an egui window with a menu bar, a measurements panel, the
//! map canvas and a status bar. All panels share one controller behind an
//! `Arc<RwLock<..>>`.

use std::error::Error;
use std::sync::Arc;

use eframe::egui;
use log::info;
use parking_lot::RwLock;

use crate::config::MeasureOptions;
use crate::editor::MeasureController;
use crate::ui::central_panel::{CentralPanel, SharedController};
use crate::ui::map_surface::EguiSurface;
use crate::ui::menu::MenuBar;
use crate::ui::side_panel::SidePanel;
use crate::ui::status_bar::StatusBar;

pub struct MeasureApp {
    menu: MenuBar,
    side_panel: SidePanel,
    central_panel: CentralPanel,
    status_bar: StatusBar,
}

impl MeasureApp {
    pub fn new(options: MeasureOptions) -> Self {
        let mut controller = MeasureController::new(EguiSurface::new(), options);
        controller.start_measuring();
        let controller: SharedController = Arc::new(RwLock::new(controller));

        Self {
            menu: MenuBar::new(Arc::clone(&controller)),
            side_panel: SidePanel::new(Arc::clone(&controller)),
            central_panel: CentralPanel::new(Arc::clone(&controller)),
            status_bar: StatusBar::new(controller),
        }
    }
}

impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if self.menu.update(ctx, &mut self.side_panel.show_side_panel) {
            frame.close();
        }
        self.status_bar.update(ctx);
        self.side_panel.update(ctx);
        self.central_panel.update(ctx);
    }
}

/// Opens the measuring window and blocks until it is closed.
pub fn run_main_window(options: MeasureOptions) -> Result<(), Box<dyn Error>> {
    let native_options = eframe::NativeOptions::default();
    info!("Opening measuring window");
    eframe::run_native(
        "polymeasure",
        native_options,
        Box::new(move |_cc| Box::new(MeasureApp::new(options))),
    );
    // run_native returns () so we simply return Ok.
    Ok(())
}
