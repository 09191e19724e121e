// src/ui/mod.rs
pub mod central_panel;
pub mod main_window;
pub mod map_surface;
pub mod menu;
pub mod side_panel;
pub mod status_bar;

pub use main_window::{run_main_window, MeasureApp};
pub use map_surface::EguiSurface;
