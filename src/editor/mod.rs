// src/editor/mod.rs
//! # Measuring Editor
//!
//! Glue between map input and the measurement model. A host implements
//! [`MapSurface`], wraps it in a [`MeasureController`] and forwards its
//! input as [`MapEvent`]s:
//!
//! ```no_run
//! use polymeasure::config::MeasureOptions;
//! use polymeasure::editor::{MapEvent, MapSurface, MeasureController, Modifiers};
//! use polymeasure::map::Coordinate;
//!
//! fn measure<S: MapSurface>(surface: S) {
//!     let mut controller = MeasureController::new(surface, MeasureOptions::default());
//!     controller.start_measuring();
//!     controller.handle_event(MapEvent::Click {
//!         at: Coordinate::new(51.5, -0.1),
//!         target: None,
//!         modifiers: Modifiers::default(),
//!     });
//! }
//! ```

mod controller;
mod render;
mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{ControllerState, MeasureController, VertexDrag};
pub use render::Renderer;
pub use surface::{
    Drawable, DrawableId, DrawableLayer, Key, LabelKind, MapEvent, MapSurface, Modifiers,
    ScreenPoint,
};
