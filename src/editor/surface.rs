// src/editor/surface.rs
//! The capabilities the measuring engine needs from its host map.
//!
//! The host owns projection, hit testing and actual drawing. The engine only
//! describes what should be on the map as [`Drawable`] records and hands them
//! to a [`DrawableLayer`]; pointer and keyboard input arrive as [`MapEvent`]s
//! with coordinates already validated.

use crate::config::{ArrowStyle, CircleStyle, LineStyle};
use crate::map::Coordinate;

/// Host-issued handle for something drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub u64);

/// Flavour of a tooltip label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// A committed vertex readout.
    Vertex,
    /// The last readout of a finished path.
    End,
    /// The readout following the pointer.
    Live,
}

/// Everything the engine ever asks the host to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Polyline {
        points: Vec<Coordinate>,
        style: LineStyle,
    },
    Circle {
        center: Coordinate,
        style: CircleStyle,
    },
    Label {
        anchor: Coordinate,
        text: String,
        kind: LabelKind,
    },
    Arrow {
        anchor: Coordinate,
        /// Compass bearing in degrees.
        rotation: f64,
        style: ArrowStyle,
    },
}

/// Create, replace and remove drawables.
pub trait DrawableLayer {
    fn add(&mut self, drawable: Drawable) -> DrawableId;
    /// Replaces the drawable behind `id`. Unknown ids are ignored.
    fn update(&mut self, id: DrawableId, drawable: Drawable);
    fn remove(&mut self, id: DrawableId);
}

/// Screen position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// The host map.
pub trait MapSurface: DrawableLayer {
    /// Enables or disables the map's own drag-to-pan.
    fn set_panning_enabled(&mut self, enabled: bool);

    /// Switches the measuring cursor (and any map gestures that would fight
    /// with clicking, like double-click zoom) on or off.
    fn set_measuring_cursor(&mut self, active: bool);

    /// Geographic to screen projection. Not needed by the engine itself,
    /// which keeps all orientation geographic.
    fn project(&self, coordinate: Coordinate) -> ScreenPoint;
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Modifier state of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Input delivered by the host. `target` is the drawable under the pointer,
/// if any, as determined by the host's hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    PointerMove {
        at: Coordinate,
    },
    PointerDown {
        at: Coordinate,
        target: Option<DrawableId>,
    },
    PointerUp {
        at: Coordinate,
    },
    Click {
        at: Coordinate,
        target: Option<DrawableId>,
        modifiers: Modifiers,
    },
    Key(Key),
}
