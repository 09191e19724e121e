// src/map/mod.rs
pub mod coordinate;
pub mod segment;
pub mod vertex;

pub use coordinate::{Coordinate, COORD_EPSILON};
pub use segment::{ArrowMarker, Segment, DEFAULT_ARC_POINTS};
pub use vertex::{Vertex, VertexRole};
