// src/map/vertex.rs
use crate::map::Coordinate;

/// A user-placed point on a measured path.
///
/// `index` and `path_id` never change once the vertex exists; dragging only
/// moves `coordinate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub coordinate: Coordinate,
    pub index: usize,
    pub path_id: usize,
}

impl Vertex {
    pub fn new(coordinate: Coordinate, index: usize, path_id: usize) -> Self {
        Vertex {
            coordinate,
            index,
            path_id,
        }
    }

    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        self.coordinate.approx_eq(coordinate)
    }
}

/// How a vertex is styled. Derived from its position and the path state,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRole {
    Start,
    Intermediate,
    End,
    /// The last vertex of a path that is still being built.
    Current,
}

impl VertexRole {
    pub fn name(&self) -> &'static str {
        match self {
            VertexRole::Start => "start",
            VertexRole::Intermediate => "intermediate",
            VertexRole::End => "end",
            VertexRole::Current => "current",
        }
    }
}
