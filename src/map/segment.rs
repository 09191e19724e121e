// src/map/segment.rs

use crate::map::Coordinate;
use crate::utils::geometry::{
    final_bearing, haversine_distance, initial_bearing, intermediate_point, interpolate_arc,
};

/// Default number of interpolated points per arc (99 sub-segments).
pub const DEFAULT_ARC_POINTS: usize = 100;

/// Direction marker drawn halfway along a segment.
///
/// Both the anchor and the rotation come from the geographic arc, so the
/// arrow points the right way at any zoom level or projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowMarker {
    /// True geodesic midpoint of the segment.
    pub position: Coordinate,
    /// Compass bearing in degrees, `[0, 360)`.
    pub rotation: f64,
}

/// The geodesic connection between two consecutive vertices.
///
/// A segment is derived data: it is rebuilt from its endpoints whenever either
/// of them moves, and its first and last arc points always coincide with
/// those endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    arc: Vec<Coordinate>,
    arc_points: usize,
    length: f64,
    outbound_bearing: f64,
    inbound_bearing: f64,
    arrow: ArrowMarker,
}

impl Segment {
    pub fn new(start: Coordinate, end: Coordinate, arc_points: usize) -> Self {
        let mut segment = Segment {
            arc: Vec::new(),
            arc_points,
            length: 0.0,
            outbound_bearing: 0.0,
            inbound_bearing: 0.0,
            arrow: ArrowMarker {
                position: start,
                rotation: 0.0,
            },
        };
        segment.recompute(start, end);
        segment
    }

    /// Rebuilds the arc, length, bearings and arrow from the given endpoints.
    /// Idempotent.
    pub fn recompute(&mut self, start: Coordinate, end: Coordinate) {
        self.arc = interpolate_arc(&start, &end, self.arc_points);
        self.length = haversine_distance(&start, &end);
        self.outbound_bearing = initial_bearing(&start, &end);
        self.inbound_bearing = final_bearing(&start, &end);
        self.arrow = self.place_arrow(&start, &end);
    }

    /// The arrow sits on the true midpoint of the arc; its rotation is the
    /// bearing between the two samples straddling the middle of the arc.
    fn place_arrow(&self, start: &Coordinate, end: &Coordinate) -> ArrowMarker {
        if self.arc.len() < 2 {
            return ArrowMarker {
                position: *start,
                rotation: 0.0,
            };
        }
        let mid = self.arc.len() / 2;
        let rotation = initial_bearing(&self.arc[mid - 1], &self.arc[mid]);
        ArrowMarker {
            position: intermediate_point(start, end, 0.5),
            rotation,
        }
    }

    pub fn arc(&self) -> &[Coordinate] {
        &self.arc
    }

    pub fn start(&self) -> Coordinate {
        self.arc[0]
    }

    pub fn end(&self) -> Coordinate {
        self.arc[self.arc.len() - 1]
    }

    /// Great-circle length in metres.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Bearing leaving the start vertex.
    pub fn outbound_bearing(&self) -> f64 {
        self.outbound_bearing
    }

    /// Bearing arriving at the end vertex.
    pub fn inbound_bearing(&self) -> f64 {
        self.inbound_bearing
    }

    pub fn arrow(&self) -> &ArrowMarker {
        &self.arrow
    }

    pub fn is_degenerate(&self) -> bool {
        self.arc.len() < 2
    }
}
