// src/document/path.rs

use crate::document::Tooltip;
use crate::error::{MeasureError, Result};
use crate::map::{Coordinate, Segment, Vertex, VertexRole};
use crate::utils::geometry::{final_bearing, haversine_distance, interpolate_arc};
use std::ops::Range;

/// Lifecycle of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// Accepting new vertices.
    Building,
    /// Closed by the user; the last vertex can resume it.
    Finalized,
}

/// What `add_vertex` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A vertex was appended at this index.
    Appended(usize),
    /// The coordinate repeated the last vertex and was ignored.
    Duplicate,
}

/// The rubber-band from the last committed vertex to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub target: Coordinate,
    pub arc: Vec<Coordinate>,
    pub distance: f64,
    pub inbound_bearing: f64,
}

/// An ordered list of vertices and the geodesic segments between them.
///
/// `segments[i]` always connects `vertices[i]` and `vertices[i + 1]`, and
/// `cumulative[i]` is the distance from vertex 0 to vertex `i` along the path.
#[derive(Debug, Clone)]
pub struct Path {
    id: usize,
    vertices: Vec<Vertex>,
    segments: Vec<Segment>,
    cumulative: Vec<f64>,
    state: PathState,
    arc_points: usize,
    preview: Option<Preview>,
}

impl Path {
    /// Starts a path at `first`, in the `Building` state.
    pub fn new(id: usize, first: Coordinate, arc_points: usize) -> Self {
        Path {
            id,
            vertices: vec![Vertex::new(first, 0, id)],
            segments: Vec::new(),
            cumulative: vec![0.0],
            state: PathState::Building,
            arc_points,
            preview: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    pub fn is_building(&self) -> bool {
        self.state == PathState::Building
    }

    pub fn is_finalized(&self) -> bool {
        self.state == PathState::Finalized
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Paths always hold at least one vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.vertices.len() - 1
    }

    pub fn last_coordinate(&self) -> Coordinate {
        self.vertices[self.last_index()].coordinate
    }

    /// Sum of all segment lengths, metres.
    pub fn total_distance(&self) -> f64 {
        self.cumulative[self.last_index()]
    }

    /// Distance along the path from vertex 0 to vertex `index`, metres.
    pub fn cumulative_distance(&self, index: usize) -> Option<f64> {
        self.cumulative.get(index).copied()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Styling role of vertex `index`.
    pub fn role(&self, index: usize) -> VertexRole {
        let last = self.last_index();
        if self.is_building() && index == last {
            VertexRole::Current
        } else if index == 0 {
            VertexRole::Start
        } else if index == last {
            VertexRole::End
        } else {
            VertexRole::Intermediate
        }
    }

    /// Readout for vertex `index`. Vertex 0 has none.
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        if index == 0 || index >= self.vertices.len() {
            return None;
        }
        let incoming = &self.segments[index - 1];
        Some(Tooltip {
            anchor: self.vertices[index].coordinate,
            total: self.cumulative[index],
            difference: incoming.length(),
            inbound_bearing: Some(incoming.inbound_bearing()),
            outbound_bearing: self.segments.get(index).map(|s| s.outbound_bearing()),
        })
    }

    /// Readout following the pointer while previewing.
    pub fn live_tooltip(&self) -> Option<Tooltip> {
        self.preview.as_ref().map(|preview| Tooltip {
            anchor: preview.target,
            total: self.total_distance() + preview.distance,
            difference: preview.distance,
            inbound_bearing: Some(preview.inbound_bearing),
            outbound_bearing: None,
        })
    }

    /// Appends a vertex. A coordinate equal to the last vertex is ignored so
    /// duplicate clicks never create zero-length segments.
    pub fn add_vertex(&mut self, coordinate: Coordinate) -> Result<AddOutcome> {
        if !self.is_building() {
            return Err(MeasureError::illegal(
                "add a vertex",
                "the path is finalized",
            ));
        }
        let last = self.last_coordinate();
        if last.approx_eq(&coordinate) {
            return Ok(AddOutcome::Duplicate);
        }

        let index = self.vertices.len();
        let segment = Segment::new(last, coordinate, self.arc_points);
        self.cumulative.push(self.total_distance() + segment.length());
        self.segments.push(segment);
        self.vertices.push(Vertex::new(coordinate, index, self.id));
        self.preview = None;
        Ok(AddOutcome::Appended(index))
    }

    /// Updates the rubber-band towards `coordinate` without committing anything.
    pub fn move_cursor(&mut self, coordinate: Coordinate) -> Result<&Preview> {
        if !self.is_building() {
            return Err(MeasureError::illegal(
                "preview a vertex",
                "the path is finalized",
            ));
        }
        let last = self.last_coordinate();
        let preview = self.preview.insert(Preview {
            target: coordinate,
            arc: interpolate_arc(&last, &coordinate, self.arc_points),
            distance: haversine_distance(&last, &coordinate),
            inbound_bearing: final_bearing(&last, &coordinate),
        });
        Ok(preview)
    }

    /// Closes the path. The caller decides whether a single-vertex path is
    /// kept at all.
    pub fn finalize(&mut self) -> Result<()> {
        if self.is_finalized() {
            return Err(MeasureError::illegal(
                "finalize",
                "the path is already finalized",
            ));
        }
        self.preview = None;
        self.state = PathState::Finalized;
        Ok(())
    }

    /// Reopens a finalized path from its last vertex.
    pub fn resume(&mut self, from_vertex_index: usize) -> Result<()> {
        if from_vertex_index >= self.vertices.len() {
            return Err(MeasureError::UnknownVertex {
                path: self.id,
                vertex: from_vertex_index,
            });
        }
        if self.is_building() {
            return Err(MeasureError::illegal(
                "resume",
                "the path is still being built",
            ));
        }
        if from_vertex_index != self.last_index() {
            return Err(MeasureError::illegal(
                "resume",
                "only the last vertex can resume a path",
            ));
        }
        self.state = PathState::Building;
        Ok(())
    }

    /// Moves vertex `index`, recomputing the segments on either side of it
    /// and the running totals from `index` onwards.
    ///
    /// Returns the range of segment indices that were recomputed.
    pub fn move_vertex(&mut self, index: usize, coordinate: Coordinate) -> Result<Range<usize>> {
        if index >= self.vertices.len() {
            return Err(MeasureError::UnknownVertex {
                path: self.id,
                vertex: index,
            });
        }
        if self.is_building() {
            return Err(MeasureError::illegal(
                "move a vertex",
                "the path is still being built",
            ));
        }

        self.vertices[index].coordinate = coordinate;

        let first = index.saturating_sub(1);
        let affected = first..(index + 1).min(self.segments.len());
        for s in affected.clone() {
            let start = self.vertices[s].coordinate;
            let end = self.vertices[s + 1].coordinate;
            self.segments[s].recompute(start, end);
        }

        for i in index.max(1)..self.vertices.len() {
            self.cumulative[i] = self.cumulative[i - 1] + self.segments[i - 1].length();
        }
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use crate::map::DEFAULT_ARC_POINTS;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng)
    }

    fn three_vertex_path() -> Path {
        let mut path = Path::new(0, c(0.0, 0.0), DEFAULT_ARC_POINTS);
        path.add_vertex(c(0.0, 1.0)).unwrap();
        path.add_vertex(c(1.0, 1.0)).unwrap();
        path.finalize().unwrap();
        path
    }

    #[test]
    fn test_duplicate_vertex_is_ignored() {
        let mut path = Path::new(0, c(10.0, 10.0), DEFAULT_ARC_POINTS);
        assert_eq!(path.add_vertex(c(10.0, 10.0)).unwrap(), AddOutcome::Duplicate);
        assert_eq!(path.len(), 1);
        assert!(path.segments().is_empty());
        assert_eq!(path.total_distance(), 0.0);
    }

    #[test]
    fn test_build_and_finalize_scenario() {
        let mut path = Path::new(0, c(0.0, 0.0), DEFAULT_ARC_POINTS);
        assert_eq!(path.add_vertex(c(0.0, 1.0)).unwrap(), AddOutcome::Appended(1));
        assert_eq!(path.add_vertex(c(0.0, 1.0)).unwrap(), AddOutcome::Duplicate);
        path.finalize().unwrap();

        assert_eq!(path.len(), 2);
        assert_eq!(path.segments().len(), 1);
        assert_approx_eq!(path.total_distance(), 111_195.0, 1.0);
        assert_eq!(path.state(), PathState::Finalized);
    }

    #[test]
    fn test_roles_follow_position_and_state() {
        let mut path = Path::new(0, c(0.0, 0.0), DEFAULT_ARC_POINTS);
        assert_eq!(path.role(0), VertexRole::Current);

        path.add_vertex(c(0.0, 1.0)).unwrap();
        path.add_vertex(c(0.0, 2.0)).unwrap();
        assert_eq!(path.role(0), VertexRole::Start);
        assert_eq!(path.role(1), VertexRole::Intermediate);
        assert_eq!(path.role(2), VertexRole::Current);

        path.finalize().unwrap();
        assert_eq!(path.role(2), VertexRole::End);

        path.resume(2).unwrap();
        assert_eq!(path.role(2), VertexRole::Current);
    }

    #[test]
    fn test_tooltips_carry_cumulative_and_incremental_distance() {
        let path = three_vertex_path();
        assert!(path.tooltip(0).is_none());

        let first = path.tooltip(1).unwrap();
        assert_approx_eq!(first.total, 111_195.0, 1.0);
        assert_approx_eq!(first.difference, 111_195.0, 1.0);
        assert_approx_eq!(first.inbound_bearing.unwrap(), 90.0, 1e-9);
        assert_approx_eq!(first.outbound_bearing.unwrap(), 0.0, 1e-6);

        let last = path.tooltip(2).unwrap();
        assert_approx_eq!(last.total, first.total + last.difference, 1e-6);
        assert!(last.outbound_bearing.is_none());
        assert!(path.tooltip(3).is_none());
    }

    #[test]
    fn test_move_cursor_previews_without_committing() {
        let mut path = Path::new(0, c(0.0, 0.0), DEFAULT_ARC_POINTS);
        path.add_vertex(c(0.0, 1.0)).unwrap();
        let committed = path.total_distance();

        let preview = path.move_cursor(c(0.0, 2.0)).unwrap();
        assert_approx_eq!(preview.distance, 111_195.0, 1.0);
        assert_eq!(preview.arc.len(), DEFAULT_ARC_POINTS);

        let live = path.live_tooltip().unwrap();
        assert_approx_eq!(live.total, committed + live.difference, 1e-6);
        assert_eq!(path.len(), 2);
        assert_eq!(path.total_distance(), committed);

        path.add_vertex(c(0.0, 2.0)).unwrap();
        assert!(path.preview().is_none());
    }

    #[test]
    fn test_finalize_drops_preview() {
        let mut path = Path::new(0, c(0.0, 0.0), DEFAULT_ARC_POINTS);
        path.add_vertex(c(0.0, 1.0)).unwrap();
        path.move_cursor(c(5.0, 5.0)).unwrap();
        path.finalize().unwrap();
        assert!(path.preview().is_none());
        assert!(path.move_cursor(c(6.0, 6.0)).is_err());
        assert!(path.add_vertex(c(6.0, 6.0)).is_err());
        assert!(path.finalize().is_err());
    }

    #[test]
    fn test_move_vertex_recomputes_neighbours() {
        let mut path = three_vertex_path();
        let untouched_before = path.tooltip(1).unwrap();

        let recomputed = path.move_vertex(1, c(0.0, 2.0)).unwrap();
        assert_eq!(recomputed, 0..2);

        let s0 = path.segment(0).unwrap();
        let s1 = path.segment(1).unwrap();
        assert!(s0.start().approx_eq(&c(0.0, 0.0)));
        assert!(s0.end().approx_eq(&c(0.0, 2.0)));
        assert!(s1.start().approx_eq(&c(0.0, 2.0)));
        assert!(s1.end().approx_eq(&c(1.0, 1.0)));

        let expected = haversine_distance(&c(0.0, 0.0), &c(0.0, 2.0))
            + haversine_distance(&c(0.0, 2.0), &c(1.0, 1.0));
        assert_approx_eq!(path.total_distance(), expected, 1e-6);
        assert_ne!(path.tooltip(1).unwrap(), untouched_before);
        assert_eq!(path.vertex(1).unwrap().index, 1);
        assert_eq!(path.vertex(1).unwrap().path_id, 0);
    }

    #[test]
    fn test_move_endpoints_touch_one_segment() {
        let mut path = three_vertex_path();
        assert_eq!(path.move_vertex(0, c(0.0, -1.0)).unwrap(), 0..1);
        assert_eq!(path.move_vertex(2, c(2.0, 2.0)).unwrap(), 1..2);
        assert_approx_eq!(path.cumulative_distance(0).unwrap(), 0.0);
    }

    #[test]
    fn test_move_vertex_rejected_while_building() {
        let mut path = Path::new(0, c(0.0, 0.0), DEFAULT_ARC_POINTS);
        path.add_vertex(c(0.0, 1.0)).unwrap();
        let err = path.move_vertex(0, c(3.0, 3.0)).unwrap_err();
        assert!(matches!(err, MeasureError::IllegalTransition { .. }));
        assert!(path.vertex(0).unwrap().matches(&c(0.0, 0.0)));
        assert!(matches!(
            path.move_vertex(7, c(3.0, 3.0)),
            Err(MeasureError::UnknownVertex { .. })
        ));
    }

    #[test]
    fn test_resume_only_from_last_vertex() {
        let mut path = three_vertex_path();
        let err = path.resume(0).unwrap_err();
        assert!(matches!(err, MeasureError::IllegalTransition { .. }));
        assert!(path.is_finalized());

        path.resume(2).unwrap();
        assert!(path.is_building());
        assert_eq!(path.add_vertex(c(2.0, 2.0)).unwrap(), AddOutcome::Appended(3));
        assert_eq!(path.segments().len(), 3);
        assert!(path.resume(3).is_err());
    }
}
