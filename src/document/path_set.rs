// src/document/path_set.rs

use crate::document::path::{AddOutcome, Path, Preview};
use crate::error::{MeasureError, Result};
use crate::map::{Coordinate, Vertex};
use crate::utils::MeasurementUnit;
use log::{debug, info};
use std::ops::Range;

/// Addresses one vertex of one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexRef {
    pub path_id: usize,
    pub vertex_index: usize,
}

impl VertexRef {
    pub fn new(path_id: usize, vertex_index: usize) -> Self {
        VertexRef {
            path_id,
            vertex_index,
        }
    }
}

/// What happened to the active path on finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Kept as a completed path.
    Finalized(usize),
    /// Dropped because it never got past its first vertex.
    Discarded(usize),
}

/// All measurements on the map.
///
/// Paths live in an arena indexed by id: `paths[k].id() == k` always. At
/// most one path is being built at a time; it is either the newest path or a
/// resumed one. Paths are only ever removed all together by [`PathSet::clear`],
/// apart from a brand-new path discarded on finalize, which is always the
/// last entry.
#[derive(Debug, Clone)]
pub struct PathSet {
    paths: Vec<Path>,
    active: Option<usize>,
    unit: MeasurementUnit,
    show_bearings: bool,
    arc_points: usize,
}

impl PathSet {
    pub fn new(unit: MeasurementUnit, show_bearings: bool, arc_points: usize) -> Self {
        PathSet {
            paths: Vec::new(),
            active: None,
            unit,
            show_bearings,
            arc_points,
        }
    }

    pub fn unit(&self) -> MeasurementUnit {
        self.unit
    }

    /// Switches the display unit. Stored distances stay in metres.
    pub fn set_unit(&mut self, unit: MeasurementUnit) {
        self.unit = unit;
    }

    pub fn show_bearings(&self) -> bool {
        self.show_bearings
    }

    pub fn set_show_bearings(&mut self, show: bool) {
        self.show_bearings = show;
    }

    pub fn arc_points(&self) -> usize {
        self.arc_points
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn path(&self, id: usize) -> Option<&Path> {
        self.paths.get(id)
    }

    pub fn vertex(&self, vertex: VertexRef) -> Option<&Vertex> {
        self.paths.get(vertex.path_id)?.vertex(vertex.vertex_index)
    }

    /// Finalized paths, in id order.
    pub fn completed_paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().filter(|p| p.is_finalized())
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active.and_then(|id| self.paths.get(id))
    }

    pub fn active_path_id(&self) -> Option<usize> {
        self.active
    }

    pub fn is_building(&self) -> bool {
        self.active.is_some()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Commits a vertex to the active path, starting a new path when none is
    /// being built. Returns `None` when the click duplicated the last vertex.
    pub fn add_vertex(&mut self, coordinate: Coordinate) -> Result<Option<VertexRef>> {
        let Some(id) = self.active else {
            let id = self.paths.len();
            self.paths.push(Path::new(id, coordinate, self.arc_points));
            self.active = Some(id);
            debug!("Started path {} at {}", id, coordinate);
            return Ok(Some(VertexRef::new(id, 0)));
        };

        let path = self.paths.get_mut(id).ok_or(MeasureError::UnknownPath(id))?;
        match path.add_vertex(coordinate)? {
            AddOutcome::Appended(index) => {
                debug!("Path {}: vertex {} at {}", id, index, coordinate);
                Ok(Some(VertexRef::new(id, index)))
            }
            AddOutcome::Duplicate => {
                debug!("Path {}: ignored duplicate vertex at {}", id, coordinate);
                Ok(None)
            }
        }
    }

    /// Moves the rubber-band of the active path, if any.
    pub fn move_cursor(&mut self, coordinate: Coordinate) -> Option<&Preview> {
        let id = self.active?;
        self.paths.get_mut(id)?.move_cursor(coordinate).ok()
    }

    /// Closes the active path. A path with a single vertex has nothing to
    /// measure and is dropped.
    pub fn finalize_active(&mut self) -> Result<FinalizeOutcome> {
        let id = self
            .active
            .ok_or(MeasureError::illegal("finalize", "no path is being built"))?;
        let path = self.paths.get_mut(id).ok_or(MeasureError::UnknownPath(id))?;
        path.finalize()?;
        self.active = None;

        if path.len() == 1 {
            // A single-vertex path is always the newest one.
            self.paths.pop();
            info!("Discarded single-vertex path {}", id);
            return Ok(FinalizeOutcome::Discarded(id));
        }
        info!(
            "Finalized path {} with {} vertices, {:.1} m",
            id,
            path.len(),
            path.total_distance()
        );
        Ok(FinalizeOutcome::Finalized(id))
    }

    /// Reopens a finalized path from its last vertex.
    pub fn resume(&mut self, vertex: VertexRef) -> Result<()> {
        if self.active.is_some() {
            return Err(MeasureError::illegal(
                "resume",
                "another path is being built",
            ));
        }
        let path = self
            .paths
            .get_mut(vertex.path_id)
            .ok_or(MeasureError::UnknownPath(vertex.path_id))?;
        path.resume(vertex.vertex_index)?;
        self.active = Some(vertex.path_id);
        info!("Resumed path {} from vertex {}", vertex.path_id, vertex.vertex_index);
        Ok(())
    }

    /// Drags a committed vertex. Only legal while no path is being built.
    pub fn move_vertex(&mut self, vertex: VertexRef, coordinate: Coordinate) -> Result<Range<usize>> {
        if self.active.is_some() {
            return Err(MeasureError::illegal(
                "move a vertex",
                "a path is being built",
            ));
        }
        let path = self
            .paths
            .get_mut(vertex.path_id)
            .ok_or(MeasureError::UnknownPath(vertex.path_id))?;
        path.move_vertex(vertex.vertex_index, coordinate)
    }

    /// Removes every path.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.active = None;
        info!("Cleared all measurements");
    }
}

impl Default for PathSet {
    fn default() -> Self {
        Self::new(
            MeasurementUnit::default(),
            false,
            crate::map::DEFAULT_ARC_POINTS,
        )
    }
}
