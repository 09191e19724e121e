// src/editor/testing.rs
//! In-memory [`MapSurface`] that records what the engine asks it to do.

use crate::editor::controller::MeasureController;
use crate::editor::surface::{
    Drawable, DrawableId, DrawableLayer, LabelKind, MapSurface, ScreenPoint,
};
use crate::document::VertexRef;
use crate::map::Coordinate;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RecordingSurface {
    next_id: u64,
    pub drawables: BTreeMap<DrawableId, Drawable>,
    /// Every id passed to `update`, in call order.
    pub updates: Vec<DrawableId>,
    pub removed: Vec<DrawableId>,
    pub panning_enabled: bool,
    pub measuring_cursor: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            next_id: 0,
            drawables: BTreeMap::new(),
            updates: Vec::new(),
            removed: Vec::new(),
            panning_enabled: true,
            measuring_cursor: false,
        }
    }
}

impl RecordingSurface {
    pub fn count(&self, pred: impl Fn(&Drawable) -> bool) -> usize {
        self.drawables.values().filter(|d| pred(d)).count()
    }

    /// Ids of matching drawables in creation order.
    pub fn ids_of(&self, pred: impl Fn(&Drawable) -> bool) -> Vec<DrawableId> {
        self.drawables
            .iter()
            .filter(|(_, d)| pred(d))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Text and kind of every label in creation order.
    pub fn labels(&self) -> Vec<(String, LabelKind)> {
        self.drawables
            .values()
            .filter_map(|d| match d {
                Drawable::Label { text, kind, .. } => Some((text.clone(), *kind)),
                _ => None,
            })
            .collect()
    }

    /// The circle a controller registered for `vertex`.
    pub fn circle_for<S: MapSurface>(
        &self,
        controller: &MeasureController<S>,
        vertex: VertexRef,
    ) -> Option<DrawableId> {
        self.drawables
            .keys()
            .copied()
            .find(|id| controller.vertex_at(*id) == Some(vertex))
    }
}

impl DrawableLayer for RecordingSurface {
    fn add(&mut self, drawable: Drawable) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.drawables.insert(id, drawable);
        id
    }

    fn update(&mut self, id: DrawableId, drawable: Drawable) {
        if let Some(slot) = self.drawables.get_mut(&id) {
            *slot = drawable;
            self.updates.push(id);
        }
    }

    fn remove(&mut self, id: DrawableId) {
        if self.drawables.remove(&id).is_some() {
            self.removed.push(id);
        }
    }
}

impl MapSurface for RecordingSurface {
    fn set_panning_enabled(&mut self, enabled: bool) {
        self.panning_enabled = enabled;
    }

    fn set_measuring_cursor(&mut self, active: bool) {
        self.measuring_cursor = active;
    }

    fn project(&self, coordinate: Coordinate) -> ScreenPoint {
        ScreenPoint {
            x: coordinate.lng as f32,
            y: -coordinate.lat as f32,
        }
    }
}
