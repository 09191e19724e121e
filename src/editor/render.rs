// src/editor/render.rs

use crate::config::MeasureOptions;
use crate::document::{Path, PathSet, VertexRef};
use crate::editor::surface::{Drawable, DrawableId, DrawableLayer, LabelKind};
use crate::map::Segment;
use std::collections::HashMap;
use std::ops::Range;

/// Drawables belonging to one path, indexed like the path itself.
#[derive(Debug, Default)]
struct PathGraphics {
    /// One polyline per segment.
    lines: Vec<DrawableId>,
    /// One arrow per segment, empty when arrows are off.
    arrows: Vec<DrawableId>,
    /// One circle per vertex.
    circles: Vec<DrawableId>,
    /// One label per vertex; vertex 0 has none.
    labels: Vec<Option<DrawableId>>,
    rubber_band: Option<DrawableId>,
    live_label: Option<DrawableId>,
}

impl PathGraphics {
    fn ids(&self) -> impl Iterator<Item = DrawableId> + '_ {
        self.lines
            .iter()
            .chain(&self.arrows)
            .chain(&self.circles)
            .copied()
            .chain(self.labels.iter().flatten().copied())
            .chain(self.rubber_band)
            .chain(self.live_label)
    }

    fn drop_preview(&mut self, layer: &mut dyn DrawableLayer) {
        if let Some(id) = self.rubber_band.take() {
            layer.remove(id);
        }
        if let Some(id) = self.live_label.take() {
            layer.remove(id);
        }
    }
}

/// Keeps the host's drawables in step with a [`PathSet`].
///
/// Every method touches only what the corresponding model change affected,
/// so a drag updates two arcs and the labels after the dragged vertex and
/// nothing else.
#[derive(Debug, Default)]
pub struct Renderer {
    graphics: Vec<PathGraphics>,
    vertex_hits: HashMap<DrawableId, VertexRef>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a vertex circle back to the vertex it marks.
    pub fn vertex_at(&self, id: DrawableId) -> Option<VertexRef> {
        self.vertex_hits.get(&id).copied()
    }

    pub fn vertex_added(
        &mut self,
        layer: &mut dyn DrawableLayer,
        set: &PathSet,
        vertex: VertexRef,
        options: &MeasureOptions,
    ) {
        let Some(path) = set.path(vertex.path_id) else {
            return;
        };
        if vertex.path_id >= self.graphics.len() {
            self.graphics.resize_with(vertex.path_id + 1, PathGraphics::default);
        }
        let g = &mut self.graphics[vertex.path_id];
        let i = vertex.vertex_index;

        let circle_id = layer.add(circle(path, i, options));
        g.circles.push(circle_id);
        self.vertex_hits.insert(circle_id, vertex);

        if i == 0 {
            g.labels.push(None);
        } else {
            layer.update(g.circles[i - 1], circle(path, i - 1, options));

            let segment = &path.segments()[i - 1];
            g.lines.push(layer.add(line(segment, options)));
            if options.show_arrows {
                g.arrows.push(layer.add(arrow(segment, options)));
            }
            // The previous readout gains an outbound bearing.
            if let (Some(Some(id)), Some(d)) = (g.labels.get(i - 1), label(set, path, i - 1)) {
                layer.update(*id, d);
            }
            g.labels.push(label(set, path, i).map(|d| layer.add(d)));
        }
        g.drop_preview(layer);
    }

    /// Redraws the rubber-band and live readout of the active path.
    pub fn preview_moved(
        &mut self,
        layer: &mut dyn DrawableLayer,
        set: &PathSet,
        options: &MeasureOptions,
    ) {
        let Some(path) = set.active_path() else {
            return;
        };
        let (Some(preview), Some(tooltip)) = (path.preview(), path.live_tooltip()) else {
            return;
        };
        let Some(g) = self.graphics.get_mut(path.id()) else {
            return;
        };

        let band = Drawable::Polyline {
            points: preview.arc.clone(),
            style: options.temp_line.clone(),
        };
        upsert(layer, &mut g.rubber_band, band);

        let live = Drawable::Label {
            anchor: tooltip.anchor,
            text: tooltip.text(set.unit(), set.show_bearings()),
            kind: LabelKind::Live,
        };
        upsert(layer, &mut g.live_label, live);
    }

    pub fn path_finalized(
        &mut self,
        layer: &mut dyn DrawableLayer,
        set: &PathSet,
        path_id: usize,
        options: &MeasureOptions,
    ) {
        let Some(g) = self.graphics.get_mut(path_id) else {
            return;
        };
        g.drop_preview(layer);
        if let Some(path) = set.path(path_id) {
            restyle_last(layer, g, set, path, options);
        }
    }

    pub fn path_resumed(
        &mut self,
        layer: &mut dyn DrawableLayer,
        set: &PathSet,
        path_id: usize,
        options: &MeasureOptions,
    ) {
        let (Some(g), Some(path)) = (self.graphics.get_mut(path_id), set.path(path_id)) else {
            return;
        };
        restyle_last(layer, g, set, path, options);
    }

    /// Removes everything drawn for a path that was dropped on finalize.
    pub fn path_discarded(&mut self, layer: &mut dyn DrawableLayer, path_id: usize) {
        let Some(g) = self.graphics.get_mut(path_id) else {
            return;
        };
        let g = std::mem::take(g);
        for id in g.ids() {
            self.vertex_hits.remove(&id);
            layer.remove(id);
        }
        if path_id + 1 == self.graphics.len() {
            self.graphics.pop();
        }
    }

    /// Refreshes a dragged vertex, the recomputed `segments` around it and
    /// every label whose distance or bearing depends on it.
    pub fn vertex_moved(
        &mut self,
        layer: &mut dyn DrawableLayer,
        set: &PathSet,
        vertex: VertexRef,
        segments: Range<usize>,
        options: &MeasureOptions,
    ) {
        let (Some(g), Some(path)) = (self.graphics.get_mut(vertex.path_id), set.path(vertex.path_id))
        else {
            return;
        };
        let i = vertex.vertex_index;

        if let Some(&id) = g.circles.get(i) {
            layer.update(id, circle(path, i, options));
        }
        for s in segments {
            let Some(segment) = path.segment(s) else {
                continue;
            };
            if let Some(&id) = g.lines.get(s) {
                layer.update(id, line(segment, options));
            }
            if let Some(&id) = g.arrows.get(s) {
                layer.update(id, arrow(segment, options));
            }
        }
        // The readout before the vertex shows the outbound bearing it changed.
        for index in i.saturating_sub(1).max(1)..path.len() {
            if let (Some(Some(id)), Some(d)) = (g.labels.get(index), label(set, path, index)) {
                layer.update(*id, d);
            }
        }
    }

    /// Re-renders every readout, e.g. after a unit change.
    pub fn relabel(&mut self, layer: &mut dyn DrawableLayer, set: &PathSet) {
        for (g, path) in self.graphics.iter().zip(set.paths()) {
            for (index, id) in g.labels.iter().enumerate() {
                if let (Some(id), Some(d)) = (id, label(set, path, index)) {
                    layer.update(*id, d);
                }
            }
            if let (Some(id), Some(tooltip)) = (g.live_label, path.live_tooltip()) {
                layer.update(
                    id,
                    Drawable::Label {
                        anchor: tooltip.anchor,
                        text: tooltip.text(set.unit(), set.show_bearings()),
                        kind: LabelKind::Live,
                    },
                );
            }
        }
    }

    /// Throws away all drawables and draws the whole set again.
    pub fn rebuild(&mut self, layer: &mut dyn DrawableLayer, set: &PathSet, options: &MeasureOptions) {
        self.clear(layer);
        for path in set.paths() {
            for index in 0..path.len() {
                self.vertex_added(layer, set, VertexRef::new(path.id(), index), options);
            }
            if path.is_finalized() {
                self.path_finalized(layer, set, path.id(), options);
            }
        }
        self.preview_moved(layer, set, options);
    }

    pub fn clear(&mut self, layer: &mut dyn DrawableLayer) {
        for g in self.graphics.drain(..) {
            for id in g.ids() {
                layer.remove(id);
            }
        }
        self.vertex_hits.clear();
    }
}

fn upsert(layer: &mut dyn DrawableLayer, slot: &mut Option<DrawableId>, drawable: Drawable) {
    match slot {
        Some(id) => layer.update(*id, drawable),
        None => *slot = Some(layer.add(drawable)),
    }
}

/// Applies the role-dependent style of the last vertex and its label.
fn restyle_last(
    layer: &mut dyn DrawableLayer,
    g: &PathGraphics,
    set: &PathSet,
    path: &Path,
    options: &MeasureOptions,
) {
    let last = path.last_index();
    if let Some(&id) = g.circles.get(last) {
        layer.update(id, circle(path, last, options));
    }
    if let (Some(Some(id)), Some(d)) = (g.labels.get(last), label(set, path, last)) {
        layer.update(*id, d);
    }
}

fn circle(path: &Path, index: usize, options: &MeasureOptions) -> Drawable {
    Drawable::Circle {
        center: path.vertices()[index].coordinate,
        style: options.circle_style(path.role(index)).clone(),
    }
}

fn line(segment: &Segment, options: &MeasureOptions) -> Drawable {
    Drawable::Polyline {
        points: segment.arc().to_vec(),
        style: options.fixed_line.clone(),
    }
}

fn arrow(segment: &Segment, options: &MeasureOptions) -> Drawable {
    Drawable::Arrow {
        anchor: segment.arrow().position,
        rotation: segment.arrow().rotation,
        style: options.arrow.clone(),
    }
}

fn label(set: &PathSet, path: &Path, index: usize) -> Option<Drawable> {
    let tooltip = path.tooltip(index)?;
    let kind = if path.is_finalized() && index == path.last_index() {
        LabelKind::End
    } else {
        LabelKind::Vertex
    };
    Some(Drawable::Label {
        anchor: tooltip.anchor,
        text: tooltip.text(set.unit(), set.show_bearings()),
        kind,
    })
}
