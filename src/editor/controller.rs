// src/editor/controller.rs

use crate::config::MeasureOptions;
use crate::document::{FinalizeOutcome, PathSet, VertexRef};
use crate::editor::render::Renderer;
use crate::editor::surface::{DrawableId, Key, MapEvent, MapSurface, Modifiers};
use crate::error::MeasureError;
use crate::map::Coordinate;
use crate::utils::MeasurementUnit;
use log::{debug, info, warn};

/// A vertex being dragged, remembered relative to where the drag began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexDrag {
    pub vertex: VertexRef,
    pub pointer_start: Coordinate,
    pub vertex_start: Coordinate,
    /// Whether the pointer has left its starting point. A press and release
    /// in place is a click, not a drag.
    pub moved: bool,
}

impl VertexDrag {
    /// Where the vertex goes when the pointer is at `pointer`.
    fn target(&self, pointer: Coordinate) -> Coordinate {
        Coordinate::new(
            self.vertex_start.lat + (pointer.lat - self.pointer_start.lat),
            self.vertex_start.lng + (pointer.lng - self.pointer_start.lng),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerState {
    Idle,
    Measuring,
    DraggingVertex(VertexDrag),
}

impl ControllerState {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerState::Idle => "Idle",
            ControllerState::Measuring => "Measuring",
            ControllerState::DraggingVertex(_) => "Dragging vertex",
        }
    }
}

/// Drives a [`PathSet`] from map input and mirrors it onto a [`MapSurface`].
pub struct MeasureController<S: MapSurface> {
    surface: S,
    paths: PathSet,
    renderer: Renderer,
    options: MeasureOptions,
    state: ControllerState,
    /// Set when a drag ends; the click that closes a drag gesture is not a
    /// new vertex.
    swallow_click: bool,
}

impl<S: MapSurface> MeasureController<S> {
    pub fn new(surface: S, options: MeasureOptions) -> Self {
        let paths = PathSet::new(options.unit, options.show_bearings, options.arc_points);
        Self {
            surface,
            paths,
            renderer: Renderer::new(),
            options,
            state: ControllerState::Idle,
            swallow_click: false,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_measuring(&self) -> bool {
        self.state != ControllerState::Idle
    }

    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    pub fn options(&self) -> &MeasureOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The vertex marked by a drawable, if it is a vertex circle.
    pub fn vertex_at(&self, id: DrawableId) -> Option<VertexRef> {
        self.renderer.vertex_at(id)
    }

    pub fn start_measuring(&mut self) {
        if self.state != ControllerState::Idle {
            return;
        }
        self.state = ControllerState::Measuring;
        self.swallow_click = false;
        self.surface.set_measuring_cursor(true);
        info!("Measuring started");
    }

    /// Finishes any path in progress and leaves measuring mode, wiping the
    /// measurements when `clear_measurements_on_stop` is set.
    pub fn stop_measuring(&mut self) {
        if self.state == ControllerState::Idle {
            return;
        }
        self.end_drag();
        if self.paths.is_building() {
            self.finalize_active();
        }
        if self.options.clear_measurements_on_stop {
            self.clear_all();
        }
        self.surface.set_measuring_cursor(false);
        self.state = ControllerState::Idle;
        info!("Measuring stopped");
    }

    pub fn toggle_measuring(&mut self) {
        if self.is_measuring() {
            self.stop_measuring();
        } else {
            self.start_measuring();
        }
    }

    /// Removes every measurement. Measuring mode is kept.
    pub fn clear_all(&mut self) {
        self.end_drag();
        self.renderer.clear(&mut self.surface);
        self.paths.clear();
    }

    pub fn set_unit(&mut self, unit: MeasurementUnit) {
        self.options.unit = unit;
        self.paths.set_unit(unit);
        self.renderer.relabel(&mut self.surface, &self.paths);
        debug!("Unit set to {}", unit.name());
    }

    pub fn set_show_bearings(&mut self, show: bool) {
        self.options.show_bearings = show;
        self.paths.set_show_bearings(show);
        self.renderer.relabel(&mut self.surface, &self.paths);
    }

    pub fn set_show_arrows(&mut self, show: bool) {
        if self.options.show_arrows == show {
            return;
        }
        self.options.show_arrows = show;
        self.renderer
            .rebuild(&mut self.surface, &self.paths, &self.options);
    }

    /// Feeds one input event through the state machine. Input that does not
    /// apply to the current state is ignored.
    pub fn handle_event(&mut self, event: MapEvent) {
        match (self.state, event) {
            (ControllerState::Idle, _) => {}

            (ControllerState::Measuring, MapEvent::PointerMove { at }) => {
                self.swallow_click = false;
                if self.paths.move_cursor(at).is_some() {
                    self.renderer
                        .preview_moved(&mut self.surface, &self.paths, &self.options);
                }
            }
            (ControllerState::Measuring, MapEvent::Click { at, target, modifiers }) => {
                if std::mem::take(&mut self.swallow_click) {
                    return;
                }
                self.on_click(at, target, modifiers);
            }
            (ControllerState::Measuring, MapEvent::PointerDown { at, target }) => {
                self.on_pointer_down(at, target);
            }
            (ControllerState::Measuring, MapEvent::Key(Key::Escape)) => {
                if self.paths.is_building() {
                    self.finalize_active();
                } else {
                    self.stop_measuring();
                }
            }
            (ControllerState::Measuring, _) => {}

            (ControllerState::DraggingVertex(mut drag), MapEvent::PointerMove { at }) => {
                if drag.moved || !at.approx_eq(&drag.pointer_start) {
                    drag.moved = true;
                    self.state = ControllerState::DraggingVertex(drag);
                    self.drag_to(drag, at);
                }
            }
            (ControllerState::DraggingVertex(drag), MapEvent::PointerUp { at }) => {
                let moved = drag.moved || !at.approx_eq(&drag.pointer_start);
                if moved {
                    self.drag_to(drag, at);
                }
                self.end_drag();
                self.swallow_click = moved;
                debug!(
                    "Dropped vertex {} of path {}",
                    drag.vertex.vertex_index, drag.vertex.path_id
                );
            }
            (ControllerState::DraggingVertex(drag), MapEvent::PointerDown { .. }) => {
                warn!(
                    "Ignoring pointer down while vertex {} of path {} is dragged",
                    drag.vertex.vertex_index, drag.vertex.path_id
                );
            }
            (ControllerState::DraggingVertex(_), _) => {}
        }
    }

    fn on_click(&mut self, at: Coordinate, target: Option<DrawableId>, modifiers: Modifiers) {
        if let Some(vertex) = target.and_then(|id| self.renderer.vertex_at(id)) {
            let is_last = self
                .paths
                .path(vertex.path_id)
                .map_or(false, |p| p.last_index() == vertex.vertex_index);

            if is_last && self.paths.active_path_id() == Some(vertex.path_id) {
                self.finalize_active();
                return;
            }
            if modifiers.ctrl {
                self.resume(vertex);
                return;
            }
        }
        self.add_vertex(at);
    }

    fn on_pointer_down(&mut self, at: Coordinate, target: Option<DrawableId>) {
        let Some(vertex) = target.and_then(|id| self.renderer.vertex_at(id)) else {
            return;
        };
        if self.paths.is_building() {
            self.reject(
                "drag",
                MeasureError::illegal("drag a vertex", "a path is being built"),
            );
            return;
        }
        let Some(v) = self.paths.vertex(vertex) else {
            self.reject("drag", MeasureError::UnknownPath(vertex.path_id));
            return;
        };
        self.state = ControllerState::DraggingVertex(VertexDrag {
            vertex,
            pointer_start: at,
            vertex_start: v.coordinate,
            moved: false,
        });
        self.surface.set_panning_enabled(false);
        debug!(
            "Dragging vertex {} of path {}",
            vertex.vertex_index, vertex.path_id
        );
    }

    fn add_vertex(&mut self, at: Coordinate) {
        match self.paths.add_vertex(at) {
            Ok(Some(vertex)) => {
                self.renderer
                    .vertex_added(&mut self.surface, &self.paths, vertex, &self.options);
            }
            Ok(None) => {}
            Err(err) => self.reject("click", err),
        }
    }

    fn finalize_active(&mut self) {
        match self.paths.finalize_active() {
            Ok(FinalizeOutcome::Finalized(id)) => {
                self.renderer
                    .path_finalized(&mut self.surface, &self.paths, id, &self.options);
            }
            Ok(FinalizeOutcome::Discarded(id)) => {
                self.renderer.path_discarded(&mut self.surface, id);
            }
            Err(err) => self.reject("finalize", err),
        }
    }

    fn resume(&mut self, vertex: VertexRef) {
        match self.paths.resume(vertex) {
            Ok(()) => {
                self.renderer
                    .path_resumed(&mut self.surface, &self.paths, vertex.path_id, &self.options);
            }
            Err(err) => self.reject("resume", err),
        }
    }

    fn drag_to(&mut self, drag: VertexDrag, pointer: Coordinate) {
        match self.paths.move_vertex(drag.vertex, drag.target(pointer)) {
            Ok(segments) => {
                self.renderer.vertex_moved(
                    &mut self.surface,
                    &self.paths,
                    drag.vertex,
                    segments,
                    &self.options,
                );
            }
            Err(err) => self.reject("drag", err),
        }
    }

    fn end_drag(&mut self) {
        if let ControllerState::DraggingVertex(_) = self.state {
            self.surface.set_panning_enabled(true);
            self.state = ControllerState::Measuring;
        }
    }

    fn reject(&self, gesture: &str, err: MeasureError) {
        if err.is_rejected_gesture() {
            debug!("Ignored {}: {}", gesture, err);
        } else {
            warn!("{} failed: {}", gesture, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PathState;
    use crate::editor::surface::{Drawable, LabelKind};
    use crate::editor::testing::RecordingSurface;
    use assert_approx_eq::assert_approx_eq;

    fn controller() -> MeasureController<RecordingSurface> {
        let mut c = MeasureController::new(RecordingSurface::default(), MeasureOptions::default());
        c.start_measuring();
        c
    }

    fn click(c: &mut MeasureController<RecordingSurface>, lat: f64, lng: f64) {
        c.handle_event(MapEvent::Click {
            at: Coordinate::new(lat, lng),
            target: None,
            modifiers: Modifiers::default(),
        });
    }

    fn click_vertex(c: &mut MeasureController<RecordingSurface>, vertex: VertexRef, ctrl: bool) {
        let at = c.paths().vertex(vertex).unwrap().coordinate;
        let target = c.surface().circle_for(c, vertex);
        c.handle_event(MapEvent::Click {
            at,
            target,
            modifiers: Modifiers {
                ctrl,
                ..Modifiers::default()
            },
        });
    }

    fn measure_path(c: &mut MeasureController<RecordingSurface>, points: &[(f64, f64)]) -> usize {
        for &(lat, lng) in points {
            click(c, lat, lng);
        }
        let id = c.paths().active_path_id().unwrap();
        c.handle_event(MapEvent::Key(Key::Escape));
        id
    }

    #[test]
    fn test_idle_ignores_input() {
        let mut c = MeasureController::new(RecordingSurface::default(), MeasureOptions::default());
        click(&mut c, 0.0, 0.0);
        assert!(c.paths().is_empty());
        assert!(c.surface().drawables.is_empty());
        assert!(!c.surface().measuring_cursor);
    }

    #[test]
    fn test_click_duplicate_then_finish_on_last_vertex() {
        let mut c = controller();
        click(&mut c, 0.0, 0.0);
        click(&mut c, 0.0, 1.0);
        click(&mut c, 0.0, 1.0);
        assert_eq!(c.paths().active_path().unwrap().len(), 2);

        click_vertex(&mut c, VertexRef::new(0, 1), false);

        let path = c.paths().path(0).unwrap();
        assert_eq!(path.state(), PathState::Finalized);
        assert_approx_eq!(path.total_distance(), 111_195.0, 1.0);
        assert!(!c.paths().is_building());

        let s = c.surface();
        assert_eq!(s.count(|d| matches!(d, Drawable::Circle { .. })), 2);
        assert_eq!(s.count(|d| matches!(d, Drawable::Polyline { .. })), 1);
        assert_eq!(s.count(|d| matches!(d, Drawable::Arrow { .. })), 1);
        let labels = s.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].1, LabelKind::End);
        assert!(labels[0].0.starts_with("111"));
    }

    #[test]
    fn test_pointer_move_draws_rubber_band_and_live_label() {
        let mut c = controller();
        click(&mut c, 0.0, 0.0);
        c.handle_event(MapEvent::PointerMove {
            at: Coordinate::new(0.0, 0.5),
        });

        let s = c.surface();
        let bands: Vec<_> = s
            .drawables
            .values()
            .filter_map(|d| match d {
                Drawable::Polyline { style, .. } => Some(style.dashed),
                _ => None,
            })
            .collect();
        assert_eq!(bands, vec![true]);
        let labels = s.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].1, LabelKind::Live);

        click(&mut c, 0.0, 0.5);
        let s = c.surface();
        assert!(s.labels().iter().all(|(_, kind)| *kind == LabelKind::Vertex));
        assert_eq!(s.count(|d| matches!(d, Drawable::Polyline { .. })), 1);
    }

    #[test]
    fn test_escape_twice_finalizes_then_stops() {
        let mut c = controller();
        click(&mut c, 0.0, 0.0);
        click(&mut c, 1.0, 1.0);

        c.handle_event(MapEvent::Key(Key::Escape));
        assert!(c.is_measuring());
        assert!(c.paths().path(0).unwrap().is_finalized());

        c.handle_event(MapEvent::Key(Key::Escape));
        assert_eq!(c.state(), ControllerState::Idle);
        assert!(c.paths().is_empty());
        assert!(c.surface().drawables.is_empty());
        assert!(!c.surface().measuring_cursor);
    }

    #[test]
    fn test_stop_keeps_measurements_when_configured() {
        let options = MeasureOptions {
            clear_measurements_on_stop: false,
            ..MeasureOptions::default()
        };
        let mut c = MeasureController::new(RecordingSurface::default(), options);
        c.start_measuring();
        click(&mut c, 0.0, 0.0);
        click(&mut c, 0.0, 2.0);
        c.toggle_measuring();

        assert_eq!(c.state(), ControllerState::Idle);
        assert_eq!(c.paths().len(), 1);
        assert!(c.paths().path(0).unwrap().is_finalized());
        assert!(!c.surface().drawables.is_empty());
    }

    #[test]
    fn test_single_vertex_path_is_discarded() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0)]);
        let before = c.surface().drawables.len();

        click(&mut c, 5.0, 5.0);
        c.handle_event(MapEvent::PointerMove {
            at: Coordinate::new(5.0, 6.0),
        });
        c.handle_event(MapEvent::Key(Key::Escape));

        assert_eq!(c.paths().len(), 1);
        assert_eq!(c.surface().drawables.len(), before);
    }

    #[test]
    fn test_drag_refreshes_only_neighbouring_segments() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (0.0, 3.0)]);
        let lines = c.surface().ids_of(|d| matches!(d, Drawable::Polyline { .. }));
        let arrows = c.surface().ids_of(|d| matches!(d, Drawable::Arrow { .. }));
        let labels = c.surface().ids_of(|d| matches!(d, Drawable::Label { .. }));

        let vertex = VertexRef::new(0, 1);
        let at = Coordinate::new(0.0, 1.0);
        let target = c.surface().circle_for(&c, vertex);
        c.handle_event(MapEvent::PointerDown { at, target });
        assert!(matches!(c.state(), ControllerState::DraggingVertex(_)));
        assert!(!c.surface().panning_enabled);

        c.surface_mut().updates.clear();
        c.handle_event(MapEvent::PointerMove {
            at: Coordinate::new(1.0, 1.0),
        });

        let updates = &c.surface().updates;
        assert!(updates.contains(&lines[0]));
        assert!(updates.contains(&lines[1]));
        assert!(!updates.contains(&lines[2]));
        assert!(updates.contains(&arrows[0]));
        assert!(updates.contains(&arrows[1]));
        assert!(!updates.contains(&arrows[2]));
        assert!(labels.iter().all(|id| updates.contains(id)));

        c.handle_event(MapEvent::PointerUp {
            at: Coordinate::new(1.0, 1.5),
        });
        assert_eq!(c.state(), ControllerState::Measuring);
        assert!(c.surface().panning_enabled);

        let moved = c.paths().vertex(vertex).unwrap().coordinate;
        assert!(moved.approx_eq(&Coordinate::new(1.0, 1.5)));
        let path = c.paths().path(0).unwrap();
        let expected: f64 = path.segments().iter().map(|s| s.length()).sum();
        assert_approx_eq!(path.total_distance(), expected, 1e-6);
    }

    #[test]
    fn test_drag_is_relative_to_grab_point() {
        let mut c = controller();
        measure_path(&mut c, &[(10.0, 10.0), (10.0, 20.0)]);
        let vertex = VertexRef::new(0, 0);
        let target = c.surface().circle_for(&c, vertex);

        c.handle_event(MapEvent::PointerDown {
            at: Coordinate::new(10.1, 10.1),
            target,
        });
        c.handle_event(MapEvent::PointerUp {
            at: Coordinate::new(12.1, 11.1),
        });

        let moved = c.paths().vertex(vertex).unwrap().coordinate;
        assert_approx_eq!(moved.lat, 12.0, 1e-9);
        assert_approx_eq!(moved.lng, 11.0, 1e-9);
    }

    #[test]
    fn test_click_closing_a_drag_adds_no_vertex() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0)]);
        let target = c.surface().circle_for(&c, VertexRef::new(0, 1));
        let at = Coordinate::new(0.0, 1.0);

        let dropped = Coordinate::new(0.5, 1.0);

        c.handle_event(MapEvent::PointerDown { at, target });
        c.handle_event(MapEvent::PointerMove { at: dropped });
        c.handle_event(MapEvent::PointerUp { at: dropped });
        c.handle_event(MapEvent::Click {
            at: dropped,
            target,
            modifiers: Modifiers::default(),
        });
        assert_eq!(c.paths().len(), 1);
        assert!(!c.paths().is_building());

        c.handle_event(MapEvent::PointerMove {
            at: Coordinate::new(2.0, 2.0),
        });
        click(&mut c, 2.0, 2.0);
        assert_eq!(c.paths().len(), 2);
    }

    #[test]
    fn test_press_release_in_place_lets_ctrl_click_resume() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        let last = VertexRef::new(0, 2);
        let target = c.surface().circle_for(&c, last);
        let at = Coordinate::new(0.0, 2.0);

        c.surface_mut().updates.clear();
        c.handle_event(MapEvent::PointerDown { at, target });
        c.handle_event(MapEvent::PointerUp { at });
        assert_eq!(c.state(), ControllerState::Measuring);
        assert!(c.surface().panning_enabled);
        assert!(c.surface().updates.is_empty());

        c.handle_event(MapEvent::Click {
            at,
            target,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        });
        assert_eq!(c.paths().active_path_id(), Some(0));

        click(&mut c, 0.0, 3.0);
        assert_eq!(c.paths().path(0).unwrap().len(), 4);
    }

    #[test]
    fn test_drag_rejected_while_building() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0)]);
        click(&mut c, 5.0, 5.0);

        let target = c.surface().circle_for(&c, VertexRef::new(0, 0));
        c.handle_event(MapEvent::PointerDown {
            at: Coordinate::new(0.0, 0.0),
            target,
        });
        assert_eq!(c.state(), ControllerState::Measuring);
        assert!(c.surface().panning_enabled);
    }

    #[test]
    fn test_second_drag_is_ignored() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0)]);
        let first = VertexRef::new(0, 0);
        let second = VertexRef::new(0, 1);

        let target = c.surface().circle_for(&c, first);
        c.handle_event(MapEvent::PointerDown {
            at: Coordinate::new(0.0, 0.0),
            target,
        });
        let target = c.surface().circle_for(&c, second);
        c.handle_event(MapEvent::PointerDown {
            at: Coordinate::new(0.0, 1.0),
            target,
        });

        match c.state() {
            ControllerState::DraggingVertex(drag) => assert_eq!(drag.vertex, first),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_ctrl_click_resumes_from_last_vertex_only() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);

        click_vertex(&mut c, VertexRef::new(0, 1), true);
        assert!(!c.paths().is_building());

        click_vertex(&mut c, VertexRef::new(0, 2), true);
        assert_eq!(c.paths().active_path_id(), Some(0));
        assert!(c.surface().labels().iter().all(|(_, k)| *k == LabelKind::Vertex));

        click(&mut c, 0.0, 3.0);
        let path = c.paths().path(0).unwrap();
        assert_eq!(path.len(), 4);
        assert_approx_eq!(path.total_distance(), 3.0 * 111_195.0, 3.0);
        assert_eq!(c.paths().len(), 1);
    }

    #[test]
    fn test_unit_change_relabels_without_touching_geometry() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0)]);
        let total = c.paths().path(0).unwrap().total_distance();

        c.set_unit(MeasurementUnit::ImperialNautical);
        assert_eq!(c.paths().path(0).unwrap().total_distance(), total);
        let labels = c.surface().labels();
        assert!(labels[0].0.starts_with("60.04 nm"));
    }

    #[test]
    fn test_toggle_arrows_rebuilds_drawables() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        assert_eq!(c.surface().count(|d| matches!(d, Drawable::Arrow { .. })), 2);

        c.set_show_arrows(false);
        assert_eq!(c.surface().count(|d| matches!(d, Drawable::Arrow { .. })), 0);
        assert_eq!(c.surface().count(|d| matches!(d, Drawable::Circle { .. })), 3);
        assert_eq!(c.surface().labels().len(), 2);

        // Circles are re-registered for hit testing.
        let target = c.surface().circle_for(&c, VertexRef::new(0, 2));
        assert!(target.is_some());
    }

    #[test]
    fn test_clear_all_keeps_measuring() {
        let mut c = controller();
        measure_path(&mut c, &[(0.0, 0.0), (0.0, 1.0)]);
        click(&mut c, 3.0, 3.0);
        c.clear_all();

        assert!(c.is_measuring());
        assert!(c.paths().is_empty());
        assert!(c.surface().drawables.is_empty());
        click(&mut c, 4.0, 4.0);
        assert_eq!(c.paths().active_path_id(), Some(0));
    }
}
