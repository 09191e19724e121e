// src/ui/map_surface.rs
//! An egui-painted [`MapSurface`] in plate carrée: one degree is `zoom`
//! pixels on both axes and `pan` is where (0°, 0°) sits on screen.

use std::collections::BTreeMap;
use std::sync::Arc;

use eframe::egui::{
    self, Color32, FontId, Galley, Painter, Pos2, Rect, Shape, Stroke, Vec2,
};

use crate::config::{parse_hex_color, ArrowStyle, CircleStyle, LineStyle};
use crate::editor::{Drawable, DrawableId, DrawableLayer, LabelKind, MapSurface, ScreenPoint};
use crate::map::Coordinate;

/// Extra pixels around a vertex circle that still count as a hit.
const HIT_SLOP: f32 = 4.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 50_000.0;

pub struct EguiSurface {
    next_id: u64,
    drawables: BTreeMap<DrawableId, Drawable>,
    zoom: f32,
    pan: Vec2,
    centered: bool,
    panning_enabled: bool,
    measuring_cursor: bool,
}

impl Default for EguiSurface {
    fn default() -> Self {
        Self {
            next_id: 0,
            drawables: BTreeMap::new(),
            zoom: 4.0,
            pan: Vec2::ZERO,
            centered: false,
            panning_enabled: true,
            measuring_cursor: false,
        }
    }
}

impl EguiSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panning_enabled(&self) -> bool {
        self.panning_enabled
    }

    pub fn measuring_cursor(&self) -> bool {
        self.measuring_cursor
    }

    /// Puts (0°, 0°) in the middle of `rect` the first time a viewport is known.
    pub fn center_once(&mut self, rect: Rect) {
        if !self.centered {
            self.pan = rect.center().to_vec2();
            self.centered = true;
        }
    }

    /// Zooms by `factor` keeping the point under `pointer` fixed.
    pub fn zoom_at(&mut self, pointer: Pos2, factor: f32) {
        let before = self.to_coordinate_unwrapped(pointer);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer.to_vec2() - Vec2::new(before.x * self.zoom, -before.y * self.zoom);
    }

    /// Moves the map by a screen delta, unless panning is switched off.
    pub fn pan_by(&mut self, delta: Vec2) {
        if self.panning_enabled {
            self.pan += delta;
        }
    }

    pub fn to_screen(&self, coordinate: Coordinate) -> Pos2 {
        Pos2::new(
            coordinate.lng as f32 * self.zoom + self.pan.x,
            -coordinate.lat as f32 * self.zoom + self.pan.y,
        )
    }

    pub fn to_coordinate(&self, pos: Pos2) -> Coordinate {
        let p = self.to_coordinate_unwrapped(pos);
        Coordinate::new(p.y as f64, p.x as f64)
    }

    /// Screen to (lng, lat) without clamping.
    fn to_coordinate_unwrapped(&self, pos: Pos2) -> Pos2 {
        Pos2::new(
            (pos.x - self.pan.x) / self.zoom,
            -(pos.y - self.pan.y) / self.zoom,
        )
    }

    /// The topmost vertex circle under `pos`.
    pub fn hit_test(&self, pos: Pos2) -> Option<DrawableId> {
        self.drawables.iter().rev().find_map(|(id, d)| match d {
            Drawable::Circle { center, style } => {
                let reach = style.radius + style.weight + HIT_SLOP;
                (self.to_screen(*center).distance(pos) <= reach).then_some(*id)
            }
            _ => None,
        })
    }

    /// Paints lines first, then arrows, circles and labels on top.
    pub fn paint(&self, painter: &Painter) {
        for d in self.drawables.values() {
            if let Drawable::Polyline { points, style } = d {
                self.paint_polyline(painter, points, style);
            }
        }
        for d in self.drawables.values() {
            if let Drawable::Arrow {
                anchor,
                rotation,
                style,
            } = d
            {
                self.paint_arrow(painter, *anchor, *rotation, style);
            }
        }
        for d in self.drawables.values() {
            if let Drawable::Circle { center, style } = d {
                self.paint_circle(painter, *center, style);
            }
        }
        for d in self.drawables.values() {
            if let Drawable::Label { anchor, text, kind } = d {
                self.paint_label(painter, *anchor, text, *kind);
            }
        }
    }

    /// Draws a 10° graticule and the map edges.
    pub fn paint_graticule(&self, painter: &Painter, rect: Rect) {
        let stroke = Stroke::new(1.0, Color32::from_gray(60));
        let edge = Stroke::new(1.5, Color32::from_gray(110));

        for step in -18i32..=18 {
            let lng = step as f64 * 10.0;
            let top = self.to_screen(Coordinate::unwrapped(90.0, lng));
            let bottom = self.to_screen(Coordinate::unwrapped(-90.0, lng));
            if top.x >= rect.left() && top.x <= rect.right() {
                let s = if step.abs() == 18 { edge } else { stroke };
                painter.line_segment([top, bottom], s);
            }
        }
        for step in -9i32..=9 {
            let lat = step as f64 * 10.0;
            let left = self.to_screen(Coordinate::unwrapped(lat, -180.0));
            let right = self.to_screen(Coordinate::unwrapped(lat, 180.0));
            if left.y >= rect.top() && left.y <= rect.bottom() {
                let s = if step.abs() == 9 { edge } else { stroke };
                painter.line_segment([left, right], s);
            }
        }
    }

    fn paint_polyline(&self, painter: &Painter, points: &[Coordinate], style: &LineStyle) {
        let screen: Vec<Pos2> = points.iter().map(|c| self.to_screen(*c)).collect();
        let stroke = Stroke::new(style.weight, color(&style.color, 1.0));
        if style.dashed {
            painter.extend(Shape::dashed_line(&screen, stroke, 8.0, 6.0));
        } else {
            painter.add(Shape::line(screen, stroke));
        }
    }

    fn paint_circle(&self, painter: &Painter, center: Coordinate, style: &CircleStyle) {
        painter.circle(
            self.to_screen(center),
            style.radius,
            color(&style.fill_color, style.fill_opacity),
            Stroke::new(style.weight, color(&style.color, 1.0)),
        );
    }

    fn paint_arrow(&self, painter: &Painter, anchor: Coordinate, rotation: f64, style: &ArrowStyle) {
        let tip = self.to_screen(anchor);
        // Compass bearing to screen direction; screen y grows southwards.
        let angle = (rotation as f32).to_radians();
        let forward = Vec2::new(angle.sin(), -angle.cos());
        let side = Vec2::new(-forward.y, forward.x);
        let size = style.size;

        let points = vec![
            tip + forward * size * 0.5,
            tip - forward * size * 0.5 + side * size * 0.4,
            tip - forward * size * 0.5 - side * size * 0.4,
        ];
        painter.add(Shape::convex_polygon(
            points,
            color(&style.color, 1.0),
            Stroke::NONE,
        ));
    }

    fn paint_label(&self, painter: &Painter, anchor: Coordinate, text: &str, kind: LabelKind) {
        let (background, foreground) = match kind {
            LabelKind::Vertex => (Color32::from_rgba_unmultiplied(255, 255, 255, 220), Color32::BLACK),
            LabelKind::End => (Color32::from_rgb(255, 220, 200), Color32::BLACK),
            LabelKind::Live => (Color32::from_rgba_unmultiplied(0, 0, 80, 200), Color32::WHITE),
        };
        let galley: Arc<Galley> =
            painter.layout_no_wrap(text.to_string(), FontId::proportional(12.0), foreground);

        let pos = self.to_screen(anchor) + Vec2::new(10.0, 10.0);
        let rect = Rect::from_min_size(pos, galley.size()).expand(3.0);
        painter.rect_filled(rect, 3.0, background);
        painter.galley(pos, galley);
    }
}

/// Option colour with opacity, falling back to grey for unparsable strings.
fn color(hex: &str, opacity: f32) -> Color32 {
    let [r, g, b] = parse_hex_color(hex).unwrap_or([128, 128, 128]);
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

impl DrawableLayer for EguiSurface {
    fn add(&mut self, drawable: Drawable) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.drawables.insert(id, drawable);
        id
    }

    fn update(&mut self, id: DrawableId, drawable: Drawable) {
        if let Some(slot) = self.drawables.get_mut(&id) {
            *slot = drawable;
        }
    }

    fn remove(&mut self, id: DrawableId) {
        self.drawables.remove(&id);
    }
}

impl MapSurface for EguiSurface {
    fn set_panning_enabled(&mut self, enabled: bool) {
        self.panning_enabled = enabled;
    }

    fn set_measuring_cursor(&mut self, active: bool) {
        self.measuring_cursor = active;
    }

    fn project(&self, coordinate: Coordinate) -> ScreenPoint {
        let p = self.to_screen(coordinate);
        ScreenPoint { x: p.x, y: p.y }
    }
}

/// Cursor to show over the map.
pub fn cursor_icon(surface: &EguiSurface) -> egui::CursorIcon {
    if !surface.panning_enabled() {
        egui::CursorIcon::Grabbing
    } else if surface.measuring_cursor() {
        egui::CursorIcon::Crosshair
    } else {
        egui::CursorIcon::Default
    }
}
