use eframe::egui;
use kmlview_core::geom::{BBox2, Vec2 as GeoVec2};
use kmlview_core::model::{FeatureCollection, Geometry, Position};

const POINT_RADIUS: f32 = 3.5;

/// Pan/zoom canvas that draws a feature collection in raw lon/lat space.
pub struct MapView {
    zoom: f32,
    pan: egui::Vec2,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
        }
    }
}

impl MapView {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self, ui: &mut egui::Ui, collection: Option<&FeatureCollection>) {
        let Some(collection) = collection else {
            ui.label("No KML loaded.");
            return;
        };
        let Some(extents) = collection.extents() else {
            ui.label("No geometry to display.");
            return;
        };

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, egui::CornerRadius::same(0), egui::Color32::from_gray(245));

        if response.dragged() {
            self.pan += response.drag_delta();
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.0 {
                let factor = (scroll / 200.0).exp();
                self.zoom = (self.zoom * factor).clamp(0.1, 50.0);
            }
        }

        let tx = WorldToScreen::new(rect, extents, self.pan, self.zoom);
        for (idx, geometry) in collection
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .enumerate()
        {
            draw_geometry(&painter, &tx, geometry, feature_color(idx));
        }
    }
}

fn draw_geometry(
    painter: &egui::Painter,
    tx: &WorldToScreen,
    geometry: &Geometry,
    color: egui::Color32,
) {
    let stroke = egui::Stroke::new(2.0, color);
    match geometry {
        Geometry::Point { coordinates } => {
            if let Some(p) = tx.position(coordinates) {
                painter.circle_filled(p, POINT_RADIUS, color);
            }
        }
        Geometry::LineString { coordinates } => {
            let pts = tx.positions(coordinates);
            if pts.len() >= 2 {
                painter.add(egui::Shape::line(pts, stroke));
            }
        }
        Geometry::Polygon { coordinates } => {
            for ring in coordinates {
                let pts = tx.positions(ring);
                if pts.len() >= 3 {
                    painter.add(egui::Shape::closed_line(pts, stroke));
                }
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                draw_geometry(painter, tx, g, color);
            }
        }
    }
}

fn feature_color(idx: usize) -> egui::Color32 {
    const PALETTE: [egui::Color32; 6] = [
        egui::Color32::from_rgb(0x31, 0x8B, 0xBD),
        egui::Color32::from_rgb(0xE3, 0x4A, 0x33),
        egui::Color32::from_rgb(0x31, 0xA3, 0x54),
        egui::Color32::from_rgb(0x75, 0x6B, 0xB1),
        egui::Color32::from_rgb(0xFD, 0x8D, 0x3C),
        egui::Color32::from_rgb(0x63, 0x63, 0x63),
    ];
    PALETTE[idx % PALETTE.len()]
}

#[derive(Debug, Clone, Copy)]
struct WorldToScreen {
    rect: egui::Rect,
    center: GeoVec2,
    scale: f32,
    pan: egui::Vec2,
}

impl WorldToScreen {
    fn new(rect: egui::Rect, world: BBox2, pan: egui::Vec2, zoom: f32) -> Self {
        let center = world.center();
        let span = world.span();
        // A lone point has zero extent.
        let world_w = span.x.max(1e-3) as f32;
        let world_h = span.y.max(1e-3) as f32;
        let sx = rect.width() / world_w;
        let sy = rect.height() / world_h;
        let scale = (sx.min(sy) * 0.9).max(1e-3) * zoom;
        Self {
            rect,
            center,
            scale,
            pan,
        }
    }

    fn point(&self, p: GeoVec2) -> egui::Pos2 {
        let dx = (p.x - self.center.x) as f32;
        let dy = (p.y - self.center.y) as f32;
        let x = self.rect.center().x + self.pan.x + dx * self.scale;
        // Latitude grows north, screen y grows down.
        let y = self.rect.center().y + self.pan.y - dy * self.scale;
        egui::pos2(x, y)
    }

    fn position(&self, position: &[f64]) -> Option<egui::Pos2> {
        GeoVec2::from_position(position).map(|p| self.point(p))
    }

    fn positions(&self, positions: &[Position]) -> Vec<egui::Pos2> {
        positions.iter().filter_map(|p| self.position(p)).collect()
    }
}
