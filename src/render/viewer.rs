//! # Sponge Viewer
//!
//! Interactive eframe/egui window for a generated sponge. Faces are painted
//! back to front with the configured fill, edge colour and opacity.
//! Dragging the canvas orbits the camera; the side panel exposes the camera
//! angles and a view reset. The window title and heading carry the depth.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::render::camera::{Camera, AXIS_MAX, AXIS_MIN};
use crate::render::mesh::{CubeMesh, Face};
use crate::render::title;
use crate::sponge::Cube;
use crate::utils::geometry::Point3;
use eframe::egui;
use egui::{CentralPanel, Color32, Pos2, SidePanel, Stroke, TopBottomPanel};
use log::{debug, info};

/// Degrees of orbit per dragged pixel.
const DRAG_SENSITIVITY: f64 = 0.4;

/// Viewer state: the materialised faces plus the camera.
pub struct SpongeViewer {
    depth: u32,
    leaf_count: usize,
    faces: Vec<Face>,
    /// Face indices sorted far to near for `sorted_for`.
    draw_order: Vec<usize>,
    sorted_for: Option<Camera>,
    /// Face polygons in paint order, valid for `shapes_for`.
    shapes: Vec<egui::Shape>,
    shapes_for: Option<(Camera, egui::Rect)>,
    rebuilds: usize,
    camera: Camera,
    home: Camera,
    fill: Color32,
    edge: Color32,
    background: Color32,
    edge_width: f32,
}

impl SpongeViewer {
    pub fn new(leaves: &[Cube], depth: u32, config: &RenderConfig) -> Self {
        let faces: Vec<Face> = leaves
            .iter()
            .flat_map(|cube| CubeMesh::from_cube(cube).faces())
            .collect();
        debug!("Viewer holds {} faces", faces.len());
        let alpha = (config.alpha * 255.0).round() as u8;
        let [fr, fg, fb] = config.fill_color;
        let [er, eg, eb] = config.edge_color;
        let [br, bg, bb] = config.background;
        Self {
            depth,
            leaf_count: leaves.len(),
            draw_order: (0..faces.len()).collect(),
            faces,
            sorted_for: None,
            shapes: Vec::new(),
            shapes_for: None,
            rebuilds: 0,
            camera: config.camera(),
            home: config.camera(),
            fill: Color32::from_rgba_unmultiplied(fr, fg, fb, alpha),
            edge: Color32::from_rgba_unmultiplied(er, eg, eb, alpha),
            background: Color32::from_rgb(br, bg, bb),
            edge_width: config.edge_width as f32,
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Re-sorts faces by view depth, far first, when the camera moved.
    fn sort_faces(&mut self) {
        if self.sorted_for == Some(self.camera) {
            return;
        }
        let eye = self.camera.eye_direction();
        let target = Camera::target();
        let keys: Vec<f64> = self
            .faces
            .iter()
            .map(|face| (face.center() - target).dot(&eye))
            .collect();
        self.draw_order
            .sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        self.sorted_for = Some(self.camera);
    }

    /// Face indices in paint order for the current camera.
    pub fn paint_order(&mut self) -> &[usize] {
        self.sort_faces();
        &self.draw_order
    }

    fn to_pos(&self, point: Point3, rect: egui::Rect) -> Pos2 {
        let p = self
            .camera
            .project(point, rect.width() as f64, rect.height() as f64);
        Pos2::new(
            rect.min.x + p.screen.x as f32,
            rect.min.y + p.screen.y as f32,
        )
    }

    fn draw_axes(&self, painter: &egui::Painter, rect: egui::Rect) {
        let stroke = Stroke::new(1.0, Color32::GRAY);
        let origin = Point3::new(AXIS_MIN, AXIS_MIN, AXIS_MIN);
        let axes = [
            ("X", Point3::new(AXIS_MAX, AXIS_MIN, AXIS_MIN)),
            ("Y", Point3::new(AXIS_MIN, AXIS_MAX, AXIS_MIN)),
            ("Z", Point3::new(AXIS_MIN, AXIS_MIN, AXIS_MAX)),
        ];
        let start = self.to_pos(origin, rect);
        for (label, end) in axes {
            let end_pos = self.to_pos(end, rect);
            painter.line_segment([start, end_pos], stroke);
            painter.text(
                end_pos + (end_pos - start).normalized() * 12.0,
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(14.0),
                Color32::DARK_GRAY,
            );
        }
    }

    /// Face polygons for `rect`, rebuilt only when the camera or the canvas
    /// changed since the last frame.
    fn shapes(&mut self, rect: egui::Rect) -> &[egui::Shape] {
        if self.shapes_for != Some((self.camera, rect)) {
            self.sort_faces();
            let stroke = Stroke::new(self.edge_width, self.edge);
            let shapes: Vec<egui::Shape> = self
                .draw_order
                .iter()
                .map(|&i| {
                    let face = &self.faces[i];
                    let points = face.corners.iter().map(|&c| self.to_pos(c, rect)).collect();
                    egui::Shape::convex_polygon(points, self.fill, stroke)
                })
                .collect();
            self.shapes = shapes;
            self.shapes_for = Some((self.camera, rect));
            self.rebuilds += 1;
            debug!("Rebuilt {} face shapes", self.shapes.len());
        }
        &self.shapes
    }

    fn draw_faces(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let shapes = self.shapes(rect).to_vec();
        painter.extend(shapes);
    }

    /// Draws the complete UI layout.
    pub fn update(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("title").show(ctx, |ui| {
            ui.heading(title(self.depth));
        });

        SidePanel::left("camera_panel").show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.heading("Camera");
                ui.add(egui::Slider::new(&mut self.camera.elevation, -90.0..=90.0).text("Elevation"));
                ui.add(egui::Slider::new(&mut self.camera.azimuth, 0.0..=360.0).text("Azimuth"));
                if ui.button("Reset View").clicked() {
                    self.camera = self.home;
                }
            });
        });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Leaf cubes: {}   Faces: {}",
                    self.leaf_count,
                    self.faces.len()
                ));
            });
        });

        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.background))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::drag());
                if response.dragged() {
                    let delta = response.drag_delta();
                    self.camera.orbit(
                        delta.y as f64 * DRAG_SENSITIVITY,
                        -(delta.x as f64) * DRAG_SENSITIVITY,
                    );
                }
                let rect = response.rect;
                self.draw_axes(&painter, rect);
                self.draw_faces(&painter, rect);
            });
    }
}

struct SpongeViewerApp {
    viewer: SpongeViewer,
}

impl eframe::App for SpongeViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.viewer.update(ctx);
    }
}

/// Opens the viewer window and blocks until it is closed.
pub fn run_viewer(viewer: SpongeViewer, config: &RenderConfig) -> Result<(), RenderError> {
    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(config.width as f32, config.height as f32)),
        ..Default::default()
    };
    let window_title = title(viewer.depth);
    info!("Opening viewer window: {}", window_title);
    eframe::run_native(
        &window_title,
        native_options,
        Box::new(|_cc| Box::new(SpongeViewerApp { viewer })),
    );
    info!("Viewer window closed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sponge::leaf_cubes;

    fn viewer(depth: u32) -> SpongeViewer {
        let leaves: Vec<_> = leaf_cubes(Point3::ORIGIN, 1.0, depth).unwrap().collect();
        SpongeViewer::new(&leaves, depth, &RenderConfig::default())
    }

    #[test]
    fn test_six_faces_per_leaf() {
        assert_eq!(viewer(1).face_count(), 120);
    }

    #[test]
    fn test_paint_order_is_back_to_front() {
        let mut v = viewer(1);
        let eye = v.camera.eye_direction();
        let target = Camera::target();
        let order = v.paint_order().to_vec();
        assert_eq!(order.len(), 120);
        let depths: Vec<f64> = order
            .iter()
            .map(|&i| (v.faces[i].center() - target).dot(&eye))
            .collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_shapes_reused_until_view_changes() {
        let mut v = viewer(1);
        let rect = egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(400.0, 400.0));
        assert_eq!(v.shapes(rect).len(), 120);
        assert_eq!(v.shapes(rect).len(), 120);
        assert_eq!(v.rebuilds, 1);

        v.camera.orbit(5.0, 0.0);
        v.shapes(rect);
        assert_eq!(v.rebuilds, 2);

        let wider = egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(600.0, 400.0));
        v.shapes(wider);
        assert_eq!(v.rebuilds, 3);
    }

    #[test]
    fn test_resort_after_orbit() {
        let mut v = viewer(1);
        let before = v.paint_order().to_vec();
        v.camera.orbit(0.0, 180.0);
        let after = v.paint_order().to_vec();
        assert_ne!(before, after);
    }
}
