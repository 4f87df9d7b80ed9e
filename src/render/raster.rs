// src/render/raster.rs

//! Headless software renderer.
//!
//! Leaf cubes are drawn one at a time into a colour buffer guarded by a
//! depth buffer, so the sponge is never held in memory. Each pixel keeps the
//! nearest face; its colour is the shaded fill (or the edge colour near the
//! face outline) blended over the background with the configured opacity.
//! Axis labels and the title are stamped on last with the 8x8 bitmap font.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::render::camera::{Camera, Projected, AXIS_MAX, AXIS_MIN};
use crate::render::mesh::{CubeMesh, Face};
use crate::sponge::Cube;
use crate::utils::geometry::{Line2D, Point2D, Point3};
use crate::utils::util::{blend_rgb, shade_rgb};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};
use log::{debug, info};
use std::path::Path;

/// Pixels per typographic point at 100 dpi.
const PX_PER_POINT: f64 = 100.0 / 72.0;
/// Thinnest edge drawn, in pixels.
const MIN_EDGE_PX: f64 = 0.75;
/// Colour of the axis box outline.
const AXIS_BOX_COLOR: [u8; 3] = [160, 160, 160];
/// Triangles with less screen area than this are skipped.
const DEGENERATE_AREA: f64 = 1e-9;
/// Side of a font8x8 glyph cell, in unscaled pixels.
const GLYPH_PX: i64 = 8;
/// Image side covered per unit of text scale.
const PX_PER_TEXT_SCALE: u32 = 400;
/// Gap between the top edge and the title, in unscaled pixels.
const TITLE_MARGIN: i64 = 4;
/// Distance of an axis label beyond the axis end, in unscaled pixels.
const LABEL_GAP: f64 = 10.0;

pub struct RasterRenderer {
    width: u32,
    height: u32,
    camera: Camera,
    fill: [u8; 3],
    edge: [u8; 3],
    background: [u8; 3],
    alpha: f64,
    edge_px: f64,
    color: Vec<[u8; 3]>,
    depth: Vec<f64>,
    faces_drawn: u64,
}

impl RasterRenderer {
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let pixels = config.width as usize * config.height as usize;
        Ok(Self {
            width: config.width,
            height: config.height,
            camera: config.camera(),
            fill: config.fill_color,
            edge: config.edge_color,
            background: config.background,
            alpha: config.alpha,
            edge_px: (config.edge_width * PX_PER_POINT).max(MIN_EDGE_PX),
            color: vec![config.background; pixels],
            depth: vec![f64::NEG_INFINITY; pixels],
            faces_drawn: 0,
        })
    }

    pub fn faces_drawn(&self) -> u64 {
        self.faces_drawn
    }

    fn project(&self, point: Point3) -> Projected {
        self.camera
            .project(point, self.width as f64, self.height as f64)
    }

    /// Outlines the `[0, 1]` axis box. Faces drawn later cover it.
    pub fn draw_axis_box(&mut self) {
        let corner = Point3::new(AXIS_MIN, AXIS_MIN, AXIS_MIN);
        let Ok(axis_box) = Cube::new(corner, AXIS_MAX - AXIS_MIN) else {
            return;
        };
        let mesh = CubeMesh::from_cube(&axis_box);
        for (a, b) in CubeMesh::edges() {
            let start = self.project(mesh.vertices[a]).screen;
            let end = self.project(mesh.vertices[b]).screen;
            self.draw_background_line(start, end, AXIS_BOX_COLOR);
        }
    }

    /// DDA line that only touches pixels no face has claimed yet.
    fn draw_background_line(&mut self, start: Point2D, end: Point2D, color: [u8; 3]) {
        let steps = (end.x - start.x).abs().max((end.y - start.y).abs()).ceil().max(1.0);
        let n = steps as usize;
        for s in 0..=n {
            let t = s as f64 / steps;
            let x = start.x + (end.x - start.x) * t;
            let y = start.y + (end.y - start.y) * t;
            if let Some(idx) = self.pixel_index(x, y) {
                if self.depth[idx] == f64::NEG_INFINITY {
                    self.color[idx] = color;
                }
            }
        }
    }

    fn pixel_index(&self, x: f64, y: f64) -> Option<usize> {
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn draw_cube(&mut self, cube: &Cube) {
        for face in CubeMesh::from_cube(cube).faces() {
            self.draw_face(&face);
        }
    }

    pub fn draw_face(&mut self, face: &Face) {
        let projected = face.corners.map(|c| self.project(c));
        let outline: [Line2D; 4] = [
            Line2D::new(projected[0].screen, projected[1].screen),
            Line2D::new(projected[1].screen, projected[2].screen),
            Line2D::new(projected[2].screen, projected[3].screen),
            Line2D::new(projected[3].screen, projected[0].screen),
        ];
        let fill = shade_rgb(self.fill, self.camera.shade(face.normal));
        let fill = blend_rgb(fill, self.background, self.alpha);
        let edge = blend_rgb(self.edge, self.background, self.alpha);

        let mut touched = false;
        for tri in [[0, 1, 2], [0, 2, 3]] {
            let verts = tri.map(|i| projected[i]);
            touched |= self.fill_triangle(&verts, &outline, fill, edge);
        }
        if touched {
            self.faces_drawn += 1;
        }
    }

    /// Scan-converts one triangle of a face. Returns whether any pixel won
    /// the depth test.
    fn fill_triangle(
        &mut self,
        verts: &[Projected; 3],
        outline: &[Line2D; 4],
        fill: [u8; 3],
        edge: [u8; 3],
    ) -> bool {
        let [a, b, c] = [verts[0].screen, verts[1].screen, verts[2].screen];
        let area = edge_function(a, b, c);
        if area.abs() < DEGENERATE_AREA {
            return false;
        }

        let max_x = self.width as f64 - 1.0;
        let max_y = self.height as f64 - 1.0;
        let x0 = a.x.min(b.x).min(c.x).floor().clamp(0.0, max_x) as u32;
        let x1 = a.x.max(b.x).max(c.x).ceil().clamp(0.0, max_x) as u32;
        let y0 = a.y.min(b.y).min(c.y).floor().clamp(0.0, max_y) as u32;
        let y1 = a.y.max(b.y).max(c.y).ceil().clamp(0.0, max_y) as u32;

        let mut touched = false;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let p = Point2D::new(px as f64 + 0.5, py as f64 + 0.5);
                let w0 = edge_function(b, c, p) / area;
                let w1 = edge_function(c, a, p) / area;
                let w2 = edge_function(a, b, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let z = w0 * verts[0].depth + w1 * verts[1].depth + w2 * verts[2].depth;
                let idx = py as usize * self.width as usize + px as usize;
                if z <= self.depth[idx] {
                    continue;
                }
                self.depth[idx] = z;
                let near_edge = outline
                    .iter()
                    .any(|line| line.distance_to_point(&p) <= self.edge_px / 2.0);
                self.color[idx] = if near_edge { edge } else { fill };
                touched = true;
            }
        }
        touched
    }

    /// Integer magnification of the bitmap font for this image size.
    pub fn text_scale(&self) -> i64 {
        (self.width.min(self.height) / PX_PER_TEXT_SCALE).max(1) as i64
    }

    /// Black on light backgrounds, white on dark ones.
    pub fn text_color(&self) -> [u8; 3] {
        let [r, g, b] = self.background;
        let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        if luma >= 128.0 {
            [0, 0, 0]
        } else {
            [255, 255, 255]
        }
    }

    /// Stamps `text` with its top-left corner at `(x, y)`, ignoring depth.
    /// Characters outside the font's basic Latin range are left blank.
    pub fn draw_text(&mut self, text: &str, x: i64, y: i64, scale: i64, color: [u8; 3]) {
        let cell = GLYPH_PX * scale;
        for (n, ch) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let left = x + n as i64 * cell;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_PX {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let px = left + col * scale;
                    let py = y + row as i64 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.put_text_pixel(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
    }

    fn put_text_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.color[idx] = color;
    }

    /// Draws `text` centred on `(cx, cy)`.
    fn draw_text_centered(&mut self, text: &str, cx: f64, cy: f64, scale: i64, color: [u8; 3]) {
        let width = text.chars().count() as i64 * GLYPH_PX * scale;
        let height = GLYPH_PX * scale;
        let x = cx.round() as i64 - width / 2;
        let y = cy.round() as i64 - height / 2;
        self.draw_text(text, x, y, scale, color);
    }

    /// Labels the X, Y and Z axes just past their far ends, pushed away from
    /// the origin corner of the axis box.
    pub fn draw_axis_labels(&mut self) {
        let scale = self.text_scale();
        let color = self.text_color();
        let origin = self.project(Point3::new(AXIS_MIN, AXIS_MIN, AXIS_MIN)).screen;
        let axes = [
            ("X", Point3::new(AXIS_MAX, AXIS_MIN, AXIS_MIN)),
            ("Y", Point3::new(AXIS_MIN, AXIS_MAX, AXIS_MIN)),
            ("Z", Point3::new(AXIS_MIN, AXIS_MIN, AXIS_MAX)),
        ];
        for (label, end) in axes {
            let end = self.project(end).screen;
            let run = end.distance_to(&origin);
            let gap = LABEL_GAP * scale as f64;
            let (cx, cy) = if run > 0.0 {
                (
                    end.x + (end.x - origin.x) / run * gap,
                    end.y + (end.y - origin.y) / run * gap,
                )
            } else {
                (end.x, end.y)
            };
            self.draw_text_centered(label, cx, cy, scale, color);
        }
    }

    /// Centres `title` along the top edge.
    pub fn draw_title(&mut self, title: &str) {
        let scale = self.text_scale();
        let color = self.text_color();
        let cx = self.width as f64 / 2.0;
        let cy = ((TITLE_MARGIN + GLYPH_PX / 2) * scale) as f64;
        self.draw_text_centered(title, cx, cy, scale, color);
    }

    pub fn into_image(self) -> RgbImage {
        let width = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(self.color[y as usize * width + x as usize])
        })
    }
}

/// Twice the signed area of the triangle `a, b, p`.
fn edge_function(a: Point2D, b: Point2D, p: Point2D) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Streams `leaves` through a [`RasterRenderer`], labels the axes, puts
/// `title` on top and writes a PNG.
///
/// Returns the number of cubes drawn.
pub fn render_png<I>(
    leaves: I,
    config: &RenderConfig,
    path: &Path,
    title: &str,
) -> Result<u64, RenderError>
where
    I: IntoIterator<Item = Cube>,
{
    let mut renderer = RasterRenderer::new(config)?;
    renderer.draw_axis_box();
    let mut cubes = 0u64;
    for cube in leaves {
        renderer.draw_cube(&cube);
        cubes += 1;
    }
    debug!(
        "Rasterised {} cubes, {} faces visible",
        cubes,
        renderer.faces_drawn()
    );
    renderer.draw_axis_labels();
    renderer.draw_title(title);
    renderer.into_image().save(path)?;
    info!("Wrote {}", path.display());
    Ok(cubes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sponge::leaf_cubes;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 64,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RenderConfig {
            width: 0,
            ..RenderConfig::default()
        };
        assert!(RasterRenderer::new(&config).is_err());
    }

    #[test]
    fn test_empty_scene_is_background() {
        let renderer = RasterRenderer::new(&small_config()).unwrap();
        let image = renderer.into_image();
        assert_eq!(image.dimensions(), (64, 64));
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_cube_covers_centre() {
        let mut renderer = RasterRenderer::new(&small_config()).unwrap();
        renderer.draw_cube(&Cube::unit());
        // At least the three faces turned towards the camera show up.
        assert!(renderer.faces_drawn() >= 3);
        let image = renderer.into_image();
        let centre = image.get_pixel(32, 32).0;
        assert_ne!(centre, [255, 255, 255]);
        // Corners of the image stay background.
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_sponge_has_holes() {
        // Looking straight down the x axis, the face-centre tunnel of a
        // depth-1 sponge shows the background.
        let config = RenderConfig {
            width: 90,
            height: 90,
            elevation: 0.0,
            azimuth: 0.0,
            ..RenderConfig::default()
        };
        let mut renderer = RasterRenderer::new(&config).unwrap();
        for cube in leaf_cubes(Point3::ORIGIN, 1.0, 1).unwrap() {
            renderer.draw_cube(&cube);
        }
        let image = renderer.into_image();
        assert_eq!(image.get_pixel(45, 45).0, [255, 255, 255]);
        assert_ne!(image.get_pixel(45, 30).0, [255, 255, 255]);
    }

    #[test]
    fn test_render_png_writes_file() {
        let path = std::env::temp_dir().join("menger_sponge_raster_test.png");
        let leaves = leaf_cubes(Point3::ORIGIN, 1.0, 1).unwrap();
        let count = render_png(leaves, &small_config(), &path, "depth 1").unwrap();
        assert_eq!(count, 20);
        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (64, 64));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_glyph_pixels_match_font() {
        let mut renderer = RasterRenderer::new(&small_config()).unwrap();
        renderer.draw_text("A", 10, 10, 2, [0, 0, 0]);
        let lit = BASIC_FONTS
            .get('A')
            .unwrap()
            .iter()
            .map(|row| row.count_ones() as usize)
            .sum::<usize>();
        let image = renderer.into_image();
        let black = image.pixels().filter(|p| p.0 == [0, 0, 0]).count();
        // Each font bit becomes a 2x2 block.
        assert_eq!(black, lit * 4);
    }

    #[test]
    fn test_text_is_clipped_at_the_border() {
        let mut renderer = RasterRenderer::new(&small_config()).unwrap();
        renderer.draw_text("WWWWWWWWWWWW", -20, -4, 1, [0, 0, 0]);
        let image = renderer.into_image();
        let lit_per_w = BASIC_FONTS
            .get('W')
            .unwrap()
            .iter()
            .map(|row| row.count_ones() as usize)
            .sum::<usize>();
        let black = image.pixels().filter(|p| p.0 == [0, 0, 0]).count();
        assert!(black > 0);
        assert!(black < 12 * lit_per_w);
    }

    #[test]
    fn test_unknown_characters_are_blank() {
        let mut renderer = RasterRenderer::new(&small_config()).unwrap();
        renderer.draw_text("\u{2603}", 30, 30, 1, [0, 0, 0]);
        let image = renderer.into_image();
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_title_band_is_drawn() {
        let config = RenderConfig {
            width: 320,
            height: 320,
            ..RenderConfig::default()
        };
        let mut renderer = RasterRenderer::new(&config).unwrap();
        renderer.draw_axis_box();
        renderer.draw_title("Menger Sponge (depth = 2)");
        let image = renderer.into_image();
        let band = (TITLE_MARGIN + GLYPH_PX) as u32;
        let text_pixels = (0..band)
            .flat_map(|y| (0..320).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y).0 == [0, 0, 0])
            .count();
        assert!(text_pixels > 0);
    }

    #[test]
    fn test_axis_labels_sit_past_axis_ends() {
        let config = RenderConfig {
            width: 320,
            height: 320,
            ..RenderConfig::default()
        };
        let mut renderer = RasterRenderer::new(&config).unwrap();
        let z_end = renderer.project(Point3::new(AXIS_MIN, AXIS_MIN, AXIS_MAX)).screen;
        renderer.draw_axis_labels();
        let image = renderer.into_image();
        let black: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == [0, 0, 0])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!black.is_empty());
        // The Z label is above the top of the Z axis.
        assert!(black
            .iter()
            .any(|&(x, y)| (y as f64) < z_end.y && (x as f64 - z_end.x).abs() < 8.0));
    }

    #[test]
    fn test_text_color_follows_background() {
        let dark = RenderConfig {
            background: [10, 10, 30],
            ..small_config()
        };
        assert_eq!(RasterRenderer::new(&small_config()).unwrap().text_color(), [0, 0, 0]);
        assert_eq!(RasterRenderer::new(&dark).unwrap().text_color(), [255, 255, 255]);
    }
}
