// src/render/camera.rs

use crate::utils::geometry::{Point2D, Point3, Vector3};

/// Default camera elevation above the xy plane, in degrees.
pub const DEFAULT_ELEVATION: f64 = 20.0;
/// Default camera azimuth around the z axis, in degrees.
pub const DEFAULT_AZIMUTH: f64 = 30.0;
/// Lower and upper bound of the displayed axis box on every axis.
pub const AXIS_MIN: f64 = 0.0;
pub const AXIS_MAX: f64 = 1.0;

/// Half the axis box diagonal plus a margin, in world units.
const VIEW_RADIUS: f64 = 0.95;

/// A projected point: screen position in pixels plus depth towards the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: Point2D,
    /// Larger is closer to the camera.
    pub depth: f64,
}

/// Orthographic orbit camera looking at the centre of the axis box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub elevation: f64,
    pub azimuth: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            elevation: DEFAULT_ELEVATION,
            azimuth: DEFAULT_AZIMUTH,
        }
    }
}

impl Camera {
    pub fn new(elevation: f64, azimuth: f64) -> Self {
        Self { elevation, azimuth }
    }

    pub fn target() -> Point3 {
        let mid = (AXIS_MIN + AXIS_MAX) / 2.0;
        Point3::new(mid, mid, mid)
    }

    /// Unit vector from the target towards the camera.
    pub fn eye_direction(&self) -> Vector3 {
        let (se, ce) = self.elevation.to_radians().sin_cos();
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        Vector3::new(ce * ca, ce * sa, se)
    }

    /// Screen-right direction in world space.
    pub fn right(&self) -> Vector3 {
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        Vector3::new(-sa, ca, 0.0)
    }

    /// Screen-up direction in world space.
    pub fn up(&self) -> Vector3 {
        -self.right().cross(&self.eye_direction())
    }

    /// Orbits by the given angle deltas. Elevation is kept within ±90°.
    pub fn orbit(&mut self, d_elevation: f64, d_azimuth: f64) {
        self.elevation = (self.elevation + d_elevation).clamp(-90.0, 90.0);
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(360.0);
    }

    /// Pixels per world unit for a viewport of the given size.
    pub fn scale(width: f64, height: f64) -> f64 {
        width.min(height) / (2.0 * VIEW_RADIUS * (AXIS_MAX - AXIS_MIN))
    }

    /// Projects a world point into a `width` x `height` viewport whose
    /// origin is the top-left corner.
    pub fn project(&self, point: Point3, width: f64, height: f64) -> Projected {
        let rel = point - Self::target();
        let scale = Self::scale(width, height);
        Projected {
            screen: Point2D::new(
                width / 2.0 + rel.dot(&self.right()) * scale,
                height / 2.0 - rel.dot(&self.up()) * scale,
            ),
            depth: rel.dot(&self.eye_direction()),
        }
    }

    /// Brightness factor for a face with the given outward normal.
    pub fn shade(&self, normal: Vector3) -> f64 {
        0.6 + 0.4 * normal.dot(&self.eye_direction()).abs()
    }
}
