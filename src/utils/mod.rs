// src/utils/mod.rs
pub mod geometry;
pub mod util;

pub use geometry::{Line2D, Point2D, Point3, Vector3};
