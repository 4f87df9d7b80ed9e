// src/render/mesh.rs

use crate::sponge::Cube;
use crate::utils::geometry::{Point3, Vector3};

/// Corner indices of the six faces: bottom, top, front, back, right, left.
pub const FACE_INDICES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [1, 2, 6, 5],
    [0, 3, 7, 4],
];

const FACE_NORMALS: [(f64, f64, f64); 6] = [
    (0.0, 0.0, -1.0),
    (0.0, 0.0, 1.0),
    (0.0, -1.0, 0.0),
    (0.0, 1.0, 0.0),
    (1.0, 0.0, 0.0),
    (-1.0, 0.0, 0.0),
];

/// A quadrilateral cube face with its outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub corners: [Point3; 4],
    pub normal: Vector3,
}

impl Face {
    pub fn center(&self) -> Point3 {
        let sum = self
            .corners
            .iter()
            .fold(Vector3::default(), |acc, &c| acc + (c - Point3::ORIGIN));
        Point3::ORIGIN + sum * 0.25
    }
}

/// The 8 corners of a cube, ordered so that 0..4 is the bottom ring and
/// 4..8 the top ring, both counter-clockwise seen from above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeMesh {
    pub vertices: [Point3; 8],
}

impl CubeMesh {
    pub fn from_cube(cube: &Cube) -> Self {
        let Point3 { x, y, z } = cube.origin();
        let s = cube.size();
        Self {
            vertices: [
                Point3::new(x, y, z),
                Point3::new(x + s, y, z),
                Point3::new(x + s, y + s, z),
                Point3::new(x, y + s, z),
                Point3::new(x, y, z + s),
                Point3::new(x + s, y, z + s),
                Point3::new(x + s, y + s, z + s),
                Point3::new(x, y + s, z + s),
            ],
        }
    }

    pub fn faces(&self) -> [Face; 6] {
        let mut faces = [Face {
            corners: [Point3::ORIGIN; 4],
            normal: Vector3::default(),
        }; 6];
        for (face, (indices, &(nx, ny, nz))) in faces
            .iter_mut()
            .zip(FACE_INDICES.iter().zip(FACE_NORMALS.iter()))
        {
            face.corners = (*indices).map(|i| self.vertices[i]);
            face.normal = Vector3::new(nx, ny, nz);
        }
        faces
    }

    /// The 12 edges as vertex index pairs.
    pub fn edges() -> [(usize, usize); 12] {
        [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ]
    }
}
