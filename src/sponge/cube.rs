// src/sponge/cube.rs

use crate::error::SpongeError;
use crate::sponge::{DIVISIONS, SUBCUBES_PER_LEVEL};
use crate::utils::geometry::{Point3, Vector3};

/// An axis-aligned cube given by its lower-left-front corner and edge length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    origin: Point3,
    size: f64,
}

impl Cube {
    /// Creates a cube, rejecting non-positive or non-finite sizes and
    /// non-finite origins.
    pub fn new(origin: Point3, size: f64) -> Result<Self, SpongeError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(SpongeError::InvalidGeometry { size });
        }
        if !origin.is_finite() {
            return Err(SpongeError::InvalidOrigin {
                x: origin.x,
                y: origin.y,
                z: origin.z,
            });
        }
        Ok(Self { origin, size })
    }

    /// The unit cube at the world origin.
    pub fn unit() -> Self {
        Self {
            origin: Point3::ORIGIN,
            size: 1.0,
        }
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// The corner opposite the origin.
    pub fn max_corner(&self) -> Point3 {
        self.origin + Vector3::new(self.size, self.size, self.size)
    }

    /// Returns the sub-cube at `index` of the 3x3x3 partition.
    ///
    /// Its edge is a third of this cube's and its origin sits at
    /// `origin + index * new_size` on each axis.
    pub fn subcube(&self, index: SubcubeIndex) -> Cube {
        let new_size = self.size / DIVISIONS as f64;
        let offset = Vector3::new(
            index.i as f64 * new_size,
            index.j as f64 * new_size,
            index.k as f64 * new_size,
        );
        Cube {
            origin: self.origin + offset,
            size: new_size,
        }
    }

    /// True if `other` lies inside this cube, allowing `tolerance` of slack.
    pub fn contains(&self, other: &Cube, tolerance: f64) -> bool {
        let (lo, hi) = (self.origin, self.max_corner());
        let (olo, ohi) = (other.origin, other.max_corner());
        olo.x >= lo.x - tolerance
            && olo.y >= lo.y - tolerance
            && olo.z >= lo.z - tolerance
            && ohi.x <= hi.x + tolerance
            && ohi.y <= hi.y + tolerance
            && ohi.z <= hi.z + tolerance
    }
}

/// Position of a sub-cube within the 3x3x3 partition of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubcubeIndex {
    pub i: u8,
    pub j: u8,
    pub k: u8,
}

impl SubcubeIndex {
    /// Builds an index, or `None` if any component is outside `0..3`.
    pub fn new(i: u8, j: u8, k: u8) -> Option<Self> {
        if i < DIVISIONS && j < DIVISIONS && k < DIVISIONS {
            Some(Self { i, j, k })
        } else {
            None
        }
    }

    /// Maps `0..27` onto indices with `i` outermost and `k` innermost.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        if ordinal >= SUBCUBES_PER_LEVEL {
            return None;
        }
        Some(Self {
            i: ordinal / (DIVISIONS * DIVISIONS),
            j: (ordinal / DIVISIONS) % DIVISIONS,
            k: ordinal % DIVISIONS,
        })
    }

    /// All 27 indices in enumeration order.
    pub fn all() -> impl Iterator<Item = SubcubeIndex> {
        (0..SUBCUBES_PER_LEVEL).filter_map(SubcubeIndex::from_ordinal)
    }

    /// Number of components equal to 1, i.e. lying on a middle slab.
    pub fn middle_count(&self) -> usize {
        [self.i, self.j, self.k].iter().filter(|&&c| c == 1).count()
    }
}

/// Retention predicate: keep a sub-cube iff at most one index component is 1.
///
/// This drops the body centre and the six face centres, keeping the 8
/// corners and 12 edges.
///
/// ```
/// use menger_sponge::sponge::{is_retained, SubcubeIndex};
///
/// let corner = SubcubeIndex::new(0, 2, 0).unwrap();
/// let centre = SubcubeIndex::new(1, 1, 1).unwrap();
/// assert!(is_retained(corner));
/// assert!(!is_retained(centre));
/// ```
pub fn is_retained(index: SubcubeIndex) -> bool {
    index.middle_count() <= 1
}
