// src/sponge/generator.rs

use crate::error::SpongeError;
use crate::sponge::{is_retained, Cube, SubcubeIndex, RETAINED_PER_LEVEL, SUBCUBES_PER_LEVEL};
use crate::utils::geometry::Point3;
use rayon::prelude::*;
use std::iter::FusedIterator;

/// Number of leaf cubes in a sponge of the given depth, `20^depth`.
///
/// Returns `None` when the count does not fit in a `u64` (depth 15 and up).
///
/// ```
/// use menger_sponge::sponge::expected_leaf_count;
///
/// assert_eq!(expected_leaf_count(0), Some(1));
/// assert_eq!(expected_leaf_count(4), Some(160_000));
/// ```
pub fn expected_leaf_count(depth: u32) -> Option<u64> {
    RETAINED_PER_LEVEL.checked_pow(depth)
}

/// Validates the root cube and returns the lazy sequence of its leaf cubes.
///
/// Leaves come out in depth-first order, sub-cube indices enumerated with
/// `i` outermost and `k` innermost at every level.
pub fn leaf_cubes(origin: Point3, size: f64, depth: u32) -> Result<LeafCubes, SpongeError> {
    let root = Cube::new(origin, size)?;
    Ok(LeafCubes::new(root, depth))
}

/// Generates the same sequence as [`leaf_cubes`], materialised, with the
/// top-level subtrees spread over the rayon thread pool.
pub fn par_leaf_cubes(origin: Point3, size: f64, depth: u32) -> Result<Vec<Cube>, SpongeError> {
    let root = Cube::new(origin, size)?;
    if depth == 0 {
        return Ok(vec![root]);
    }

    let children: Vec<Cube> = SubcubeIndex::all()
        .filter(|&index| is_retained(index))
        .map(|index| root.subcube(index))
        .collect();

    Ok(children
        .into_par_iter()
        .flat_map(|child| LeafCubes::new(child, depth - 1).collect::<Vec<_>>())
        .collect())
}

/// One level of the explicit recursion stack.
#[derive(Debug, Clone)]
struct Frame {
    cube: Cube,
    depth: u32,
    /// Next sub-cube ordinal to consider, `0..=27`.
    next: u8,
}

impl Frame {
    fn new(cube: Cube, depth: u32) -> Self {
        Self { cube, depth, next: 0 }
    }

    /// Moves to the next retained sub-cube and returns it.
    fn advance(&mut self) -> Option<Cube> {
        while let Some(index) = SubcubeIndex::from_ordinal(self.next) {
            self.next += 1;
            if is_retained(index) {
                return Some(self.cube.subcube(index));
            }
        }
        None
    }

    /// Leaves still to come from this frame, excluding any child already
    /// pushed above it.
    fn remaining(&self) -> Option<u64> {
        if self.depth == 0 {
            return Some(1);
        }
        let siblings = (self.next..SUBCUBES_PER_LEVEL)
            .filter_map(SubcubeIndex::from_ordinal)
            .filter(|&index| is_retained(index))
            .count() as u64;
        expected_leaf_count(self.depth - 1)?.checked_mul(siblings)
    }
}

/// Stack frames reserved up front; deeper walks grow the stack on demand.
const INITIAL_STACK_FRAMES: usize = 64;

/// Lazy depth-first walk over the leaf cubes of a Menger sponge.
///
/// Auxiliary memory is one frame per level, so arbitrarily deep sponges can
/// be streamed as long as the consumer does not collect them.
#[derive(Debug, Clone)]
pub struct LeafCubes {
    stack: Vec<Frame>,
}

impl LeafCubes {
    /// Starts a walk at an already validated root cube.
    pub fn new(root: Cube, depth: u32) -> Self {
        let capacity = (depth as usize).saturating_add(1).min(INITIAL_STACK_FRAMES);
        let mut stack = Vec::with_capacity(capacity);
        stack.push(Frame::new(root, depth));
        Self { stack }
    }

    fn remaining(&self) -> Option<u64> {
        self.stack
            .iter()
            .try_fold(0u64, |acc, frame| acc.checked_add(frame.remaining()?))
    }
}

impl Iterator for LeafCubes {
    type Item = Cube;

    fn next(&mut self) -> Option<Cube> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.depth == 0 {
                let leaf = frame.cube;
                self.stack.pop();
                return Some(leaf);
            }
            let depth = frame.depth - 1;
            match frame.advance() {
                Some(child) => self.stack.push(Frame::new(child, depth)),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining().and_then(|n| usize::try_from(n).ok()) {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for LeafCubes {}
