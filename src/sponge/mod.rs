// src/sponge/mod.rs
pub mod cube;
pub mod generator;

pub use cube::{is_retained, Cube, SubcubeIndex};
pub use generator::{expected_leaf_count, leaf_cubes, par_leaf_cubes, LeafCubes};

/// Sub-cubes per axis at each subdivision step.
pub const DIVISIONS: u8 = 3;
/// Sub-cubes produced by one subdivision, before filtering.
pub const SUBCUBES_PER_LEVEL: u8 = DIVISIONS * DIVISIONS * DIVISIONS;
/// Sub-cubes kept by the retention predicate at each level.
pub const RETAINED_PER_LEVEL: u64 = 20;
/// Tolerance for floating-point comparisons of cube geometry.
pub const EPSILON: f64 = 1e-9;
