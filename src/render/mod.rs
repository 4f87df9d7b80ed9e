// src/render/mod.rs
pub mod camera;
pub mod mesh;
pub mod raster;
#[cfg(feature = "gui")]
pub mod viewer;

pub use camera::Camera;
pub use mesh::{CubeMesh, Face};
pub use raster::{render_png, RasterRenderer};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::sponge::{expected_leaf_count, leaf_cubes};
use crate::utils::geometry::Point3;
use log::{debug, info, warn};

/// Depth from which rendering gets noticeably slow.
pub const SLOW_DEPTH: u32 = 5;
/// Largest sponge the interactive viewer will show, in leaf cubes (depth 3).
/// egui tessellates every face each frame it repaints, so deeper sponges go
/// to PNG.
pub const MAX_VIEWER_LEAVES: u64 = 8_000;

/// Plot title for a sponge of the given depth.
///
/// ```
/// assert_eq!(menger_sponge::render::title(3), "Menger Sponge (depth = 3)");
/// ```
pub fn title(depth: u32) -> String {
    format!("Menger Sponge (depth = {})", depth)
}

/// Where a sponge of a given depth ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Window,
    Png,
}

/// Picks the output: an explicit `output` path, a headless build or a sponge
/// too large for the viewer all go to PNG.
pub fn choose_target(config: &RenderConfig, depth: u32) -> Target {
    if config.output.is_some() || !cfg!(feature = "gui") || cfg!(feature = "headless") {
        return Target::Png;
    }
    match expected_leaf_count(depth) {
        Some(count) if count <= MAX_VIEWER_LEAVES => Target::Window,
        _ => {
            warn!(
                "Depth {} exceeds the interactive viewer limit of {} cubes; rendering to PNG instead",
                depth, MAX_VIEWER_LEAVES
            );
            Target::Png
        }
    }
}

/// Generates the unit-cube sponge of `depth` and presents it.
pub fn render(depth: u32, config: &RenderConfig) -> Result<(), RenderError> {
    config.validate()?;
    debug!("Camera {:?}, image {}x{}", config.camera(), config.width, config.height);
    if depth >= SLOW_DEPTH {
        warn!(
            "Depth {} produces {} leaf cubes; rendering will take a while",
            depth,
            expected_leaf_count(depth).map_or_else(|| "too many".to_owned(), |n| n.to_string())
        );
    }

    match choose_target(config, depth) {
        Target::Png => {
            let path = config.output_path(depth);
            let leaves = leaf_cubes(Point3::ORIGIN, 1.0, depth)?;
            let heading = title(depth);
            let drawn = render_png(leaves, config, &path, &heading)?;
            info!("{}: {} cubes rendered to {}", heading, drawn, path.display());
            Ok(())
        }
        Target::Window => show_window(depth, config),
    }
}

#[cfg(feature = "gui")]
fn show_window(depth: u32, config: &RenderConfig) -> Result<(), RenderError> {
    let leaves = crate::sponge::par_leaf_cubes(Point3::ORIGIN, 1.0, depth)?;
    info!("Generated {} leaf cubes", leaves.len());
    let viewer = viewer::SpongeViewer::new(&leaves, depth, config);
    viewer::run_viewer(viewer, config)
}

#[cfg(not(feature = "gui"))]
fn show_window(_depth: u32, _config: &RenderConfig) -> Result<(), RenderError> {
    Err(RenderError::Gui(
        "built without the `gui` feature".to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_explicit_output_forces_png() {
        let config = RenderConfig {
            output: Some(PathBuf::from("sponge.png")),
            ..RenderConfig::default()
        };
        assert_eq!(choose_target(&config, 1), Target::Png);
    }

    #[test]
    fn test_large_depth_goes_to_png() {
        assert_eq!(choose_target(&RenderConfig::default(), 4), Target::Png);
        assert_eq!(choose_target(&RenderConfig::default(), 5), Target::Png);
        assert_eq!(choose_target(&RenderConfig::default(), 40), Target::Png);
    }

    #[test]
    fn test_small_depth_target_follows_features() {
        let expected = if cfg!(feature = "gui") && !cfg!(feature = "headless") {
            Target::Window
        } else {
            Target::Png
        };
        assert_eq!(choose_target(&RenderConfig::default(), 2), expected);
        assert_eq!(choose_target(&RenderConfig::default(), 3), expected);
    }

    #[test]
    fn test_render_to_file() {
        let path = std::env::temp_dir().join("menger_sponge_render_test.png");
        let config = RenderConfig {
            width: 48,
            height: 48,
            output: Some(path.clone()),
            ..RenderConfig::default()
        };
        render(2, &config).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
