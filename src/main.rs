#![warn(non_snake_case)]
//! # Menger Sponge Entry Point
//!
//! Renders a Menger sponge of the depth given on the command line. The
//! sponge is shown in an interactive window, or written to a PNG when the
//! crate is built headless or the render config names an output file.
//!
//! ## License
//! Licensed under the MIT License.

use menger_sponge::cli;
use menger_sponge::config::RenderConfig;
use menger_sponge::render;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize logging.
    env_logger::init();

    let status = cli::run(std::env::args_os(), |depth| {
        let config = RenderConfig::from_env()?;
        render::render(depth, &config)
    });
    ExitCode::from(status)
}
