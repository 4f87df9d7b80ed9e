// src/lib.rs

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod sponge;
pub mod utils;
