//! Procedural spiral galaxy point generation.
//!
//! [`generate`] maps a [`ParameterSet`] to index-aligned positions and colors.
//! Nothing in here knows about windows or GPUs; the application uploads the
//! resulting [`GeneratedGalaxy`] as a point cloud.

mod error;
mod generator;
mod parameters;

pub use error::GalaxyError;
pub use generator::{
    GeneratedGalaxy, PARALLEL_THRESHOLD, branch_angle, generate, generate_galaxy, generate_par,
};
pub use parameters::{ColorGradient, JitterScaling, ParameterSet, parse_hex_color};
