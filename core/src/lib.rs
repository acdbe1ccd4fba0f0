//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod camera;
pub mod film;
pub mod geometry;
pub mod interaction;
pub mod light;
pub mod light_distrib;
pub mod material;
pub mod medium;
pub mod parallel;
pub mod pbrt;
pub mod primitive;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod spectrum;
