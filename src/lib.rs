//! Procedural level generator for a 2D side-scrolling platformer.
//!
//! [`generate_level`] turns a random source into a [`Level`]: ground segments
//! split by chasms, a guaranteed chain of jumpable platforms, decorative
//! platforms, spikes, coins that are always collectable, and a checkpoint and
//! finish standing on ground. Generation is pure and cannot fail.

pub mod api;
pub mod coins;
pub mod config;
pub mod constraints;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod level;
pub mod markers;
pub mod random;

pub use config::LevelConfig;
pub use error::{Error, Result};
pub use generation::{generate_level, generate_seeded, GenerateResult, LevelGenerator, LevelMetrics};
pub use geometry::{Point, Rect};
pub use level::{Coin, GroundSegment, Level, Platform, Spike};
pub use random::{LevelRng, SeededRng};
