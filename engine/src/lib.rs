//! Bubble physics engine library.
//!
//! This module exposes the engine components for use in tests and binaries.

pub mod body;
pub mod bridge;
pub mod collision;
pub mod config;
pub mod drag;
pub mod engine_loop;
pub mod gesture;
pub mod registry;
pub mod simulation;
pub mod sync;
pub mod walls;
pub mod world;
