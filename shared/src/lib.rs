//! Types shared between the bubble engine and the presentation layer.
//!
//! Wire types derive `ts_rs::TS` so the web front end gets generated bindings.

pub mod config;
pub mod decay;
pub mod entity;
pub mod image;
pub mod interchange;
pub mod protocol;
pub mod store;
pub mod vec2;
