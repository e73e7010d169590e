//! Content resolution, caching, and the quiz engine.
//!
//! This crate defines the data model, normalizers, content cache,
//! navigation sequencer, and quiz state machine that the rest of the
//! coursebook system builds on. Storage is abstracted behind the traits in
//! [`store`]; the `coursebook-store` crate provides the implementations.

pub mod cache;
pub mod model;
pub mod navigator;
pub mod normalize;
pub mod paths;
pub mod quiz;
pub mod store;
