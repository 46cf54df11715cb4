//! Storage contracts and conversation logic for Colloquy.
//!
//! This crate defines the "ports" (storage and embedder traits) that the
//! infrastructure layer implements, plus the pure thread-grouping algorithm.
//! It depends only on `colloquy-types` -- never on `colloquy-infra` or any
//! database/IO crate.

pub mod embedding;
pub mod storage;
pub mod threading;
