//! Client wiring for Colloquy.
//!
//! This crate connects the storage contracts from `colloquy-core` to the
//! implementations in `colloquy-infra`: it resolves the configured backend
//! kind (with fallback), owns the process-wide provider singleton, and
//! exposes the stateless facade functions callers actually use.

pub mod config_file;
pub mod history;
pub mod registry;
