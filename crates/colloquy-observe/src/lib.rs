//! Observability setup for Colloquy.
//!
//! The storage layer deliberately swallows persistence and recovery
//! failures to stay available; this crate is what makes those failures
//! visible. Applications embedding Colloquy call
//! [`tracing_setup::init_tracing`] once at startup.

pub mod tracing_setup;
