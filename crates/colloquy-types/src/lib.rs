//! Shared domain types for Colloquy.
//!
//! This crate contains the core domain types used across the Colloquy
//! conversation-storage workspace: Exchange, Thread, ChatMessage, the
//! storage configuration, and the storage error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod exchange;
pub mod message;
