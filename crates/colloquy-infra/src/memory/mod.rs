//! Reference storage backends.
//!
//! `MemoryStore` implements the full `StorageProvider` contract over an
//! in-memory collection with an append-only journal; `MessageLog` is the
//! lightweight chat-message counterpart.

pub mod messages;
pub mod store;
