//! Embedding abstractions for Colloquy.
//!
//! The embedder is an external collaborator: computing vectors is out of
//! scope here, but the reference store can consume one during `add` when the
//! caller did not supply a pre-computed embedding.

pub mod box_embedder;
pub mod embedder;
