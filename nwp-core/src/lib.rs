//! Word-level text continuation library.
//!
//! This crate provides the generation core of the next-word predictor:
//! - Word tokenization and a bidirectional vocabulary
//! - A sequence model adapter with a concrete dense implementation
//! - A greedy autoregressive generation engine with explicit stop reasons
//! - Loading and saving of the persisted artifact
//!
//! Front-ends (HTTP server, demo binary) only call
//! [`Generator::generate`](model::generator::Generator::generate) or
//! [`Generator::predict`](model::generator::Generator::predict).

/// Vocabulary, sequence model and generation logic.
pub mod model;

/// Artifact and file I/O helpers.
pub mod io;

/// Error type shared by the whole crate.
pub mod error;

pub use error::{Error, Result};
