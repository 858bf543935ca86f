//! Top-level module for the word generation system.
//!
//! It contains:
//! - The tokenization rule used to split text into words (`TokenizerRule`)
//! - The word/index mapping (`Vocabulary`)
//! - The sequence model adapter and its dense implementation (`SequenceModel`, `DenseModel`)
//! - The persisted bundle loaded at start-up (`Artifact`)
//! - Request validation (`GenerationRequest`)
//! - The generation engine (`Generator`)

/// High-level generation engine.
///
/// Encodes the accumulated text, truncates and pads the context,
/// queries the model and decodes the greedy choice until a stop condition.
pub mod generator;

/// Validated input of a generation call.
pub mod generation_request;

/// Word splitting rule shared by vocabulary construction and encoding.
pub mod tokenizer;

/// Bidirectional word/index mapping.
pub mod vocabulary;

/// Sequence model trait and the dense feed-forward implementation.
pub mod sequence_model;

/// Persisted bundle: model, vocabulary and `max_len`.
pub mod artifact;
