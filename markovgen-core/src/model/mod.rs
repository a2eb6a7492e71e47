//! Top-level module for the Markov chain text system.
//!
//! This crate provides an order-N Markov chain text generator, including:
//! - The frequency model shared by training and generation (`FrequencyModel`)
//! - Streaming training with line carry-over (`Trainer`)
//! - Sequence generation with context backoff (`Generator`)
//! - Internal per-context state management (`State`)

/// Frequency model mapping contexts of `chain_len - 1` tokens to weighted
/// next-token counts.
///
/// Handles observation recording, exact-context sampling and compact
/// serialization of the trained artifact.
pub mod frequency_model;

/// Streaming trainer building a `FrequencyModel` from a line stream.
///
/// Tokenizes raw text, applies optional lowercase normalization and
/// records every sliding window of `chain_len` tokens.
pub mod trainer;

/// Sequence generator sampling from a trained `FrequencyModel`.
///
/// Supports optional seeding by first token and a bounded backoff that
/// shrinks the context until a match is found.
pub mod generator;

/// Internal representation of a single context (prefix) of the model.
///
/// Tracks outgoing transitions and supports weighted random sampling.
/// This module is not exposed publicly.
mod state;
