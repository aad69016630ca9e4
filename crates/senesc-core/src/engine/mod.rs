//! # Engine Module
//!
//! This module implements the stateful front end of the senescence model,
//! coordinating per-organ rule evaluation over whole record collections.
//!
//! ## Overview
//!
//! The engine owns the current plant state as two record maps (roots and
//! photosynthetic elements), advances them one timestep at a time and keeps
//! the outputs of the last step available for inspection or feedback into
//! the next step.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Timestep, flowering stage, forced-death
//!   threshold and the invalid-record policy
//! - **Simulation** ([`simulation`]) - The per-step orchestrator and the
//!   input/output record collections
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//!   for multi-step drivers
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Key Capabilities
//!
//! - **Per-organ independence** allowing parallel evaluation of the record
//!   maps under the `parallel` feature
//! - **Configurable strictness** failing fast on invalid records or skipping
//!   them with a warning
//! - **Feedback support** applying outputs back onto the retained records
//!   between steps

pub mod config;
pub mod error;
pub mod progress;
pub mod simulation;
