//! # Senesc-Wheat Core Library
//!
//! A modernized, high-performance library for simulating tissue senescence and
//! nutrient remobilisation in wheat, based on the Senesc-Wheat model.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the typed plant state (records and
//!   identifiers), the pure biophysical rules of the senescence model
//!   (`senescence::rules`), the species parameter set and the tabular I/O contract.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer advances whole record
//!   collections by one timestep at a time, enforcing the per-element life cycle
//!   (growing, senescing, dead) and the configured strictness towards invalid
//!   records.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute complete
//!   multi-timestep computations with per-step feedback, and is the entry point
//!   used by the command-line tool.

pub mod core;
pub mod engine;
pub mod workflows;
