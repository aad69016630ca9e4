//! # Workflows Module
//!
//! This module provides the high-level entry points that orchestrate complete
//! senescence computations over whole plant stands.
//!
//! ## Overview
//!
//! Workflows tie the engine and core layers together into one call: build a
//! simulation, advance it over several timesteps, feed the outputs back into
//! the retained records between steps and hand the caller the final state.
//!
//! ## Architecture
//!
//! - **Senescence Workflow** ([`senesce`]) - Multi-timestep run with
//!   per-step feedback and progress reporting.
//!
//! ## Key Capabilities
//!
//! - **End-to-end computation** from input records to post-run records
//! - **Progress monitoring** with per-step reporting
//! - **Error handling** naming the offending record on failure

pub mod senesce;
