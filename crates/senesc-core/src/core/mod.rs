//! # Core Module
//!
//! The foundational layer of the crate: domain types, the senescence model
//! itself and the tabular I/O contract.
//!
//! ## Architecture
//!
//! - [`models`]: identifiers, input records, output records and the builders
//!   that assemble records from multiple sources.
//! - [`senescence`]: species parameters and the pure biophysical rules.
//! - [`io`]: CSV readers, writers and table audits.
//!
//! Everything here is free of simulation state; the stateful orchestration
//! lives in [`crate::engine`].

pub mod io;
pub mod models;
pub mod senescence;
