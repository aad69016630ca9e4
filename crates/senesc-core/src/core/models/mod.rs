//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent the
//! state of a wheat stand in Senesc-Wheat, providing the foundation for every
//! senescence computation.
//!
//! ## Overview
//!
//! The models module defines the typed records the engine consumes and
//! produces, together with the identifiers that address them within the plant
//! topology. These models are designed to:
//!
//! - **Represent plant state** - Per-organ masses, areas and metabolite pools
//! - **Maintain type safety** - Strongly typed identifiers and quantities in
//!   place of free-form label tuples and property dictionaries
//! - **Make gaps explicit** - Multi-source record assembly that reports which
//!   input is missing instead of silently dropping a record
//!
//! ## Key Components
//!
//! - [`ids`] - Identifier types locating roots and photosynthetic elements
//! - [`records`] - Input records, per-step outputs, and validation
//! - [`builder`] - Record builders with merge precedence across input sources

pub mod builder;
pub mod ids;
pub mod records;
