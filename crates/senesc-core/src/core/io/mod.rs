//! # Input/Output Module
//!
//! This module handles the tabular exchange format of the crate: CSV record
//! collections for roots and photosynthetic elements.
//!
//! ## Overview
//!
//! Host pipelines hand the model its state as two tables (one row per root
//! compartment, one row per photosynthetic element) and read the updated
//! state back the same way. [`tables`] implements both directions with the
//! column contract of the original exchange files, including its historical
//! quirks (capitalized `Nstruct`, pandas-style `True`/`False` booleans,
//! silently ignored non-photosynthetic organs on read).

pub mod tables;
