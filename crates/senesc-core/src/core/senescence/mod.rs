//! # Senescence Model Module
//!
//! This module contains the biophysical core of the crate: the parameter set
//! of the senescence model and the pure rate equations derived from it.
//!
//! ## Overview
//!
//! Senescence is driven by the decline of the protein concentration of an
//! organ relative to the maximum it reached during its life. The rules in
//! [`rules`] turn that decline into green-area loss, structural mass loss and
//! the remobilisation of metabolites towards the rest of the plant. All rules
//! are free functions over plain numbers so they can be exercised and
//! composed without any simulation state.
//!
//! ## Key Components
//!
//! - [`params::SenescenceParameters`]: species-level constants, loadable from
//!   TOML with per-file overrides.
//! - [`rules`]: the rate equations (root turnover, green-area and length
//!   senescence, protein remobilisation, nitrogen bookkeeping).

pub mod params;
pub mod rules;
