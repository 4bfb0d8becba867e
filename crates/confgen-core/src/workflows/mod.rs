//! # Workflows Module
//!
//! High-level entry points that run a complete conformer generation over an
//! in-memory molecule.
//!
//! ## Overview
//!
//! A workflow owns the order of operations: it prepares the molecule and the
//! force field, drives the [`crate::engine`] tasks phase by phase, reports
//! progress, and returns a summary of what was produced. Reading and writing
//! structure files is left to the caller.
//!
//! - **Generation Workflow** ([`generate`]) - Hydrogen completion, distance-geometry
//!   embedding with RMSD pruning, and optional force-field optimization.

pub mod generate;
