//! # Core Module
//!
//! The stateless foundation of the library: molecular data structures, file
//! formats, chemistry perception, the force field and the numerical minimizer.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds, molecules and conformers
//! - **File I/O** ([`io`]) - Reading and writing MDL molfiles / SD files
//! - **Structural Knowledge** ([`topology`]) - Hybridization, rings and ideal geometry
//! - **Hydrogen Completion** ([`hydrogens`]) - Making implicit hydrogens explicit
//! - **Energy Calculations** ([`forcefield`]) - Parameters, potentials and analytic gradients
//! - **Optimization** ([`minimizer`]) - Nonlinear conjugate gradient over any [`minimizer::Objective`]
//! - **Geometry** ([`utils`]) - Dihedrals, chirality volumes, substituent placement and RMSD
//!
//! Nothing in this module keeps state between calls; the [`crate::engine`]
//! layer builds the conformer generation process on top of these pieces.

pub mod forcefield;
pub mod hydrogens;
pub mod io;
pub mod minimizer;
pub mod models;
pub mod topology;
pub mod utils;
