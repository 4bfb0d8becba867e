//! # Force Field Module
//!
//! A compact DREIDING-style molecular mechanics force field used to relax
//! embedded conformers.
//!
//! ## Overview
//!
//! The energy of a conformer is the sum of four contributions:
//!
//! - **Bond stretching** - harmonic in the bond length, stiffer for higher bond orders
//! - **Angle bending** - harmonic in the cosine of the angle, with special forms
//!   for linear and octahedral centers
//! - **Torsions** - cosine series chosen from the hybridization of the central bond
//! - **Van der Waals** - Lennard-Jones 12-6 between atoms three or more bonds apart
//!
//! Every term carries an analytic gradient so the model can be minimized
//! directly through the [`crate::core::minimizer::Objective`] trait.
//!
//! ## Key Components
//!
//! - [`params`] - Parameter tables, loaded from the built-in TOML or a user file
//! - [`parameterization`] - Expansion of a molecule into concrete interaction terms
//! - [`potentials`] - Functional forms and their derivatives
//! - [`term`] - Per-type energy breakdown
//!
//! ## Usage
//!
//! ```ignore
//! use confgen::core::forcefield::{params::Forcefield, parameterization::Parameterizer};
//!
//! let forcefield = Forcefield::builtin()?;
//! let model = Parameterizer::new(&forcefield).parameterize(&molecule)?;
//! let energy = model.energy(conformer.positions()).total();
//! ```

pub(crate) mod energy;
pub mod parameterization;
pub mod params;
pub(crate) mod potentials;
pub mod term;
