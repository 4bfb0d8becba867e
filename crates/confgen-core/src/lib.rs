//! # confgen Core Library
//!
//! Generation of 3D conformer ensembles for small molecules by distance
//! geometry, with optional force-field refinement.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Conformer`),
//!   SD file I/O, chemistry perception, the force field with analytic gradients,
//!   and a general-purpose conjugate gradient minimizer.
//!
//! - **[`engine`]: The Logic Core.** Distance bounds and triangle smoothing,
//!   metric-matrix embedding, RMSD pruning, and the per-conformer embedding and
//!   optimization loops, together with configuration, progress reporting and errors.
//!
//! - **[`workflows`]: The Public API.** [`workflows::generate::run`] ties the
//!   layers together into one reproducible conformer generation run.

pub mod core;
pub mod engine;
pub mod workflows;
