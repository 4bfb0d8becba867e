//! # Topology Module
//!
//! Connectivity-derived chemistry that both the embedder and the force field
//! rely on.
//!
//! ## Key Components
//!
//! - [`hybridization`] - sp/sp2/sp3 assignment from bond orders and conjugation
//! - [`rings`] - Ring-closure tests and shortest paths over the bond graph
//! - [`ideal`] - Reference bond lengths and bond angles
//! - [`kekule`] - Checks that aromatic systems admit alternating bond orders
//!
//! ## Usage
//!
//! ```ignore
//! use confgen::core::topology::{hybridization, ideal};
//!
//! let hyb = hybridization::perceive(&molecule);
//! let r0 = ideal::ideal_bond_length(&molecule, 0, 1);
//! let theta0 = ideal::ideal_angle(&molecule, &hyb, 0, 1, 2);
//! ```

pub mod hybridization;
pub mod ideal;
pub mod kekule;
pub mod rings;
