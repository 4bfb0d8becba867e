//! # Core Models Module
//!
//! Data structures describing a single molecule and the conformers generated for it.
//!
//! ## Key Components
//!
//! - [`element`] - Supported elements with radii and valence rules
//! - [`atom`] - Atoms with their reference coordinates and formal charge
//! - [`topology`] - Bonds and bond orders
//! - [`molecule`] - The molecular graph that owns atoms, bonds and conformers
//! - [`conformer`] - Generated 3D coordinate sets and their identifiers
//!
//! ## Usage
//!
//! ```ignore
//! use confgen::core::models::{atom::Atom, element::Element, molecule::Molecule};
//! use confgen::core::models::topology::BondOrder;
//!
//! let mut molecule = Molecule::new("methanol");
//! let c = molecule.add_atom(Atom::new(Element::C, Point3::origin()))?;
//! let o = molecule.add_atom(Atom::new(Element::O, Point3::new(1.43, 0.0, 0.0)))?;
//! molecule.add_bond(c, o, BondOrder::Single)?;
//! ```

pub mod atom;
pub mod conformer;
pub mod element;
pub mod molecule;
pub mod topology;
