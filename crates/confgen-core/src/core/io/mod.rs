//! Provides input/output functionality for molecular file formats.
//!
//! Reading and writing go through the [`traits::MolecularFile`] trait so the
//! workflow layer never depends on a concrete format. The only format shipped
//! today is the MDL V2000 molfile / SD file ([`sdf`]), which is also what the
//! generated conformer ensembles are written as.

pub mod sdf;
pub mod traits;
