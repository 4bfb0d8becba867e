//! # Engine Module
//!
//! The stateful layer of conformer generation: it turns a molecular graph
//! into a set of distinct 3D conformers and relaxes them.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Generation parameters and their builder
//! - **Embedding** ([`embedding`]) - Distance-geometry bounds, metric-matrix embedding
//!   and error-function refinement
//! - **Pruning** ([`pruning`]) - Duplicate detection by superposed RMSD
//! - **Tasks** ([`tasks`]) - The embedding and force-field optimization loops
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The umbrella [`error::EngineError`]
//!
//! A single seeded random number generator drives every embedding attempt,
//! so a run is reproducible from its configuration alone.

pub mod config;
pub mod embedding;
pub mod error;
pub mod progress;
pub mod pruning;
pub mod tasks;
