//! Geometry helpers shared by hydrogen placement, embedding and pruning.

pub mod geometry;
