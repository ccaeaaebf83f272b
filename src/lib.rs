//! Banded scalar-grid visualization.
//!
//! The [`grid`] module turns a text file of scalar samples into two vertex
//! streams: a flat-colored quad mesh and a set of contour segments drawn
//! wherever neighboring cells fall into different intensity bands.

pub mod grid;
