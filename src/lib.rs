// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! Signed and unsigned Euclidean distance fields via the Fast Marching
//! Method (FMM).
//!
//! This library solves the eikonal equation |∇T|·F = 1 on N-dimensional
//! Cartesian grids, given a sparse set of frozen seed cells with known
//! distances and interface normals. The march labels cells in order of
//! increasing distance in a single pass, using a narrow-band min-heap with
//! decrease-key and a first-order upwind quadratic update.

#![warn(missing_docs)]

/// Distance field drivers: the inside/outside sweep composition.
pub mod distance;
/// Upwind Eikonal quadratic solver.
pub mod eikonal;
/// Error types for the library.
pub mod error;
/// N-dimensional grid storage, indexing, and neighbor offsets.
pub mod grid;
/// File I/O for loading level-set fields and saving distance fields.
pub mod io;
/// Front initialization and the marching loop.
pub mod march;
/// The narrow-band min-heap with decrease-key.
pub mod narrow_band;
/// Interface seed extraction from sampled implicit fields.
pub mod seed;

pub use crate::distance::{signed_distance, unsigned_distance};
pub use crate::error::{FmmError, Result};
pub use crate::grid::{CellState, Grid};
pub use crate::narrow_band::NarrowBand;
pub use crate::seed::{seeds_from_level_set, SeedSet};
