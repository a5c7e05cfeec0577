// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur during distance field setup, I/O, or marching.
#[derive(Debug)]
pub enum FmmError {
    /// Grid size is invalid (some axis has no cells).
    InvalidSize {
        /// The axis index.
        axis: usize,
        /// The size provided.
        size: usize,
    },
    /// Grid spacing is not positive.
    InvalidSpacing {
        /// The axis index.
        axis: usize,
        /// The spacing provided.
        spacing: f64,
    },
    /// Speed is not positive.
    InvalidSpeed(f64),
    /// Seed arrays have different lengths.
    SizeMismatch {
        /// Number of seed indices.
        indices: usize,
        /// Number of seed distances.
        distances: usize,
        /// Number of seed normals.
        normals: usize,
    },
    /// A seed index lies outside the grid.
    InvalidIndex {
        /// The offending index.
        index: Vec<i32>,
        /// The grid size.
        size: Vec<usize>,
    },
    /// A seed distance is NaN.
    InvalidDistance {
        /// Position in the seed arrays.
        index: usize,
        /// The invalid value.
        value: f64,
    },
    /// A seed normal is too short to give a propagation direction.
    InvalidNormal {
        /// Position in the seed arrays.
        index: usize,
        /// Squared magnitude of the normal.
        squared_magnitude: f64,
    },
    /// The narrow band is empty after seeding; nothing can be marched.
    EmptyNarrowBand,
    /// A sampled field has no sign change, so no interface seeds exist.
    NoInterface,
    /// Heap contract violation: index already present on insert.
    DuplicateIndex {
        /// The offending index.
        index: Vec<i32>,
    },
    /// Heap contract violation: index not present on update.
    NotFound {
        /// The offending index.
        index: Vec<i32>,
    },
    /// Heap contract violation: decrease-key with a non-decreasing value.
    NotDecreasing {
        /// The entry's current distance.
        current: f64,
        /// The rejected new distance.
        requested: f64,
    },
    /// Heap contract violation: increase-key with a non-increasing value.
    NotIncreasing {
        /// The entry's current distance.
        current: f64,
        /// The rejected new distance.
        requested: f64,
    },
    /// Heap contract violation: pop from an empty heap.
    HeapEmpty,
    /// Marcher contract violation: a popped cell was not in the narrow band.
    NotInNarrowBand {
        /// The offending index.
        index: Vec<i32>,
    },
    /// Array shape does not match expected shape.
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape encountered.
        got: Vec<usize>,
    },
    /// Unsupported data type in file.
    UnsupportedDtype(String),
    /// Unsupported file format (unrecognized extension).
    UnsupportedFileFormat(String),
    /// Expected MAT variable not found in file.
    MatVariableNotFound {
        /// The variable name that was requested.
        expected: String,
        /// The variable names that are available.
        available: Vec<String>,
    },
    /// I/O error occurred.
    IoError(std::io::Error),
    /// Other error with a descriptive message.
    Other(String),
}

impl fmt::Display for FmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FmmError::InvalidSize { axis, size } => {
                write!(
                    f,
                    "invalid grid size: axis {} has size {} (must be >= 1)",
                    axis, size
                )
            }
            FmmError::InvalidSpacing { axis, spacing } => {
                write!(
                    f,
                    "invalid grid spacing: axis {} has spacing {} (must be positive)",
                    axis, spacing
                )
            }
            FmmError::InvalidSpeed(speed) => {
                write!(f, "invalid speed: {} (must be positive)", speed)
            }
            FmmError::SizeMismatch {
                indices,
                distances,
                normals,
            } => {
                write!(
                    f,
                    "seed array size mismatch: {} indices, {} distances, {} normals",
                    indices, distances, normals
                )
            }
            FmmError::InvalidIndex { index, size } => {
                write!(
                    f,
                    "invalid seed index: {:?} is outside grid of size {:?}",
                    index, size
                )
            }
            FmmError::InvalidDistance { index, value } => {
                write!(
                    f,
                    "invalid seed distance at position {}: {} (must not be NaN)",
                    index, value
                )
            }
            FmmError::InvalidNormal {
                index,
                squared_magnitude,
            } => {
                write!(
                    f,
                    "invalid seed normal at position {}: squared magnitude {} < 0.25",
                    index, squared_magnitude
                )
            }
            FmmError::EmptyNarrowBand => {
                write!(f, "narrow band is empty after seed initialization")
            }
            FmmError::NoInterface => {
                write!(f, "field has no sign change; no interface to extract")
            }
            FmmError::DuplicateIndex { index } => {
                write!(f, "narrow band index must be unique: {:?}", index)
            }
            FmmError::NotFound { index } => {
                write!(f, "index not found in narrow band: {:?}", index)
            }
            FmmError::NotDecreasing { current, requested } => {
                write!(
                    f,
                    "new distance {} must be less than existing distance {}",
                    requested, current
                )
            }
            FmmError::NotIncreasing { current, requested } => {
                write!(
                    f,
                    "new distance {} must be greater than existing distance {}",
                    requested, current
                )
            }
            FmmError::HeapEmpty => {
                write!(f, "cannot pop from an empty narrow band")
            }
            FmmError::NotInNarrowBand { index } => {
                write!(f, "popped cell {:?} was not in the narrow band", index)
            }
            FmmError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, got)
            }
            FmmError::UnsupportedDtype(dtype) => {
                write!(f, "unsupported dtype: {}", dtype)
            }
            FmmError::UnsupportedFileFormat(ext) => {
                write!(f, "unsupported file format: {}", ext)
            }
            FmmError::MatVariableNotFound {
                expected,
                available,
            } => {
                write!(
                    f,
                    "MAT variable '{}' not found; available variables: {:?}",
                    expected, available
                )
            }
            FmmError::IoError(e) => write!(f, "I/O error: {}", e),
            FmmError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FmmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FmmError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FmmError {
    fn from(e: std::io::Error) -> Self {
        FmmError::IoError(e)
    }
}

/// Convenience type alias for Results with FmmError.
pub type Result<T> = std::result::Result<T, FmmError>;
