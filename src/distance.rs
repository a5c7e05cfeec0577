// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::eikonal::EikonalSolver;
use crate::error::{FmmError, Result};
use crate::grid::{inside, linear_size, neighbor_offsets, CellState, Grid};
use crate::march::{initialize_frozen_cells, initialize_narrow_band, march_narrow_band};

/// Accept neighbor directions opposite the outward normal (into the
/// interior). Zero dot products count as accepted so tangential directions
/// expand on both sweeps.
fn inside_direction<const N: usize>(normal: [f64; N], offset: [i32; N]) -> bool {
    let mut sum = 0.0;
    for i in 0..N {
        sum += -normal[i] * offset[i] as f64;
    }
    sum >= 0.0
}

/// Accept neighbor directions along the outward normal (into the exterior).
fn outside_direction<const N: usize>(normal: [f64; N], offset: [i32; N]) -> bool {
    let mut sum = 0.0;
    for i in 0..N {
        sum += normal[i] * offset[i] as f64;
    }
    sum >= 0.0
}

fn validate_inputs<const N: usize>(
    size: [usize; N],
    dx: [f64; N],
    speed: f64,
    seed_indices: &[[i32; N]],
    seed_distances: &[f64],
    seed_normals: &[[f64; N]],
) -> Result<()> {
    for (axis, &s) in size.iter().enumerate() {
        if s < 1 {
            return Err(FmmError::InvalidSize { axis, size: s });
        }
    }
    for (axis, &spacing) in dx.iter().enumerate() {
        if spacing <= 0.0 {
            return Err(FmmError::InvalidSpacing { axis, spacing });
        }
    }
    if speed <= 0.0 {
        return Err(FmmError::InvalidSpeed(speed));
    }
    if seed_indices.len() != seed_distances.len() || seed_indices.len() != seed_normals.len() {
        return Err(FmmError::SizeMismatch {
            indices: seed_indices.len(),
            distances: seed_distances.len(),
            normals: seed_normals.len(),
        });
    }
    for index in seed_indices {
        if !inside(*index, size) {
            return Err(FmmError::InvalidIndex {
                index: index.to_vec(),
                size: size.to_vec(),
            });
        }
    }
    for (index, &value) in seed_distances.iter().enumerate() {
        if value.is_nan() {
            return Err(FmmError::InvalidDistance { index, value });
        }
    }
    Ok(())
}

fn validate_normals<const N: usize>(seed_normals: &[[f64; N]]) -> Result<()> {
    for (index, normal) in seed_normals.iter().enumerate() {
        let squared_magnitude: f64 = normal.iter().map(|&v| v * v).sum();
        if squared_magnitude < 0.25 {
            return Err(FmmError::InvalidNormal {
                index,
                squared_magnitude,
            });
        }
    }
    Ok(())
}

/// Unsigned Euclidean distance to the seed interface, for every grid cell.
///
/// Runs an inside sweep (seeds negated, expansion opposite the normals)
/// and an outside sweep (seeds as given, expansion along the normals) over
/// a single shared distance grid. The state grid is deliberately not reset
/// between sweeps: cells frozen by the inside sweep are the interior and
/// stay inert while the outside sweep runs. Seed cells end up holding
/// `|seed_distances[i]|`.
///
/// The result is the flat cell buffer in row-major order, `k = i0 + i1*s0 +
/// i2*s0*s1 + ...`. Cells unreachable from the seeds hold `f64::INFINITY`.
///
/// # Errors
/// Any of the input validation errors (`InvalidSize`, `InvalidSpacing`,
/// `InvalidSpeed`, `SizeMismatch`, `InvalidIndex`, `InvalidDistance`), or
/// `EmptyNarrowBand` if the seeds have no expandable neighbor at all.
pub fn unsigned_distance<const N: usize>(
    size: [usize; N],
    dx: [f64; N],
    speed: f64,
    seed_indices: &[[i32; N]],
    seed_distances: &[f64],
    seed_normals: &[[f64; N]],
) -> Result<Vec<f64>> {
    validate_inputs(size, dx, speed, seed_indices, seed_distances, seed_normals)?;

    let offsets = neighbor_offsets::<N>();
    let eikonal_solver = EikonalSolver::new(dx, speed);

    let mut state_grid = Grid::filled(size, CellState::Far);
    let mut distance_grid = Grid::filled(size, f64::INFINITY);

    // Solve inside.
    initialize_frozen_cells(
        seed_indices,
        seed_distances,
        -1.0,
        &mut distance_grid,
        &mut state_grid,
    );
    let mut narrow_band = initialize_narrow_band(
        &eikonal_solver,
        seed_indices,
        &offsets,
        seed_normals,
        inside_direction,
        &mut distance_grid,
        &mut state_grid,
    )?;
    march_narrow_band(
        &eikonal_solver,
        &offsets,
        &mut distance_grid,
        &mut state_grid,
        &mut narrow_band,
    )?;

    // Solve outside. When the seeds do not close an interface the inside
    // sweep can flood the entire grid; an empty band here means there is
    // nothing left to march, not a caller error.
    initialize_frozen_cells(
        seed_indices,
        seed_distances,
        1.0,
        &mut distance_grid,
        &mut state_grid,
    );
    match initialize_narrow_band(
        &eikonal_solver,
        seed_indices,
        &offsets,
        seed_normals,
        outside_direction,
        &mut distance_grid,
        &mut state_grid,
    ) {
        Ok(mut narrow_band) => march_narrow_band(
            &eikonal_solver,
            &offsets,
            &mut distance_grid,
            &mut state_grid,
            &mut narrow_band,
        )?,
        Err(FmmError::EmptyNarrowBand) => {}
        Err(e) => return Err(e),
    }

    // Seed cells report the magnitude of the prescribed distance.
    for (index, &distance) in seed_indices.iter().zip(seed_distances) {
        *distance_grid.cell_mut(*index) = distance.abs();
    }

    Ok(distance_grid.into_cells())
}

/// Signed Euclidean distance to the seed interface: negative inside,
/// positive outside.
///
/// Each sweep marches into its own ∞-filled distance grid; the state grid
/// is shared, so interior cells frozen by the inside sweep are unreachable
/// for the outside sweep and keep their ∞ in the outside grid. The final
/// buffer takes `-d` from the inside grid where finite, then `+d` from the
/// outside grid where finite; seed cells end up holding the prescribed
/// signed `seed_distances[i]`.
///
/// # Errors
/// The same validation errors as [`unsigned_distance`], plus
/// `InvalidNormal` for any seed normal with squared magnitude below 0.25.
pub fn signed_distance<const N: usize>(
    size: [usize; N],
    dx: [f64; N],
    speed: f64,
    seed_indices: &[[i32; N]],
    seed_distances: &[f64],
    seed_normals: &[[f64; N]],
) -> Result<Vec<f64>> {
    validate_inputs(size, dx, speed, seed_indices, seed_distances, seed_normals)?;
    validate_normals(seed_normals)?;

    let offsets = neighbor_offsets::<N>();
    let eikonal_solver = EikonalSolver::new(dx, speed);

    let mut state_grid = Grid::filled(size, CellState::Far);

    // Solve inside.
    let mut inside_distance_grid = Grid::filled(size, f64::INFINITY);
    initialize_frozen_cells(
        seed_indices,
        seed_distances,
        -1.0,
        &mut inside_distance_grid,
        &mut state_grid,
    );
    let mut narrow_band = initialize_narrow_band(
        &eikonal_solver,
        seed_indices,
        &offsets,
        seed_normals,
        inside_direction,
        &mut inside_distance_grid,
        &mut state_grid,
    )?;
    march_narrow_band(
        &eikonal_solver,
        &offsets,
        &mut inside_distance_grid,
        &mut state_grid,
        &mut narrow_band,
    )?;

    // Solve outside into a fresh grid, against the same state grid.
    let mut outside_distance_grid = Grid::filled(size, f64::INFINITY);
    initialize_frozen_cells(
        seed_indices,
        seed_distances,
        1.0,
        &mut outside_distance_grid,
        &mut state_grid,
    );
    match initialize_narrow_band(
        &eikonal_solver,
        seed_indices,
        &offsets,
        seed_normals,
        outside_direction,
        &mut outside_distance_grid,
        &mut state_grid,
    ) {
        Ok(mut narrow_band) => march_narrow_band(
            &eikonal_solver,
            &offsets,
            &mut outside_distance_grid,
            &mut state_grid,
            &mut narrow_band,
        )?,
        Err(FmmError::EmptyNarrowBand) => {}
        Err(e) => return Err(e),
    }

    let inside_buffer = inside_distance_grid.into_cells();
    let outside_buffer = outside_distance_grid.into_cells();

    let mut distance_buffer = vec![f64::INFINITY; linear_size(size)];
    for (out, &d) in distance_buffer.iter_mut().zip(&inside_buffer) {
        if d.is_finite() {
            // Negative inside.
            *out = -d;
        }
    }
    for (out, &d) in distance_buffer.iter_mut().zip(&outside_buffer) {
        if d.is_finite() {
            // Positive outside.
            *out = d;
        }
    }

    let mut distance_grid = Grid::from_parts(size, distance_buffer);
    for (index, &distance) in seed_indices.iter().zip(seed_distances) {
        *distance_grid.cell_mut(*index) = distance;
    }

    Ok(distance_grid.into_cells())
}
