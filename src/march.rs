// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::eikonal::EikonalSolver;
use crate::error::{FmmError, Result};
use crate::grid::{inside, offset_index, CellState, Grid};
use crate::narrow_band::NarrowBand;

/// Write the seed distances (scaled by `multiplier`) and freeze the seed
/// cells. The multiplier is -1 for the inside sweep and +1 for the outside
/// sweep.
pub fn initialize_frozen_cells<const N: usize>(
    seed_indices: &[[i32; N]],
    seed_distances: &[f64],
    multiplier: f64,
    distance_grid: &mut Grid<f64, N>,
    state_grid: &mut Grid<CellState, N>,
) {
    debug_assert_eq!(seed_indices.len(), seed_distances.len());

    for (index, &distance) in seed_indices.iter().zip(seed_distances) {
        debug_assert!(inside(*index, distance_grid.size()));
        *distance_grid.cell_mut(*index) = multiplier * distance;
        *state_grid.cell_mut(*index) = CellState::Frozen;
    }
}

/// Relax the neighbors of a frozen cell.
///
/// Neighbors are visited in offset order; `pred(normal, offset)` gates
/// which directions are considered at all. A `Far` neighbor gets a first
/// tentative distance and joins the narrow band; a `NarrowBand` neighbor is
/// re-solved and its entry lowered if the new distance is strictly smaller;
/// a `Frozen` neighbor is final and skipped.
fn update_neighbors<const N: usize, P>(
    eikonal_solver: &EikonalSolver<N>,
    index: [i32; N],
    offsets: &[[i32; N]],
    normal: [f64; N],
    pred: P,
    distance_grid: &mut Grid<f64, N>,
    state_grid: &mut Grid<CellState, N>,
    narrow_band: &mut NarrowBand<N>,
) -> Result<()>
where
    P: Fn([f64; N], [i32; N]) -> bool,
{
    debug_assert!(inside(index, distance_grid.size()));
    debug_assert_eq!(*state_grid.cell(index), CellState::Frozen);

    for &offset in offsets {
        if !pred(normal, offset) {
            continue;
        }

        let neighbor_index = offset_index(index, offset);
        if !inside(neighbor_index, distance_grid.size()) {
            continue;
        }

        match *state_grid.cell(neighbor_index) {
            CellState::Far => {
                let distance =
                    eikonal_solver.solve(neighbor_index, offsets, distance_grid, state_grid);
                *distance_grid.cell_mut(neighbor_index) = distance;
                *state_grid.cell_mut(neighbor_index) = CellState::NarrowBand;
                narrow_band.insert(distance, neighbor_index)?;
            }
            CellState::NarrowBand => {
                let new_distance =
                    eikonal_solver.solve(neighbor_index, offsets, distance_grid, state_grid);
                if new_distance < *distance_grid.cell(neighbor_index) {
                    narrow_band.decrease_distance(neighbor_index, new_distance)?;
                    *distance_grid.cell_mut(neighbor_index) = new_distance;
                }
            }
            CellState::Frozen => {}
        }
    }

    Ok(())
}

/// Build the initial narrow band around the frozen seed cells.
///
/// For each seed, only neighbor directions accepted by `pred` with that
/// seed's interface normal are expanded; this is how the driver restricts
/// each sweep to one side of the interface. The seeds themselves must
/// already be frozen.
///
/// # Errors
/// `EmptyNarrowBand` if no seed contributed a non-frozen neighbor.
pub fn initialize_narrow_band<const N: usize, P>(
    eikonal_solver: &EikonalSolver<N>,
    seed_indices: &[[i32; N]],
    offsets: &[[i32; N]],
    normals: &[[f64; N]],
    pred: P,
    distance_grid: &mut Grid<f64, N>,
    state_grid: &mut Grid<CellState, N>,
) -> Result<NarrowBand<N>>
where
    P: Fn([f64; N], [i32; N]) -> bool,
{
    debug_assert_eq!(seed_indices.len(), normals.len());

    let mut narrow_band = NarrowBand::new();

    for (index, &normal) in seed_indices.iter().zip(normals) {
        update_neighbors(
            eikonal_solver,
            *index,
            offsets,
            normal,
            &pred,
            distance_grid,
            state_grid,
            &mut narrow_band,
        )?;
    }

    if narrow_band.is_empty() {
        return Err(FmmError::EmptyNarrowBand);
    }

    Ok(narrow_band)
}

/// Drain the narrow band: repeatedly freeze the closest cell and relax its
/// neighbors.
///
/// No direction predicate applies while marching; the monotone front
/// handles direction implicitly. Because the scheme uses only frozen
/// (smaller-distance) neighbors, extraction order is non-decreasing and a
/// frozen cell never needs revisiting.
pub fn march_narrow_band<const N: usize>(
    eikonal_solver: &EikonalSolver<N>,
    offsets: &[[i32; N]],
    distance_grid: &mut Grid<f64, N>,
    state_grid: &mut Grid<CellState, N>,
    narrow_band: &mut NarrowBand<N>,
) -> Result<()> {
    let dummy_normal = [f64::NAN; N];

    while !narrow_band.is_empty() {
        let (distance, index) = narrow_band.pop()?;

        if *state_grid.cell(index) != CellState::NarrowBand {
            return Err(FmmError::NotInNarrowBand {
                index: index.to_vec(),
            });
        }

        // The grid already holds this distance; assign anyway to make the
        // freeze explicit.
        *distance_grid.cell_mut(index) = distance;
        *state_grid.cell_mut(index) = CellState::Frozen;

        update_neighbors(
            eikonal_solver,
            index,
            offsets,
            dummy_normal,
            |_, _| true,
            distance_grid,
            state_grid,
            narrow_band,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::neighbor_offsets;

    fn always(_: [f64; 2], _: [i32; 2]) -> bool {
        true
    }

    #[test]
    fn frozen_cells_take_multiplied_distances() {
        let mut distance_grid = Grid::filled([3, 3], f64::INFINITY);
        let mut state_grid = Grid::filled([3, 3], CellState::Far);

        initialize_frozen_cells(
            &[[1, 1]],
            &[2.0],
            -1.0,
            &mut distance_grid,
            &mut state_grid,
        );

        assert_eq!(*distance_grid.cell([1, 1]), -2.0);
        assert_eq!(*state_grid.cell([1, 1]), CellState::Frozen);
        assert_eq!(*state_grid.cell([0, 1]), CellState::Far);
    }

    #[test]
    fn narrow_band_forms_around_seed() {
        let solver = EikonalSolver::new([1.0, 1.0], 1.0);
        let offsets = neighbor_offsets::<2>();
        let mut distance_grid = Grid::filled([3, 3], f64::INFINITY);
        let mut state_grid = Grid::filled([3, 3], CellState::Far);

        initialize_frozen_cells(&[[1, 1]], &[0.0], 1.0, &mut distance_grid, &mut state_grid);
        let band = initialize_narrow_band(
            &solver,
            &[[1, 1]],
            &offsets,
            &[[1.0, 0.0]],
            always,
            &mut distance_grid,
            &mut state_grid,
        )
        .unwrap();

        // All four axis-neighbors are inside and were Far.
        assert_eq!(band.len(), 4);
        assert_eq!(*state_grid.cell([2, 1]), CellState::NarrowBand);
        assert!((*distance_grid.cell([2, 1]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn predicate_gates_expansion_direction() {
        let solver = EikonalSolver::new([1.0, 1.0], 1.0);
        let offsets = neighbor_offsets::<2>();
        let mut distance_grid = Grid::filled([3, 3], f64::INFINITY);
        let mut state_grid = Grid::filled([3, 3], CellState::Far);

        initialize_frozen_cells(&[[1, 1]], &[0.0], 1.0, &mut distance_grid, &mut state_grid);
        // Only allow +x expansion.
        let band = initialize_narrow_band(
            &solver,
            &[[1, 1]],
            &offsets,
            &[[1.0, 0.0]],
            |_, offset| offset == [1, 0],
            &mut distance_grid,
            &mut state_grid,
        )
        .unwrap();

        assert_eq!(band.len(), 1);
        assert_eq!(*state_grid.cell([2, 1]), CellState::NarrowBand);
        assert_eq!(*state_grid.cell([0, 1]), CellState::Far);
    }

    #[test]
    fn rejecting_predicate_yields_empty_band() {
        let solver = EikonalSolver::new([1.0, 1.0], 1.0);
        let offsets = neighbor_offsets::<2>();
        let mut distance_grid = Grid::filled([3, 3], f64::INFINITY);
        let mut state_grid = Grid::filled([3, 3], CellState::Far);

        initialize_frozen_cells(&[[1, 1]], &[0.0], 1.0, &mut distance_grid, &mut state_grid);
        let result = initialize_narrow_band(
            &solver,
            &[[1, 1]],
            &offsets,
            &[[1.0, 0.0]],
            |_, _| false,
            &mut distance_grid,
            &mut state_grid,
        );

        assert!(matches!(result, Err(FmmError::EmptyNarrowBand)));
    }

    #[test]
    fn march_freezes_whole_grid() {
        let solver = EikonalSolver::new([1.0, 1.0], 1.0);
        let offsets = neighbor_offsets::<2>();
        let mut distance_grid = Grid::filled([5, 5], f64::INFINITY);
        let mut state_grid = Grid::filled([5, 5], CellState::Far);

        initialize_frozen_cells(&[[2, 2]], &[0.0], 1.0, &mut distance_grid, &mut state_grid);
        let mut band = initialize_narrow_band(
            &solver,
            &[[2, 2]],
            &offsets,
            &[[1.0, 0.0]],
            always,
            &mut distance_grid,
            &mut state_grid,
        )
        .unwrap();
        march_narrow_band(
            &solver,
            &offsets,
            &mut distance_grid,
            &mut state_grid,
            &mut band,
        )
        .unwrap();

        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(*state_grid.cell([i, j]), CellState::Frozen);
                assert!(distance_grid.cell([i, j]).is_finite());
            }
        }
        // Axis-aligned distances are exact.
        assert!((*distance_grid.cell([2, 0]) - 2.0).abs() < 1e-12);
        assert!((*distance_grid.cell([4, 2]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn march_extraction_order_is_monotone() {
        let solver = EikonalSolver::new([1.0, 1.0], 1.0);
        let offsets = neighbor_offsets::<2>();
        let mut distance_grid = Grid::filled([7, 7], f64::INFINITY);
        let mut state_grid = Grid::filled([7, 7], CellState::Far);

        initialize_frozen_cells(&[[3, 3]], &[0.0], 1.0, &mut distance_grid, &mut state_grid);
        let mut band = initialize_narrow_band(
            &solver,
            &[[3, 3]],
            &offsets,
            &[[1.0, 0.0]],
            always,
            &mut distance_grid,
            &mut state_grid,
        )
        .unwrap();

        let mut previous = f64::NEG_INFINITY;
        while !band.is_empty() {
            let (distance, index) = band.pop().unwrap();
            assert!(
                distance >= previous,
                "extraction order regressed: {} after {}",
                distance,
                previous
            );
            previous = distance;

            *distance_grid.cell_mut(index) = distance;
            *state_grid.cell_mut(index) = CellState::Frozen;
            update_neighbors(
                &solver,
                index,
                &offsets,
                [f64::NAN; 2],
                |_, _| true,
                &mut distance_grid,
                &mut state_grid,
                &mut band,
            )
            .unwrap();
        }
    }
}
