// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::grid::{inside, offset_index, CellState, Grid};

const EPS: f64 = 1e-9;

/// Upwind Eikonal solver for a uniform, isotropic speed.
///
/// Computes the tentative arrival time at a cell from its frozen
/// axis-neighbors by solving the first-order Godunov discretization of
/// |∇T|·F = 1 as a quadratic in T. Stateless apart from the precomputed
/// reciprocal-squared spacings; shared read-only by the marcher.
#[derive(Debug, Clone)]
pub struct EikonalSolver<const N: usize> {
    inv_dx_squared: [f64; N],
    inv_speed_squared: f64,
}

impl<const N: usize> EikonalSolver<N> {
    /// Create a solver for the given cell spacing and speed.
    ///
    /// Callers validate that every `dx[i]` and `speed` are positive before
    /// constructing the solver.
    pub fn new(dx: [f64; N], speed: f64) -> Self {
        let mut inv_dx_squared = [0.0f64; N];
        for i in 0..N {
            inv_dx_squared[i] = 1.0 / (dx[i] * dx[i]);
        }
        EikonalSolver {
            inv_dx_squared,
            inv_speed_squared: 1.0 / (speed * speed),
        }
    }

    /// Tentative distance at `index` from its frozen axis-neighbors.
    ///
    /// Per axis, the smaller-distance frozen neighbor (if any) contributes
    /// one upwind difference term; axes with no frozen neighbor are
    /// skipped. `offsets` must be the pairing produced by
    /// [`crate::grid::neighbor_offsets`]: `+e_i` at `2*i`, `-e_i` at
    /// `2*i + 1`. Returns the larger real root of the assembled quadratic,
    /// which is the arrival time (the smaller root precedes the upwind
    /// neighbors' times and is spurious).
    pub fn solve(
        &self,
        index: [i32; N],
        offsets: &[[i32; N]],
        distance_grid: &Grid<f64, N>,
        state_grid: &Grid<CellState, N>,
    ) -> f64 {
        debug_assert!(inside(index, distance_grid.size()));
        debug_assert_eq!(offsets.len(), 2 * N);

        let mut c = -self.inv_speed_squared;
        let mut b = 0.0f64;
        let mut a = 0.0f64;

        for i in 0..N {
            let mut min_frozen_neighbor_distance = f64::INFINITY;
            for j in 0..2 {
                let neighbor_index = offset_index(index, offsets[2 * i + j]);
                if inside(neighbor_index, distance_grid.size())
                    && *state_grid.cell(neighbor_index) == CellState::Frozen
                {
                    min_frozen_neighbor_distance =
                        min_frozen_neighbor_distance.min(*distance_grid.cell(neighbor_index));
                }
            }

            if min_frozen_neighbor_distance < f64::INFINITY {
                let u = min_frozen_neighbor_distance;
                let w = self.inv_dx_squared[i];
                c += u * u * w;
                b += -2.0 * u * w;
                a += w;
            }
        }

        let (root, _) = solve_quadratic([c, b, a]);
        debug_assert!(!root.is_nan());
        debug_assert!(root >= 0.0);
        root
    }
}

/// Real roots of `coefficients[2]*x^2 + coefficients[1]*x +
/// coefficients[0] = 0`, larger root first; NaN where no (acceptable) real
/// root exists.
///
/// The two-root branch picks the first root by the sign of `b` so the
/// subtraction never cancels, and derives the second as `c/(a*r0)`.
fn solve_quadratic(coefficients: [f64; 3]) -> (f64, f64) {
    let c = coefficients[0];
    let b = coefficients[1];
    let a = coefficients[2];

    if a.abs() < EPS {
        if b.abs() < EPS {
            // c = 0: no solutions (or every x, if c is itself zero).
            return (f64::NAN, f64::NAN);
        }
        // bx + c = 0, one solution.
        return (-c / b, f64::NAN);
    }

    if b.abs() < EPS {
        // ax^2 + c = 0; NaN propagates if -c/a is negative.
        let r = (-c / a).sqrt();
        return (r, -r);
    }

    let discriminant_squared = b * b - 4.0 * a * c;
    if discriminant_squared <= EPS {
        // Complex (or numerically indistinct) solution.
        return (f64::NAN, f64::NAN);
    }
    let discriminant = discriminant_squared.sqrt();

    let r0 = if b < 0.0 {
        (-b + discriminant) / (2.0 * a)
    } else {
        (-b - discriminant) / (2.0 * a)
    };
    let r1 = c / (a * r0);
    (r0.max(r1), r0.min(r1))
}
