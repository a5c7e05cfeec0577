// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{FmmError, Result};
use crate::grid::{delinearize, inside, linear_size, offset_index, Grid};

/// Parallel seed arrays in the form the distance drivers take them.
#[derive(Debug, Clone, Default)]
pub struct SeedSet<const N: usize> {
    /// Interface cell indices, all inside the grid.
    pub indices: Vec<[i32; N]>,
    /// Signed sub-cell distances to the zero crossing (negative inside).
    pub distances: Vec<f64>,
    /// Outward unit normals estimated from the field gradient.
    pub normals: Vec<[f64; N]>,
}

impl<const N: usize> SeedSet<N> {
    /// Number of seeds.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the set holds no seeds.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Extract interface seeds from a sampled implicit field.
///
/// A cell is an interface cell when the sign of `field` flips toward some
/// axis-neighbor (negative is inside; zero counts as outside). Each
/// interface cell becomes one seed:
///
/// - its distance is the sub-cell distance to the zero crossing, by linear
///   interpolation `dx[axis] * |phi| / (|phi| + |phi_neighbor|)`, minimized
///   over all crossing axes and signed like the field value;
/// - its normal is the central-difference gradient of the field (one-sided
///   at the boundary), normalized. When the gradient degenerates the normal
///   falls back to the unit vector of the first crossing axis, oriented
///   toward increasing field values, so the squared magnitude never drops
///   below the 0.25 the signed driver requires.
///
/// `field` is the row-major cell buffer of a grid of the given size.
///
/// # Errors
/// `ShapeMismatch` if the buffer length does not match the size;
/// `InvalidSpacing` for a non-positive spacing; `NoInterface` if the field
/// never changes sign.
pub fn seeds_from_level_set<const N: usize>(
    size: [usize; N],
    dx: [f64; N],
    field: &[f64],
) -> Result<SeedSet<N>> {
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
    if field.len() != linear_size(size) {
        return Err(FmmError::ShapeMismatch {
            expected: size.to_vec(),
            got: vec![field.len()],
        });
    }

    let phi = Grid::from_parts(size, field.to_vec());
    let is_inside_region = |index: [i32; N]| *phi.cell(index) < 0.0;

    let mut seeds = SeedSet::default();

    for k in 0..field.len() {
        let index = delinearize(k, size);
        let value = *phi.cell(index);
        if value.is_nan() {
            return Err(FmmError::Other(format!(
                "field value at cell {} is NaN",
                k
            )));
        }
        let negative = is_inside_region(index);

        // Smallest sub-cell crossing distance over all flipping axes.
        let mut min_distance = f64::INFINITY;
        let mut first_crossing: Option<(usize, i32)> = None;

        for axis in 0..N {
            for step in [1i32, -1] {
                let mut offset = [0i32; N];
                offset[axis] = step;
                let neighbor = offset_index(index, offset);
                if !inside(neighbor, size) {
                    continue;
                }
                if is_inside_region(neighbor) == negative {
                    continue;
                }

                if first_crossing.is_none() {
                    first_crossing = Some((axis, step));
                }

                let magnitude = value.abs();
                let neighbor_magnitude = phi.cell(neighbor).abs();
                let denominator = magnitude + neighbor_magnitude;
                let crossing = if denominator > 1e-12 {
                    dx[axis] * magnitude / denominator
                } else {
                    dx[axis] * 0.5
                };
                min_distance = min_distance.min(crossing);
            }
        }

        let (first_axis, first_step) = match first_crossing {
            Some(crossing) => crossing,
            None => continue,
        };

        let distance = if negative { -min_distance } else { min_distance };
        let normal = gradient_normal(&phi, index, dx).unwrap_or_else(|| {
            // Degenerate gradient: point along the crossing axis, toward
            // increasing field values.
            let mut fallback = [0.0f64; N];
            fallback[first_axis] = if negative {
                first_step as f64
            } else {
                -(first_step as f64)
            };
            fallback
        });

        seeds.indices.push(index);
        seeds.distances.push(distance);
        seeds.normals.push(normal);
    }

    if seeds.is_empty() {
        return Err(FmmError::NoInterface);
    }

    Ok(seeds)
}

/// Normalized field gradient at `index`, or None when it degenerates.
///
/// Central differences where both neighbors exist, one-sided at the grid
/// boundary.
fn gradient_normal<const N: usize>(
    phi: &Grid<f64, N>,
    index: [i32; N],
    dx: [f64; N],
) -> Option<[f64; N]> {
    let size = phi.size();
    let mut gradient = [0.0f64; N];

    for axis in 0..N {
        let mut forward = index;
        forward[axis] += 1;
        let mut backward = index;
        backward[axis] -= 1;

        let has_forward = inside(forward, size);
        let has_backward = inside(backward, size);

        gradient[axis] = match (has_forward, has_backward) {
            (true, true) => (*phi.cell(forward) - *phi.cell(backward)) / (2.0 * dx[axis]),
            (true, false) => (*phi.cell(forward) - *phi.cell(index)) / dx[axis],
            (false, true) => (*phi.cell(index) - *phi.cell(backward)) / dx[axis],
            (false, false) => 0.0,
        };
    }

    let magnitude: f64 = gradient.iter().map(|&g| g * g).sum::<f64>().sqrt();
    if magnitude < 1e-12 {
        return None;
    }
    for g in gradient.iter_mut() {
        *g /= magnitude;
    }
    Some(gradient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_interface_1d() {
        // phi(x) = x - 2.5 sampled at x = 0..4.
        let field = [-2.5, -1.5, -0.5, 0.5, 1.5];
        let seeds = seeds_from_level_set([5], [1.0], &field).unwrap();

        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds.indices, vec![[2], [3]]);
        assert!((seeds.distances[0] - (-0.5)).abs() < 1e-12);
        assert!((seeds.distances[1] - 0.5).abs() < 1e-12);
        assert!((seeds.normals[0][0] - 1.0).abs() < 1e-12);
        assert!((seeds.normals[1][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_interface_fails() {
        let field = [1.0, 2.0, 3.0];
        let result = seeds_from_level_set([3], [1.0], &field);
        assert!(matches!(result, Err(FmmError::NoInterface)));
    }

    #[test]
    fn buffer_length_checked() {
        let field = [1.0, -1.0];
        let result = seeds_from_level_set([3], [1.0], &field);
        assert!(matches!(result, Err(FmmError::ShapeMismatch { .. })));
    }

    #[test]
    fn circle_interface_2d() {
        // phi = |x - c| - r on an 11x11 unit grid.
        let n = 11usize;
        let center = 5.0;
        let radius = 3.2;
        let mut field = vec![0.0f64; n * n];
        for j in 0..n {
            for i in 0..n {
                let x = i as f64 - center;
                let y = j as f64 - center;
                field[i + j * n] = (x * x + y * y).sqrt() - radius;
            }
        }

        let seeds = seeds_from_level_set([n, n], [1.0, 1.0], &field).unwrap();
        assert!(!seeds.is_empty());

        for (pos, index) in seeds.indices.iter().enumerate() {
            // Every seed hugs the circle.
            let x = index[0] as f64 - center;
            let y = index[1] as f64 - center;
            let to_interface = (x * x + y * y).sqrt() - radius;
            assert!(
                to_interface.abs() <= 1.0 + 1e-9,
                "seed {:?} is {} from the interface",
                index,
                to_interface
            );

            // Sub-cell distance has the field's sign and stays within a cell.
            let d = seeds.distances[pos];
            assert_eq!(d < 0.0, to_interface < 0.0, "sign mismatch at {:?}", index);
            assert!(d.abs() <= 1.0 + 1e-9);

            // Normals are unit and roughly radial.
            let normal = seeds.normals[pos];
            let magnitude = (normal[0] * normal[0] + normal[1] * normal[1]).sqrt();
            assert!((magnitude - 1.0).abs() < 1e-9);
            let r = (x * x + y * y).sqrt();
            if r > 1e-9 {
                let radial = (normal[0] * x + normal[1] * y) / r;
                assert!(
                    radial > 0.5,
                    "normal at {:?} not outward: dot {}",
                    index,
                    radial
                );
            }
        }
    }

    #[test]
    fn degenerate_gradient_falls_back_to_crossing_axis() {
        // Symmetric field: gradient vanishes at the center cell, which
        // still crosses toward both neighbors.
        let field = [1.0, -1.0, 1.0];
        let seeds = seeds_from_level_set([3], [1.0], &field).unwrap();

        let pos = seeds.indices.iter().position(|&i| i == [1]).unwrap();
        let normal = seeds.normals[pos];
        let squared: f64 = normal.iter().map(|&v| v * v).sum();
        assert!(squared >= 0.25);
    }
}
