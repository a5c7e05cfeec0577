// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use eikonal_fmm::io;
use eikonal_fmm::seed::seeds_from_level_set;
use eikonal_fmm::{signed_distance, unsigned_distance};

#[derive(Parser)]
#[command(name = "eikonal-fmm", about = "Fast Marching Method distance field solver")]
struct Cli {
    /// Dimensionality (2 or 3)
    #[arg(short = 'd', long)]
    dim: usize,

    /// Grid size, comma-separated (e.g., 256,256 or 128,128,128)
    #[arg(short = 's', long)]
    size: String,

    /// Cell spacing per axis, comma-separated; a single value is broadcast
    #[arg(long, default_value = "1.0")]
    spacing: String,

    /// Propagation speed
    #[arg(long, default_value = "1.0")]
    speed: f64,

    /// Level-set field file (.npy or .mat, variable 'phi') to extract the
    /// interface from; mutually exclusive with --shape
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Analytic level set: "sphere:<radius>" or "box:<half-extents>"
    /// (comma-separated, one per axis), centered in the domain
    #[arg(long)]
    shape: Option<String>,

    /// Compute unsigned distance instead of signed
    #[arg(long)]
    unsigned: bool,

    /// Output file path (.npy or .mat)
    #[arg(short = 'o', long, default_value = "distance.npy")]
    output: PathBuf,

    /// Print a run summary to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn parse_list(s: &str, what: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid {}: expected comma-separated floats", what))
}

fn parse_size(s: &str, dim: usize) -> Result<Vec<usize>> {
    let parts: Vec<usize> = s
        .split(',')
        .map(|p| p.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("invalid --size: expected comma-separated integers")?;
    if parts.len() != dim {
        bail!("--size has {} components but --dim is {}", parts.len(), dim);
    }
    Ok(parts)
}

fn parse_spacing(s: &str, dim: usize) -> Result<Vec<f64>> {
    let parts = parse_list(s, "--spacing")?;
    match parts.len() {
        1 => Ok(vec![parts[0]; dim]),
        n if n == dim => Ok(parts),
        n => bail!("--spacing has {} components but --dim is {}", n, dim),
    }
}

/// Sample an analytic level set on the grid, centered in the domain.
fn build_level_set<const N: usize>(
    mode: &str,
    size: [usize; N],
    dx: [f64; N],
) -> Result<Vec<f64>> {
    let mut center = [0.0f64; N];
    for i in 0..N {
        center[i] = (size[i] - 1) as f64 * dx[i] / 2.0;
    }

    let total: usize = size.iter().product();

    if let Some(radius_str) = mode.strip_prefix("sphere:") {
        let radius: f64 = radius_str.parse().context("invalid sphere radius")?;
        if !radius.is_finite() || radius <= 0.0 {
            bail!("sphere radius must be positive and finite, got {}", radius);
        }

        let mut field = vec![0.0f64; total];
        for (k, value) in field.iter_mut().enumerate() {
            let index = eikonal_fmm::grid::delinearize(k, size);
            let mut dist_sq = 0.0;
            for i in 0..N {
                let diff = index[i] as f64 * dx[i] - center[i];
                dist_sq += diff * diff;
            }
            *value = dist_sq.sqrt() - radius;
        }
        return Ok(field);
    }

    if let Some(extents_str) = mode.strip_prefix("box:") {
        let extents = parse_list(extents_str, "box half-extents")?;
        if extents.len() != N {
            bail!(
                "box has {} half-extents but --dim is {}",
                extents.len(),
                N
            );
        }
        for &e in &extents {
            if !e.is_finite() || e <= 0.0 {
                bail!("box half-extents must be positive and finite, got {}", e);
            }
        }

        let mut field = vec![0.0f64; total];
        for (k, value) in field.iter_mut().enumerate() {
            let index = eikonal_fmm::grid::delinearize(k, size);
            let mut phi = f64::NEG_INFINITY;
            for i in 0..N {
                let diff = (index[i] as f64 * dx[i] - center[i]).abs() - extents[i];
                phi = phi.max(diff);
            }
            *value = phi;
        }
        return Ok(field);
    }

    bail!(
        "unknown --shape: '{}'. Expected 'sphere:<radius>' or 'box:<half-extents>'",
        mode
    );
}

fn run<const N: usize>(cli: &Cli, size: [usize; N], dx: [f64; N]) -> Result<()> {
    let start = Instant::now();

    let field = match (&cli.input, &cli.shape) {
        (Some(path), None) => {
            let shape: Vec<usize> = size.to_vec();
            io::load_field(path, &shape).map_err(|e| anyhow::anyhow!("{}", e))?
        }
        (None, Some(mode)) => build_level_set(mode, size, dx)?,
        (None, None) => bail!("one of --input or --shape must be specified"),
        (Some(_), Some(_)) => bail!("--input and --shape are mutually exclusive"),
    };

    let seeds = seeds_from_level_set(size, dx, &field).map_err(|e| anyhow::anyhow!("{}", e))?;

    let result = if cli.unsigned {
        unsigned_distance(
            size,
            dx,
            cli.speed,
            &seeds.indices,
            &seeds.distances,
            &seeds.normals,
        )
    } else {
        signed_distance(
            size,
            dx,
            cli.speed,
            &seeds.indices,
            &seeds.distances,
            &seeds.normals,
        )
    }
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    io::save_field(&result, &size, &cli.output).map_err(|e| anyhow::anyhow!("{}", e))?;

    if cli.verbose {
        let cells: usize = size.iter().product();
        eprintln!(
            "[{:.3}s] cells={} seeds={} mode={} -> {}",
            start.elapsed().as_secs_f64(),
            cells,
            seeds.len(),
            if cli.unsigned { "unsigned" } else { "signed" },
            cli.output.display(),
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.dim != 2 && cli.dim != 3 {
        bail!("--dim must be 2 or 3, got {}", cli.dim);
    }

    let size = parse_size(&cli.size, cli.dim)?;
    let spacing = parse_spacing(&cli.spacing, cli.dim)?;

    match cli.dim {
        2 => run(&cli, [size[0], size[1]], [spacing[0], spacing[1]]),
        3 => run(
            &cli,
            [size[0], size[1], size[2]],
            [spacing[0], spacing[1], spacing[2]],
        ),
        _ => unreachable!(),
    }
}
