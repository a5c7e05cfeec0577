// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::path::Path;

use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use crate::error::{FmmError, Result};

// Cell buffers in this crate run axis 0 fastest. That is Fortran order for
// an array of shape (s0, ..., s_{N-1}), so .npy files (C order on disk) are
// transposed on the way in and out, while .mat files (column-major) map to
// the buffer directly.

/// Load a scalar field from a .npy file.
///
/// Accepts f64 data, or f32 promoted to f64. The file shape must equal
/// `expected_shape`.
pub fn load_npy_field(path: &Path, expected_shape: &[usize]) -> Result<Vec<f64>> {
    // Try f64 first
    let arr: ArrayD<f64> = match ndarray_npy::read_npy(path) {
        Ok(a) => a,
        Err(_) => {
            // Try f32 and promote
            let arr32: ArrayD<f32> = ndarray_npy::read_npy(path)
                .map_err(|e| FmmError::UnsupportedDtype(format!("{}", e)))?;
            arr32.mapv(|v| v as f64)
        }
    };

    let got_shape: Vec<usize> = arr.shape().to_vec();
    if got_shape != expected_shape {
        return Err(FmmError::ShapeMismatch {
            expected: expected_shape.to_vec(),
            got: got_shape,
        });
    }

    // C-order file to axis-0-fastest buffer: flatten the transpose.
    Ok(arr.t().as_standard_layout().to_owned().into_raw_vec())
}

/// Save a scalar field to a .npy file.
pub fn save_npy(field: &[f64], shape: &[usize], path: &Path) -> Result<()> {
    let arr = ArrayD::from_shape_vec(IxDyn(shape).f(), field.to_vec())
        .map_err(|e| FmmError::Other(format!("shape error: {}", e)))?;
    let c_order = arr.as_standard_layout().to_owned();

    ndarray_npy::write_npy(path, &c_order)
        .map_err(|e| FmmError::Other(format!("npy write error: {}", e)))?;

    Ok(())
}

/// Load a scalar field from a .mat file.
///
/// MATLAB arrays are column-major, which matches the buffer layout here, so
/// the data is taken verbatim once the dimensions check out.
pub fn load_mat_field(
    path: &Path,
    variable_name: &str,
    expected_shape: &[usize],
) -> Result<Vec<f64>> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let mat = matfile::MatFile::parse(&mut reader)
        .map_err(|e| FmmError::Other(format!("MAT parse error: {}", e)))?;

    let available: Vec<String> = mat.arrays().iter().map(|a| a.name().to_string()).collect();

    let array = mat
        .find_by_name(variable_name)
        .ok_or_else(|| FmmError::MatVariableNotFound {
            expected: variable_name.to_string(),
            available,
        })?;

    let data: Vec<f64> = match array.data() {
        matfile::NumericData::Double { real, imag: _ } => real.clone(),
        matfile::NumericData::Single { real, imag: _ } => {
            real.iter().map(|&v| v as f64).collect()
        }
        _ => {
            return Err(FmmError::UnsupportedDtype(
                "MAT file array is not f64 or f32".to_string(),
            ))
        }
    };

    let mat_shape: Vec<usize> = array.size().to_vec();
    if mat_shape != expected_shape || data.len() != expected_shape.iter().product::<usize>() {
        return Err(FmmError::ShapeMismatch {
            expected: expected_shape.to_vec(),
            got: mat_shape,
        });
    }

    Ok(data)
}

/// Save a scalar field to a .mat file (Level 5 format).
///
/// A minimal hand-rolled writer: the `matfile` crate (v0.5) reads MAT files
/// but does not yet write them. Uncompressed, one real f64 array per file,
/// Level 5 only.
pub fn save_mat(field: &[f64], shape: &[usize], path: &Path, var_name: &str) -> Result<()> {
    if field.len() != shape.iter().product::<usize>() {
        return Err(FmmError::ShapeMismatch {
            expected: shape.to_vec(),
            got: vec![field.len()],
        });
    }
    // Column-major on disk, column-major in memory: no relayout.
    write_mat_level5(path, var_name, shape, field)
}

/// Write a single f64 array as an uncompressed MAT-File Level 5.
///
/// Layout per the MAT-File format documentation: a 128-byte header, then one
/// miMATRIX element whose sub-elements (array flags, dimensions, name,
/// real data) are each tagged and padded to 8-byte boundaries.
fn write_mat_level5(path: &Path, var_name: &str, dimensions: &[usize], data: &[f64]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut w = std::io::BufWriter::new(file);

    // Header: 116 bytes of text, 8 reserved bytes, version 0x0100, "IM"
    // endian marker (little-endian).
    let desc = b"MATLAB 5.0 MAT-file, created by eikonal-fmm";
    let mut header_text = [b' '; 116];
    header_text[..desc.len()].copy_from_slice(desc);
    w.write_all(&header_text)?;
    w.write_all(&[0u8; 8])?;
    w.write_all(&0x0100u16.to_le_bytes())?;
    w.write_all(b"IM")?;

    // Sub-element sizes, each tag(8) + data padded to 8 bytes.
    let array_flags_total: u32 = 16;

    let dims_data_size = (dimensions.len() * 4) as u32;
    let dims_padded = dims_data_size.div_ceil(8) * 8;
    let dims_total = 8 + dims_padded;

    let name_bytes = var_name.as_bytes();
    let name_data_size = name_bytes.len() as u32;
    let name_padded = name_data_size.div_ceil(8) * 8;
    let name_total = 8 + name_padded;

    let real_data_size = (data.len() * 8) as u32;
    let real_padded = real_data_size.div_ceil(8) * 8;
    let real_total = 8 + real_padded;

    let matrix_data_size = array_flags_total + dims_total + name_total + real_total;

    // miMATRIX tag.
    w.write_all(&14u32.to_le_bytes())?;
    w.write_all(&matrix_data_size.to_le_bytes())?;

    // Array flags: miUINT32 pair, class mxDOUBLE_CLASS = 6, no flags.
    w.write_all(&6u32.to_le_bytes())?;
    w.write_all(&8u32.to_le_bytes())?;
    w.write_all(&6u32.to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?;

    // Dimensions: miINT32 array.
    w.write_all(&5u32.to_le_bytes())?;
    w.write_all(&dims_data_size.to_le_bytes())?;
    for &d in dimensions {
        w.write_all(&(d as i32).to_le_bytes())?;
    }
    let dims_pad = (dims_padded - dims_data_size) as usize;
    if dims_pad > 0 {
        w.write_all(&vec![0u8; dims_pad])?;
    }

    // Name: miINT8 ASCII.
    w.write_all(&1u32.to_le_bytes())?;
    w.write_all(&name_data_size.to_le_bytes())?;
    w.write_all(name_bytes)?;
    let name_pad = (name_padded - name_data_size) as usize;
    if name_pad > 0 {
        w.write_all(&vec![0u8; name_pad])?;
    }

    // Real part: miDOUBLE, column-major.
    w.write_all(&9u32.to_le_bytes())?;
    w.write_all(&real_data_size.to_le_bytes())?;
    for &val in data {
        w.write_all(&val.to_le_bytes())?;
    }
    let real_pad = (real_padded - real_data_size) as usize;
    if real_pad > 0 {
        w.write_all(&vec![0u8; real_pad])?;
    }

    w.flush()?;
    Ok(())
}

/// Supported file formats for field I/O.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    /// NumPy .npy format.
    Npy,
    /// MATLAB .mat format (Level 5).
    Mat,
}

/// Infer file format from extension.
pub fn infer_format(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("npy") => Ok(FileFormat::Npy),
        Some("mat") => Ok(FileFormat::Mat),
        Some(ext) => Err(FmmError::UnsupportedFileFormat(ext.to_string())),
        None => Err(FmmError::UnsupportedFileFormat(
            "(no extension)".to_string(),
        )),
    }
}

/// Load a level-set field, inferring format from the extension.
///
/// MAT files are expected to store the field in a variable named `phi`.
pub fn load_field(path: &Path, expected_shape: &[usize]) -> Result<Vec<f64>> {
    match infer_format(path)? {
        FileFormat::Npy => load_npy_field(path, expected_shape),
        FileFormat::Mat => load_mat_field(path, "phi", expected_shape),
    }
}

/// Save a distance field, inferring format from the extension.
///
/// MAT output stores the field in a variable named `distance`.
pub fn save_field(field: &[f64], shape: &[usize], path: &Path) -> Result<()> {
    debug_assert_eq!(field.len(), shape.iter().product::<usize>());
    match infer_format(path)? {
        FileFormat::Npy => save_npy(field, shape, path),
        FileFormat::Mat => save_mat(field, shape, path, "distance"),
    }
}
