//! Headerless float64 arrays on disk.
//!
//! Every array file is a plain dump of little-endian `f64` values with no
//! length prefix; the element count is implied by the byte length (or by the
//! paired count file for grid output).

use std::fs;
use std::path::Path;

use crate::constants::F64_BYTES;
use crate::error::{GridError, Result};

/// Encode values as raw little-endian float64 bytes.
pub fn encode_f64(values: &[f64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * F64_BYTES);
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode raw little-endian float64 bytes. `None` if the length is not a
/// multiple of eight.
pub fn decode_f64(bytes: &[u8]) -> Option<Vec<f64>> {
    if bytes.len() % F64_BYTES != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(F64_BYTES)
            .map(|chunk| {
                let mut buf = [0u8; F64_BYTES];
                buf.copy_from_slice(chunk);
                f64::from_le_bytes(buf)
            })
            .collect(),
    )
}

/// Read an entire float64 file into memory.
pub fn read_f64_file<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| GridError::io(path, e))?;
    decode_f64(&bytes).ok_or_else(|| GridError::MalformedArray {
        path: path.to_path_buf(),
        len: bytes.len(),
    })
}

/// Write a float64 file, replacing any existing content.
pub fn write_f64_file<P: AsRef<Path>>(path: P, values: &[f64]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, encode_f64(values)).map_err(|e| GridError::io(path, e))
}
