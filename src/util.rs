use std::io::BufRead;

use ndarray::ArrayViewMut1;

use crate::error::{Error, Result};

/// Normalize a vector to unit length, returning its original norm.
///
/// The vector is left untouched if its norm is zero. The squared norm
/// is accumulated in `f64`, so that components that are very large or
/// very small do not overflow or underflow when squared.
pub fn l2_normalize(mut v: ArrayViewMut1<f32>) -> f32 {
    let norm = v
        .iter()
        .map(|&component| f64::from(component).powi(2))
        .sum::<f64>()
        .sqrt();

    if norm != 0. {
        v.mapv_inplace(|component| (f64::from(component) / norm) as f32);
    }

    norm as f32
}

pub fn read_number(reader: &mut dyn BufRead, delim: u8) -> Result<usize> {
    let field_str = read_string(reader, delim)?;
    field_str.trim().parse().map_err(|e| {
        Error::Format(format!(
            "Cannot parse shape component '{}': {}",
            field_str, e
        ))
    })
}

pub fn read_string(reader: &mut dyn BufRead, delim: u8) -> Result<String> {
    let mut buf = Vec::new();
    reader
        .read_until(delim, &mut buf)
        .map_err(|e| Error::read_error("Cannot read string", e))?;
    if buf.last() == Some(&delim) {
        buf.pop();
    }

    String::from_utf8(buf)
        .map_err(|e| Error::Format(format!("Token contains invalid UTF-8: {}", e)))
}
