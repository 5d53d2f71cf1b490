use numpy::{PyReadonlyArray1, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use smart_core::SmartError;

/// Map a core error onto `ValueError`.
pub fn value_error(e: SmartError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Validate that a numpy array is C-contiguous and return its slice.
pub fn contiguous_slice<'py>(arr: &'py PyReadonlyArray1<'py, f64>) -> PyResult<&'py [f64]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Validate length + contiguity of a numpy array.
pub fn checked_slice<'py>(
    arr: &'py PyReadonlyArray1<'py, f64>,
    expected_len: usize,
    name: &str,
) -> PyResult<&'py [f64]> {
    let slice = contiguous_slice(arr)?;
    if slice.len() != expected_len {
        return Err(PyValueError::new_err(format!(
            "{} must have {} elements, got {}",
            name,
            expected_len,
            slice.len()
        )));
    }
    Ok(slice)
}

/// Validate column count + contiguity of a 2D numpy array.
///
/// Returns the row-major data and the number of rows.
pub fn checked_rows<'py>(
    arr: &'py PyReadonlyArray2<'py, f64>,
    n_cols: usize,
    name: &str,
) -> PyResult<(&'py [f64], usize)> {
    let shape = arr.shape();
    if shape[1] != n_cols {
        return Err(PyValueError::new_err(format!(
            "{} must have {} columns, got {}",
            name, n_cols, shape[1]
        )));
    }
    let data = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err(format!("{} must be C-contiguous", name)))?;
    Ok((data, shape[0]))
}
