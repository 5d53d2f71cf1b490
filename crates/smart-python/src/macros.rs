/// Generate a frozen `#[pyclass]` struct where each field is `f64`.
///
/// Also generates a `from_core()` method that copies values from the
/// corresponding Rust struct.
macro_rules! define_step_result {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident from $core_type:ty {
            $($field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[pyo3::pyclass(frozen)]
        $vis struct $name {
            $(
                #[pyo3(get)]
                pub $field: f64,
            )+
        }

        impl $name {
            pub fn from_core(f: &$core_type) -> Self {
                Self {
                    $(
                        $field: f.$field,
                    )+
                }
            }
        }
    };
}

/// Convert a derived `*Timeseries` struct into a `PyDict` of numpy arrays,
/// one entry per flux column.
macro_rules! timeseries_to_dict {
    ($py:expr, $ts:expr) => {{
        let dict = pyo3::types::PyDict::new($py);
        for (name, values) in $ts.columns() {
            dict.set_item(name, numpy::PyArray1::from_slice($py, values))?;
        }
        dict
    }};
}

/// Convert a single-timestep flux struct into a `PyDict` of floats.
macro_rules! fluxes_to_dict {
    ($py:expr, $f:expr, $ty:ty) => {{
        let dict = pyo3::types::PyDict::new($py);
        for (name, value) in <$ty>::field_names().iter().zip($f.values()) {
            dict.set_item(*name, value)?;
        }
        dict
    }};
}
