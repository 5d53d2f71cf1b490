/// SMART sub-surface parameters.
///
/// Eight immutable per-cell parameters, validated once at construction so
/// the step never divides by a zero or negative residence time.
use serde::{Deserialize, Serialize};

use super::constants::{ALL_BOUNDS, N_LAYERS, N_PARAMS, PARAM_BOUNDS, PARAM_NAMES};
use crate::error::{Result, SmartError};
use crate::traits::ModelParams;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Evaporation decay coefficient [-].
    pub theta_c: f64,
    /// Quick runoff ratio [-].
    pub theta_h: f64,
    /// Drain flow ratio [-].
    pub theta_d: f64,
    /// Soil outflow coefficient [-].
    pub theta_s: f64,
    /// Effective soil depth [kg m-2].
    pub theta_z: f64,
    /// Overland and drain reservoir residence time [s].
    pub theta_sk: f64,
    /// Interflow reservoir residence time [s].
    pub theta_fk: f64,
    /// Shallow and deep groundwater reservoir residence time [s].
    pub theta_gk: f64,
}

impl Parameters {
    /// Create new Parameters, returning an error if any value is out of bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        theta_c: f64,
        theta_h: f64,
        theta_d: f64,
        theta_s: f64,
        theta_z: f64,
        theta_sk: f64,
        theta_fk: f64,
        theta_gk: f64,
    ) -> Result<Self> {
        let p = Self {
            theta_c,
            theta_h,
            theta_d,
            theta_s,
            theta_z,
            theta_sk,
            theta_fk,
            theta_gk,
        };
        p.validate()?;
        Ok(p)
    }

    /// Check every value against its bounds.
    ///
    /// Deserialized parameters bypass `new`, so configuration loading calls
    /// this explicitly.
    pub fn validate(&self) -> Result<()> {
        for (i, &value) in self.as_array().iter().enumerate() {
            let bounds = ALL_BOUNDS[i];
            // NaN fails `contains`, so it is rejected here too.
            if !(bounds.min..=bounds.max).contains(&value) {
                return Err(SmartError::InvalidParameter {
                    name: PARAM_NAMES[i],
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }

    /// Capacity of a single soil layer [kg m-2].
    pub fn layer_capacity(&self) -> f64 {
        self.theta_z / N_LAYERS as f64
    }

    /// Convert to an 8-element array in canonical order.
    pub fn as_array(&self) -> [f64; N_PARAMS] {
        [
            self.theta_c,
            self.theta_h,
            self.theta_d,
            self.theta_s,
            self.theta_z,
            self.theta_sk,
            self.theta_fk,
            self.theta_gk,
        ]
    }
}

impl ModelParams for Parameters {
    const N_PARAMS: usize = N_PARAMS;
    const PARAM_NAMES: &'static [&'static str] = PARAM_NAMES;
    const PARAM_BOUNDS: &'static [(f64, f64)] = PARAM_BOUNDS;

    fn from_array(arr: &[f64]) -> Result<Self> {
        if arr.len() != N_PARAMS {
            return Err(SmartError::ParameterCount {
                expected: N_PARAMS,
                actual: arr.len(),
            });
        }
        Self::new(
            arr[0], arr[1], arr[2], arr[3], arr[4], arr[5], arr[6], arr[7],
        )
    }

    fn to_array(&self) -> Vec<f64> {
        self.as_array().to_vec()
    }
}
