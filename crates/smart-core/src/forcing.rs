use crate::error::{Result, SmartError};

/// Validated forcing timeseries for a single SMART cell.
///
/// Both series are mass fluxes [kg m-2 s-1] handed over by the surface
/// layer. All arrays must have the same length; NaN and negative values
/// are rejected.
#[derive(Debug, Clone)]
pub struct ForcingData {
    /// Canopy liquid throughfall and snow melt flux.
    pub throughfall: Vec<f64>,
    /// Transpiration flux from root uptake (unmet evaporative demand).
    pub transpiration: Vec<f64>,
    /// Timestep length [s].
    pub dt: f64,
}

impl ForcingData {
    /// Create new ForcingData with validation.
    ///
    /// Validates:
    /// - throughfall and transpiration have the same length
    /// - arrays are non-empty
    /// - no NaN or negative values in either array
    /// - dt is strictly positive and finite
    pub fn new(throughfall: Vec<f64>, transpiration: Vec<f64>, dt: f64) -> Result<Self> {
        if throughfall.is_empty() {
            return Err(SmartError::InvalidForcing(
                "throughfall array is empty".to_string(),
            ));
        }
        if throughfall.len() != transpiration.len() {
            return Err(SmartError::shape_mismatch(
                "transpiration",
                throughfall.len(),
                transpiration.len(),
            ));
        }
        check_series("throughfall", &throughfall)?;
        check_series("transpiration", &transpiration)?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SmartError::InvalidForcing(format!(
                "timestep must be positive, got {dt}"
            )));
        }
        Ok(Self {
            throughfall,
            transpiration,
            dt,
        })
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.throughfall.len()
    }

    /// Returns `true` if there are no timesteps.
    pub fn is_empty(&self) -> bool {
        self.throughfall.is_empty()
    }
}

/// Reject NaN and negative fluxes.
pub(crate) fn check_series(name: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(SmartError::InvalidForcing(format!(
            "{name} array contains NaN values"
        )));
    }
    if let Some(v) = values.iter().find(|v| **v < 0.0) {
        return Err(SmartError::InvalidForcing(format!(
            "{name} array contains negative value {v}"
        )));
    }
    Ok(())
}
