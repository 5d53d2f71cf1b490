/// SMART model state variables.
///
/// State carried from one timestep to the next for a single cell:
/// - `soil_layers`: six soil moisture levels, top to bottom [kg m-2]
/// - five routing reservoir volumes [kg m-2]
use serde::{Deserialize, Serialize};

use super::constants::{INITIAL_LAYER_FILL, N_LAYERS, STATE_SIZE};
use super::params::Parameters;
use crate::error::{Result, SmartError};
use crate::traits::ModelState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub soil_layers: [f64; N_LAYERS],
    pub overland_store: f64,
    pub drain_store: f64,
    pub inter_store: f64,
    pub shallow_gw_store: f64,
    pub deep_gw_store: f64,
}

impl State {
    /// Create initial state from parameters.
    ///
    /// Every soil layer starts half full, every reservoir empty.
    pub fn initialize(params: &Parameters) -> Self {
        Self {
            soil_layers: [INITIAL_LAYER_FILL * params.layer_capacity(); N_LAYERS],
            overland_store: 0.0,
            drain_store: 0.0,
            inter_store: 0.0,
            shallow_gw_store: 0.0,
            deep_gw_store: 0.0,
        }
    }

    /// Total water held across the six soil layers [kg m-2].
    pub fn soil_water(&self) -> f64 {
        self.soil_layers.iter().sum()
    }

    /// Whether every layer sits within `[0, capacity]` and every store is
    /// non-negative.
    pub fn is_physical(&self, params: &Parameters) -> bool {
        let capacity = params.layer_capacity();
        self.soil_layers
            .iter()
            .all(|&l| (0.0..=capacity).contains(&l))
            && self.stores().iter().all(|&s| s >= 0.0)
    }

    /// Like [`State::is_physical`], as an error naming the cell.
    pub fn check_physical(&self, params: &Parameters, cell: usize) -> Result<()> {
        if self.is_physical(params) {
            Ok(())
        } else {
            Err(SmartError::UnphysicalState { cell })
        }
    }

    /// Reservoir volumes in pathway order: overland, drain, inter,
    /// shallow groundwater, deep groundwater.
    pub fn stores(&self) -> [f64; 5] {
        [
            self.overland_store,
            self.drain_store,
            self.inter_store,
            self.shallow_gw_store,
            self.deep_gw_store,
        ]
    }

    /// Convert state to a flat array of 11 elements.
    ///
    /// Layout: [soil_layers[0:6], overland, drain, inter, shallow_gw, deep_gw]
    pub fn to_array(&self) -> [f64; STATE_SIZE] {
        let mut arr = [0.0; STATE_SIZE];
        arr[..N_LAYERS].copy_from_slice(&self.soil_layers);
        arr[N_LAYERS..].copy_from_slice(&self.stores());
        arr
    }

    /// Reconstruct State from a flat array of 11 elements.
    pub fn from_array(arr: &[f64; STATE_SIZE]) -> Self {
        let mut soil_layers = [0.0; N_LAYERS];
        soil_layers.copy_from_slice(&arr[..N_LAYERS]);
        Self {
            soil_layers,
            overland_store: arr[N_LAYERS],
            drain_store: arr[N_LAYERS + 1],
            inter_store: arr[N_LAYERS + 2],
            shallow_gw_store: arr[N_LAYERS + 3],
            deep_gw_store: arr[N_LAYERS + 4],
        }
    }
}

impl ModelState for State {
    fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    fn from_slice(arr: &[f64]) -> Result<Self> {
        let fixed: &[f64; STATE_SIZE] =
            arr.try_into().map_err(|_| SmartError::StateLength {
                expected: STATE_SIZE,
                actual: arr.len(),
            })?;
        Ok(Self::from_array(fixed))
    }

    fn array_len(&self) -> usize {
        STATE_SIZE
    }
}
