//! SMART numerical constants and model contract.
//!
//! Centralises all fixed values used throughout the sub-surface model.

// -- Soil column --

/// Number of stacked soil layers of equal capacity.
pub const N_LAYERS: usize = 6;

/// Fraction of layer capacity each layer holds at initialisation.
pub const INITIAL_LAYER_FILL: f64 = 0.5;

// -- Model contract constants --

/// Parameter names in canonical order.
pub const PARAM_NAMES: &[&str] = &[
    "theta_c", "theta_h", "theta_d", "theta_s", "theta_z", "theta_sk", "theta_fk", "theta_gk",
];

/// Number of parameters.
pub const N_PARAMS: usize = 8;

/// Number of routing reservoirs.
pub const N_RESERVOIRS: usize = 5;

/// Flat state layout: six soil layers, then overland, drain, inter,
/// shallow groundwater and deep groundwater stores.
pub const STATE_SIZE: usize = N_LAYERS + N_RESERVOIRS;

// -- Parameter bounds --

/// Parameter validity bounds.
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Ratio parameters are dimensionless fractions.
const RATIO: Bounds = Bounds { min: 0.0, max: 1.0 };

/// Depths and residence times must be strictly positive and finite.
const POSITIVE: Bounds = Bounds {
    min: f64::MIN_POSITIVE,
    max: f64::MAX,
};

/// Evaporation decay coefficient [-].
pub const THETA_C_BOUNDS: Bounds = RATIO;

/// Quick runoff ratio [-].
pub const THETA_H_BOUNDS: Bounds = RATIO;

/// Drain flow ratio [-].
pub const THETA_D_BOUNDS: Bounds = RATIO;

/// Soil outflow coefficient [-].
pub const THETA_S_BOUNDS: Bounds = RATIO;

/// Effective soil depth [kg m-2].
pub const THETA_Z_BOUNDS: Bounds = POSITIVE;

/// Surface (overland and drain) reservoir residence time [s].
pub const THETA_SK_BOUNDS: Bounds = POSITIVE;

/// Interflow reservoir residence time [s].
pub const THETA_FK_BOUNDS: Bounds = POSITIVE;

/// Groundwater reservoir residence time [s].
pub const THETA_GK_BOUNDS: Bounds = POSITIVE;

/// All bounds in parameter order.
pub const ALL_BOUNDS: [&Bounds; N_PARAMS] = [
    &THETA_C_BOUNDS,
    &THETA_H_BOUNDS,
    &THETA_D_BOUNDS,
    &THETA_S_BOUNDS,
    &THETA_Z_BOUNDS,
    &THETA_SK_BOUNDS,
    &THETA_FK_BOUNDS,
    &THETA_GK_BOUNDS,
];

/// Parameter bounds as (min, max) tuples, in PARAM_NAMES order.
pub const PARAM_BOUNDS: &[(f64, f64)] = &[
    (THETA_C_BOUNDS.min, THETA_C_BOUNDS.max),
    (THETA_H_BOUNDS.min, THETA_H_BOUNDS.max),
    (THETA_D_BOUNDS.min, THETA_D_BOUNDS.max),
    (THETA_S_BOUNDS.min, THETA_S_BOUNDS.max),
    (THETA_Z_BOUNDS.min, THETA_Z_BOUNDS.max),
    (THETA_SK_BOUNDS.min, THETA_SK_BOUNDS.max),
    (THETA_FK_BOUNDS.min, THETA_FK_BOUNDS.max),
    (THETA_GK_BOUNDS.min, THETA_GK_BOUNDS.max),
];
