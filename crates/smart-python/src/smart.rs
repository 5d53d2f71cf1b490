use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::convert::{checked_rows, checked_slice, contiguous_slice, value_error};

use smart_core::forcing::ForcingData;
use smart_core::smart::constants::{N_PARAMS, PARAM_NAMES, STATE_SIZE};
use smart_core::smart::fluxes::{Fluxes, Outwards};
use smart_core::smart::params::Parameters;
use smart_core::smart::run;
use smart_core::smart::state::State;
use smart_core::traits::{ModelParams, ModelState};
use smart_core::Grid;

define_step_result! {
    /// Outward fluxes of one SMART timestep.
    pub struct SmartOutwards from Outwards {
        surface_runoff_flux_delivered_to_rivers,
        net_groundwater_flux_to_rivers,
        soil_water_stress_for_transpiration,
    }
}

fn parse_params(params: &PyReadonlyArray1<'_, f64>) -> PyResult<Parameters> {
    let p_slice = checked_slice(params, N_PARAMS, "params")?;
    Parameters::from_array(p_slice).map_err(value_error)
}

fn parse_state(
    state: &PyReadonlyArray1<'_, f64>,
    params: &Parameters,
    name: &str,
) -> PyResult<State> {
    let s_slice = checked_slice(state, STATE_SIZE, name)?;
    let s = State::from_slice(s_slice).map_err(value_error)?;
    s.check_physical(params, 0).map_err(value_error)?;
    Ok(s)
}

/// Run SMART over a timeseries for one cell.
///
/// Returns (fluxes_dict, final_state_array).
#[pyfunction]
#[pyo3(signature = (params, throughfall, transpiration, dt, initial_state=None))]
fn smart_run<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    throughfall: PyReadonlyArray1<'py, f64>,
    transpiration: PyReadonlyArray1<'py, f64>,
    dt: f64,
    initial_state: Option<PyReadonlyArray1<'py, f64>>,
) -> PyResult<(Bound<'py, PyDict>, Bound<'py, PyArray1<f64>>)> {
    let p = parse_params(&params)?;
    let state = match &initial_state {
        Some(s) => Some(parse_state(s, &p, "initial_state")?),
        None => None,
    };

    let forcing = ForcingData::new(
        contiguous_slice(&throughfall)?.to_vec(),
        contiguous_slice(&transpiration)?.to_vec(),
        dt,
    )
    .map_err(value_error)?;

    let (result, final_state) = py.allow_threads(|| run::run(&p, &forcing, state.as_ref()));

    let dict = timeseries_to_dict!(py, result);
    Ok((dict, PyArray1::from_slice(py, &final_state.to_array())))
}

/// Execute one SMART timestep for one cell.
///
/// Returns (new_state_array, fluxes_dict).
#[pyfunction]
fn smart_step<'py>(
    py: Python<'py>,
    state: PyReadonlyArray1<'py, f64>,
    params: PyReadonlyArray1<'py, f64>,
    throughfall: f64,
    transpiration: f64,
    dt: f64,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyDict>)> {
    let p = parse_params(&params)?;
    let s = parse_state(&state, &p, "state")?;
    ForcingData::new(vec![throughfall], vec![transpiration], dt).map_err(value_error)?;

    let (new_state, fluxes) = run::step(&s, &p, throughfall, transpiration, dt);

    let state_arr = PyArray1::from_slice(py, &new_state.to_array());
    let dict = fluxes_to_dict!(py, fluxes, Fluxes);
    Ok((state_arr, dict))
}

/// Outward fluxes of a single timestep as a typed object.
#[pyfunction]
fn smart_step_outwards(
    state: PyReadonlyArray1<'_, f64>,
    params: PyReadonlyArray1<'_, f64>,
    throughfall: f64,
    transpiration: f64,
    dt: f64,
) -> PyResult<SmartOutwards> {
    let p = parse_params(&params)?;
    let s = parse_state(&state, &p, "state")?;
    ForcingData::new(vec![throughfall], vec![transpiration], dt).map_err(value_error)?;

    let (_, fluxes) = run::step(&s, &p, throughfall, transpiration, dt);
    Ok(SmartOutwards::from_core(&Outwards::from(&fluxes)))
}

/// Advance a grid of cells by one timestep.
///
/// `params` is (n_cells, 8), `states` is (n_cells, 11), forcing arrays hold
/// one flux per cell. Returns (new_states, outwards_dict) with new_states
/// shaped like `states`.
#[pyfunction]
fn smart_grid_step<'py>(
    py: Python<'py>,
    params: PyReadonlyArray2<'py, f64>,
    states: PyReadonlyArray2<'py, f64>,
    throughfall: PyReadonlyArray1<'py, f64>,
    transpiration: PyReadonlyArray1<'py, f64>,
    dt: f64,
) -> PyResult<(Bound<'py, PyArray2<f64>>, Bound<'py, PyDict>)> {
    let (p_data, n_cells) = checked_rows(&params, N_PARAMS, "params")?;
    let (s_data, n_states) = checked_rows(&states, STATE_SIZE, "states")?;
    if n_states != n_cells {
        return Err(value_error(smart_core::SmartError::shape_mismatch(
            "states", n_cells, n_states,
        )));
    }

    let cell_params = p_data
        .chunks_exact(N_PARAMS)
        .map(Parameters::from_array)
        .collect::<smart_core::Result<Vec<_>>>()
        .map_err(value_error)?;
    let cell_states = s_data
        .chunks_exact(STATE_SIZE)
        .map(State::from_slice)
        .collect::<smart_core::Result<Vec<_>>>()
        .map_err(value_error)?;

    let tf = contiguous_slice(&throughfall)?;
    let tr = contiguous_slice(&transpiration)?;

    let mut grid = Grid::from_states(cell_params, cell_states, dt).map_err(value_error)?;
    let out = py
        .allow_threads(|| grid.step(tf, tr))
        .map_err(value_error)?;

    let flat: Vec<f64> = grid.states().iter().flat_map(|s| s.to_array()).collect();
    let new_states = PyArray1::from_vec(py, flat).reshape([n_cells, STATE_SIZE])?;

    let dict = PyDict::new(py);
    dict.set_item(
        "surface_runoff_flux_delivered_to_rivers",
        PyArray1::from_vec(py, out.surface_runoff_flux_delivered_to_rivers),
    )?;
    dict.set_item(
        "net_groundwater_flux_to_rivers",
        PyArray1::from_vec(py, out.net_groundwater_flux_to_rivers),
    )?;
    dict.set_item(
        "soil_water_stress_for_transpiration",
        PyArray1::from_vec(py, out.soil_water_stress_for_transpiration),
    )?;

    Ok((new_states, dict))
}

/// Initial state array for a parameter set: layers half full, stores empty.
#[pyfunction]
fn smart_initial_state<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let p = parse_params(&params)?;
    Ok(PyArray1::from_slice(py, &State::initialize(&p).to_array()))
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "smart")?;
    m.add_function(wrap_pyfunction!(smart_run, &m)?)?;
    m.add_function(wrap_pyfunction!(smart_step, &m)?)?;
    m.add_function(wrap_pyfunction!(smart_step_outwards, &m)?)?;
    m.add_function(wrap_pyfunction!(smart_grid_step, &m)?)?;
    m.add_function(wrap_pyfunction!(smart_initial_state, &m)?)?;
    m.add_class::<SmartOutwards>()?;
    m.add("PARAM_NAMES", PARAM_NAMES.to_vec())?;
    m.add("STATE_SIZE", STATE_SIZE)?;
    parent.add_submodule(&m)?;
    Ok(())
}
