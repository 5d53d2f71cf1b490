/// SMART model orchestration functions.
///
/// - `step()`: Execute a single timestep for one cell
/// - `step_into()`: Same, writing into a caller-owned state buffer
/// - `run()`: Execute over a forcing timeseries
use super::fluxes::{Fluxes, FluxesTimeseries};
use super::params::Parameters;
use super::reservoir;
use super::soil;
use super::state::State;
use crate::forcing::ForcingData;
use crate::traits::HydrologicalModel;

/// Execute one timestep of the sub-surface for a single cell.
///
/// `throughfall` and `transpiration` are fluxes [kg m-2 s-1] from the
/// surface layer, `dt` the timestep length [s].
/// Returns (new_state, fluxes); `state` is left as the previous step.
pub fn step(
    state: &State,
    params: &Parameters,
    throughfall: f64,
    transpiration: f64,
    dt: f64,
) -> (State, Fluxes) {
    let mut new_state = *state;
    let fluxes = step_into(state, &mut new_state, params, throughfall, transpiration, dt);
    (new_state, fluxes)
}

/// Execute one timestep reading `previous` and overwriting `current`.
///
/// Used by the grid driver to ping-pong between two state buffers without
/// reallocating. Whatever `current` held before is discarded.
pub fn step_into(
    previous: &State,
    current: &mut State,
    params: &Parameters,
    throughfall: f64,
    transpiration: f64,
    dt: f64,
) -> Fluxes {
    // 1. Fluxes to depths over the timestep
    let excess_rain = throughfall * dt;
    let unmet_peva = transpiration * dt;

    // 2. Soil column, starting from the previous levels
    current.soil_layers = previous.soil_layers;
    let soil = soil::update(&mut current.soil_layers, excess_rain, unmet_peva, params);

    // 3. Reservoirs drain from their previous volumes
    let runoff = reservoir::route(previous, current, &soil, params, dt);

    let soil_water = current.soil_water();

    Fluxes {
        throughfall,
        transpiration,
        excess_rain,
        unmet_peva,
        overland_flow: soil.overland_flow,
        drain_flow: soil.drain_flow,
        inter_flow: soil.inter_flow,
        shallow_gw_flow: soil.shallow_gw_flow,
        deep_gw_flow: soil.deep_gw_flow,
        soil_evaporation: soil.soil_evaporation,
        leftover_peva: soil.leftover_peva,
        soil_water,
        overland_runoff: runoff.overland,
        drain_runoff: runoff.drain,
        inter_runoff: runoff.inter,
        shallow_gw_runoff: runoff.shallow_gw,
        deep_gw_runoff: runoff.deep_gw,
        overland_store: current.overland_store,
        drain_store: current.drain_store,
        inter_store: current.inter_store,
        shallow_gw_store: current.shallow_gw_store,
        deep_gw_store: current.deep_gw_store,
        surface_runoff_flux_delivered_to_rivers: runoff.surface(),
        net_groundwater_flux_to_rivers: runoff.groundwater(),
        soil_water_stress_for_transpiration: soil_water / params.theta_z,
    }
}

/// Run SMART over a validated forcing timeseries.
///
/// Returns (FluxesTimeseries, final_state); the final state can seed the
/// next run or be written to a checkpoint.
pub fn run(
    params: &Parameters,
    forcing: &ForcingData,
    initial_state: Option<&State>,
) -> (FluxesTimeseries, State) {
    let steps: Vec<SmartForcing> = forcing
        .throughfall
        .iter()
        .zip(&forcing.transpiration)
        .map(|(&throughfall, &transpiration)| SmartForcing {
            throughfall,
            transpiration,
            dt: forcing.dt,
        })
        .collect();
    Smart::run(params, &steps, initial_state)
}

/// Forcing input for one SMART timestep.
#[derive(Debug, Clone, Copy)]
pub struct SmartForcing {
    pub throughfall: f64,
    pub transpiration: f64,
    pub dt: f64,
}

/// Marker type for the single-cell SMART trait implementation.
pub struct Smart;

impl HydrologicalModel for Smart {
    const NAME: &'static str = "SMART";
    type Params = Parameters;
    type State = State;
    type Forcing = SmartForcing;
    type Fluxes = Fluxes;
    type FluxesTimeseries = FluxesTimeseries;
    type Context = ();

    fn prepare(_params: &Self::Params) -> Self::Context {}

    fn initialize_state(params: &Self::Params) -> Self::State {
        State::initialize(params)
    }

    fn step(
        state: &Self::State,
        params: &Self::Params,
        forcing: &Self::Forcing,
        _context: &Self::Context,
    ) -> (Self::State, Self::Fluxes) {
        step(state, params, forcing.throughfall, forcing.transpiration, forcing.dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 86_400.0;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} +/- {tol}, got {actual}"
        );
    }

    fn test_params() -> Parameters {
        Parameters::new(0.5, 0.1, 0.3, 0.2, 600.0, 86_400.0 * 2.0, 86_400.0 * 5.0, 86_400.0 * 30.0)
            .unwrap()
    }

    // -- step() tests --

    #[test]
    fn step_converts_fluxes_to_depths() {
        let p = test_params();
        let s = State::initialize(&p);
        let (_, f) = step(&s, &p, 120.0 / DT, 0.0, DT);
        assert_approx(f.excess_rain, 120.0, 1e-9);
        assert_approx(f.overland_flow, 6.0, 1e-9);
    }

    #[test]
    fn step_does_not_mutate_input_state() {
        let p = test_params();
        let s = State::initialize(&p);
        let original = s;
        let _ = step(&s, &p, 1e-3, 0.0, DT);
        assert_eq!(s, original);
    }

    #[test]
    fn first_step_outflow_is_zero_from_empty_stores() {
        let p = test_params();
        let s = State::initialize(&p);
        let (new_state, f) = step(&s, &p, 1e-3, 0.0, DT);
        assert_eq!(f.surface_runoff_flux_delivered_to_rivers, 0.0);
        assert_eq!(f.net_groundwater_flux_to_rivers, 0.0);
        assert!(new_state.overland_store > 0.0);
    }

    #[test]
    fn outward_fluxes_sum_reservoir_outflows() {
        let p = test_params();
        let mut s = State::initialize(&p);
        s.overland_store = 4.0;
        s.drain_store = 3.0;
        s.inter_store = 2.0;
        s.shallow_gw_store = 10.0;
        s.deep_gw_store = 20.0;
        let (_, f) = step(&s, &p, 0.0, 0.0, DT);

        assert_approx(
            f.surface_runoff_flux_delivered_to_rivers,
            f.overland_runoff + f.drain_runoff + f.inter_runoff,
            1e-15,
        );
        assert_approx(f.overland_runoff, 4.0 / p.theta_sk, 1e-15);
        assert_approx(f.net_groundwater_flux_to_rivers, 30.0 / p.theta_gk, 1e-15);
    }

    #[test]
    fn soil_water_stress_is_relative_moisture() {
        let p = test_params();
        let s = State::initialize(&p);
        let (new_state, f) = step(&s, &p, 0.0, 0.0, DT);
        assert_approx(f.soil_water_stress_for_transpiration, 0.5, 1e-12);
        assert_approx(new_state.soil_water(), 300.0, 1e-12);
    }

    #[test]
    fn zero_input_only_drains_reservoirs() {
        let p = test_params();
        let mut s = State::initialize(&p);
        s.inter_store = 50.0;
        let (new_state, _) = step(&s, &p, 0.0, 0.0, DT);
        assert_eq!(new_state.soil_layers, s.soil_layers);
        assert!(new_state.inter_store < 50.0);
    }

    #[test]
    fn transpiration_depletes_top_layer() {
        let p = test_params();
        let s = State::initialize(&p);
        let (new_state, f) = step(&s, &p, 0.0, 10.0 / DT, DT);
        assert_approx(new_state.soil_layers[0], 40.0, 1e-9);
        assert_approx(f.soil_evaporation, 10.0, 1e-9);
        assert!(f.soil_water_stress_for_transpiration < 0.5);
    }

    // -- run() tests --

    fn forcing(n: usize) -> ForcingData {
        let throughfall = (0..n)
            .map(|t| if t % 3 == 0 { 20.0 / DT } else { 0.0 })
            .collect();
        let transpiration = (0..n)
            .map(|t| if t % 3 == 0 { 0.0 } else { 2.0 / DT })
            .collect();
        ForcingData::new(throughfall, transpiration, DT).unwrap()
    }

    #[test]
    fn run_output_length_matches_input() {
        let (result, _) = run(&test_params(), &forcing(12), None);
        assert_eq!(result.len(), 12);
    }

    #[test]
    fn run_keeps_states_physical() {
        let p = test_params();
        let (result, final_state) = run(&p, &forcing(90), None);
        assert!(final_state.is_physical(&p));
        for t in 0..result.len() {
            assert!(result.surface_runoff_flux_delivered_to_rivers[t] >= 0.0);
            assert!(result.net_groundwater_flux_to_rivers[t] >= 0.0);
            assert!(result.soil_water[t] <= p.theta_z + 1e-9);
        }
    }

    #[test]
    fn run_can_resume_from_final_state() {
        let p = test_params();
        let full = forcing(20);
        let (whole, _) = run(&p, &full, None);

        let first = ForcingData::new(
            full.throughfall[..10].to_vec(),
            full.transpiration[..10].to_vec(),
            DT,
        )
        .unwrap();
        let second = ForcingData::new(
            full.throughfall[10..].to_vec(),
            full.transpiration[10..].to_vec(),
            DT,
        )
        .unwrap();
        let (_, mid) = run(&p, &first, None);
        let (tail, _) = run(&p, &second, Some(&mid));

        assert_eq!(
            tail.surface_runoff_flux_delivered_to_rivers[..],
            whole.surface_runoff_flux_delivered_to_rivers[10..]
        );
    }

    #[test]
    fn run_matches_manual_stepping() {
        let p = test_params();
        let f = forcing(15);
        let (result, final_state) = run(&p, &f, None);

        let mut state = State::initialize(&p);
        for t in 0..f.len() {
            let (next, fluxes) = step(&state, &p, f.throughfall[t], f.transpiration[t], f.dt);
            assert_eq!(result.soil_water[t], fluxes.soil_water);
            assert_eq!(
                result.net_groundwater_flux_to_rivers[t],
                fluxes.net_groundwater_flux_to_rivers
            );
            state = next;
        }
        assert_eq!(final_state, state);
    }

    #[test]
    fn trait_name() {
        assert_eq!(Smart::NAME, "SMART");
    }
}
