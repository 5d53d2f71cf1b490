/// SMART linear reservoir routing.
///
/// Five stores (overland, drain, interflow, shallow and deep groundwater)
/// share the same law: outflow is the antecedent volume over a residence
/// time, so this step's inflow only shows up in next step's outflow.
use super::params::Parameters;
use super::soil::SoilFluxes;
use super::state::State;

/// Integrate one inflow depth and release outflow from the previous volume.
///
/// Returns (new_volume [kg m-2], outflow_rate [kg m-2 s-1]).
/// `residence_time` must be positive; parameters guarantee this at
/// construction.
pub fn step(previous: f64, inflow_depth: f64, residence_time: f64, dt: f64) -> (f64, f64) {
    let outflow_rate = previous / residence_time;
    let new_volume = (previous + inflow_depth - outflow_rate * dt).max(0.0);
    (new_volume, outflow_rate)
}

/// Outflow rates of the five reservoirs for one timestep [kg m-2 s-1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Runoff {
    pub overland: f64,
    pub drain: f64,
    pub inter: f64,
    pub shallow_gw: f64,
    pub deep_gw: f64,
}

impl Runoff {
    /// Surface runoff delivered to rivers: overland + drain + interflow.
    pub fn surface(&self) -> f64 {
        self.overland + self.drain + self.inter
    }

    /// Net groundwater flux to rivers: shallow + deep groundwater.
    pub fn groundwater(&self) -> f64 {
        self.shallow_gw + self.deep_gw
    }
}

/// Route the soil column's releases through all five reservoirs.
///
/// Reads the stores of `previous` and writes the updated volumes into
/// `current`; soil layers of `current` are not touched.
pub fn route(
    previous: &State,
    current: &mut State,
    inflows: &SoilFluxes,
    params: &Parameters,
    dt: f64,
) -> Runoff {
    let (overland_store, overland) =
        step(previous.overland_store, inflows.overland_flow, params.theta_sk, dt);
    let (drain_store, drain) = step(previous.drain_store, inflows.drain_flow, params.theta_sk, dt);
    let (inter_store, inter) = step(previous.inter_store, inflows.inter_flow, params.theta_fk, dt);
    let (shallow_gw_store, shallow_gw) = step(
        previous.shallow_gw_store,
        inflows.shallow_gw_flow,
        params.theta_gk,
        dt,
    );
    let (deep_gw_store, deep_gw) =
        step(previous.deep_gw_store, inflows.deep_gw_flow, params.theta_gk, dt);

    current.overland_store = overland_store;
    current.drain_store = drain_store;
    current.inter_store = inter_store;
    current.shallow_gw_store = shallow_gw_store;
    current.deep_gw_store = deep_gw_store;

    Runoff {
        overland,
        drain,
        inter,
        shallow_gw,
        deep_gw,
    }
}
