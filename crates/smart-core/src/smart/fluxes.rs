/// SMART flux outputs.
///
/// Two levels: `Fluxes` holds a single timestep, `FluxesTimeseries` holds
/// the full simulation (Vec of each field). Depths are per timestep
/// [kg m-2]; rates are per second [kg m-2 s-1].
use smart_macros::Fluxes;

/// Single-timestep fluxes, returned by `step()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Fluxes)]
#[fluxes(ops_trait = "crate::traits::FluxesTimeseriesOps")]
pub struct Fluxes {
    // inward
    pub throughfall: f64,   // canopy liquid throughfall and snow melt [kg m-2 s-1]
    pub transpiration: f64, // transpiration flux from root uptake [kg m-2 s-1]
    pub excess_rain: f64,   // throughfall * dt [kg m-2]
    pub unmet_peva: f64,    // transpiration * dt [kg m-2]

    // soil column
    pub overland_flow: f64,    // quick runoff [kg m-2]
    pub drain_flow: f64,       // saturation excess to drain store [kg m-2]
    pub inter_flow: f64,       // saturation excess + leaks to inter store [kg m-2]
    pub shallow_gw_flow: f64,  // leaks to shallow groundwater store [kg m-2]
    pub deep_gw_flow: f64,     // leaks to deep groundwater store [kg m-2]
    pub soil_evaporation: f64, // water drawn to meet demand [kg m-2]
    pub leftover_peva: f64,    // demand left below the bottom layer [kg m-2]
    pub soil_water: f64,       // sum of layers after the step [kg m-2]

    // reservoirs
    pub overland_runoff: f64,   // [kg m-2 s-1]
    pub drain_runoff: f64,      // [kg m-2 s-1]
    pub inter_runoff: f64,      // [kg m-2 s-1]
    pub shallow_gw_runoff: f64, // [kg m-2 s-1]
    pub deep_gw_runoff: f64,    // [kg m-2 s-1]
    pub overland_store: f64,    // [kg m-2]
    pub drain_store: f64,       // [kg m-2]
    pub inter_store: f64,       // [kg m-2]
    pub shallow_gw_store: f64,  // [kg m-2]
    pub deep_gw_store: f64,     // [kg m-2]

    // outward
    pub surface_runoff_flux_delivered_to_rivers: f64, // [kg m-2 s-1]
    pub net_groundwater_flux_to_rivers: f64,          // [kg m-2 s-1]
    pub soil_water_stress_for_transpiration: f64,     // [-]
}

/// The three fluxes the sub-surface hands to its neighbours each step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Outwards {
    /// To river routing: overland + drain + interflow outflow.
    pub surface_runoff_flux_delivered_to_rivers: f64,
    /// To river routing: shallow + deep groundwater outflow.
    pub net_groundwater_flux_to_rivers: f64,
    /// Back to the surface layer: relative soil moisture after the step.
    pub soil_water_stress_for_transpiration: f64,
}

impl From<&Fluxes> for Outwards {
    fn from(f: &Fluxes) -> Self {
        Self {
            surface_runoff_flux_delivered_to_rivers: f.surface_runoff_flux_delivered_to_rivers,
            net_groundwater_flux_to_rivers: f.net_groundwater_flux_to_rivers,
            soil_water_stress_for_transpiration: f.soil_water_stress_for_transpiration,
        }
    }
}
