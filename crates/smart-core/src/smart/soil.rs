/// SMART soil column process functions.
///
/// Six stacked layers of equal capacity. Each timestep a cell is either
/// energy-limited (excess rain infiltrates, percolates and leaks) or
/// water-limited (unmet evaporative demand is drawn top to bottom). Both
/// passes run for every cell behind a per-cell predicate so the update is
/// uniform across a grid; an inactive pass leaves layers and fluxes alone.
use super::constants::N_LAYERS;
use super::params::Parameters;

/// Water released by the soil column over one timestep [kg m-2].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoilFluxes {
    /// Quick runoff bound for the overland reservoir.
    pub overland_flow: f64,
    /// Saturation excess bound for the drain reservoir.
    pub drain_flow: f64,
    /// Saturation excess plus interflow leaks.
    pub inter_flow: f64,
    /// Shallow groundwater leaks.
    pub shallow_gw_flow: f64,
    /// Deep groundwater leaks.
    pub deep_gw_flow: f64,
    /// Water drawn from the layers to meet evaporative demand.
    pub soil_evaporation: f64,
    /// Evaporative demand left once all six layers were visited.
    pub leftover_peva: f64,
}

/// Pick `a` where the mask holds, `b` elsewhere.
#[inline(always)]
fn select(mask: bool, a: f64, b: f64) -> f64 {
    if mask {
        a
    } else {
        b
    }
}

/// Update the soil column for one timestep.
///
/// `excess_rain` and `unmet_peva` are depths (flux already multiplied by
/// dt). The cell is energy-limited when `excess_rain > 0`; otherwise it is
/// water-limited. Demand reaching an energy-limited cell is not drawn and
/// comes back untouched as `leftover_peva`.
pub fn update(
    layers: &mut [f64; N_LAYERS],
    excess_rain: f64,
    unmet_peva: f64,
    params: &Parameters,
) -> SoilFluxes {
    let energy_limited = excess_rain > 0.0;
    let water_limited = !energy_limited;

    // antecedent moisture drives both the runoff ratio and the leaks
    let soil_water: f64 = layers.iter().sum();

    let mut fluxes = energy_limited_pass(layers, excess_rain, soil_water, params, energy_limited);
    let (soil_evaporation, leftover_peva) =
        water_limited_pass(layers, unmet_peva, params.theta_c, water_limited);
    fluxes.soil_evaporation = soil_evaporation;
    fluxes.leftover_peva = leftover_peva;
    fluxes
}

/// Quick runoff split, percolation, saturation excess and leaks.
///
/// Returns the soil fluxes with `soil_evaporation` and `leftover_peva` at zero.
pub fn energy_limited_pass(
    layers: &mut [f64; N_LAYERS],
    excess_rain: f64,
    soil_water: f64,
    params: &Parameters,
    active: bool,
) -> SoilFluxes {
    let relative_moisture = soil_water / params.theta_z;

    // Quick runoff scaled by relative soil moisture
    let overland_flow = select(active, params.theta_h * relative_moisture * excess_rain, 0.0);
    let mut remaining = excess_rain - overland_flow;

    // Percolation, top layer first
    let capacity = params.layer_capacity();
    for level in layers.iter_mut() {
        let space = capacity - *level;
        let fits = remaining <= space;
        *level = select(active, select(fits, *level + remaining, capacity), *level);
        remaining = select(active, select(fits, 0.0, remaining - space), remaining);
    }

    // Saturation excess
    let saturation_excess = select(active, remaining, 0.0);
    let drain_flow = params.theta_d * saturation_excess;
    let mut inter_flow = (1.0 - params.theta_d) * saturation_excess;

    // Leaks: interflow decays exponentially downwards, shallow groundwater
    // linearly downwards, deep groundwater exponentially upwards. Each leak
    // is taken from what the previous one left behind.
    let theta_s_prime = params.theta_s * relative_moisture;
    let mut shallow_gw_flow = 0.0;
    let mut deep_gw_flow = 0.0;

    for (i, level) in layers.iter_mut().enumerate() {
        let leak_inter = select(active, *level * theta_s_prime.powi(i as i32 + 1), 0.0);
        inter_flow += leak_inter;
        *level = (*level - leak_inter).max(0.0);

        let leak_shallow = select(active, *level * (theta_s_prime / (i + 1) as f64), 0.0);
        shallow_gw_flow += leak_shallow;
        *level = (*level - leak_shallow).max(0.0);

        let leak_deep = select(
            active,
            *level * theta_s_prime.powi((N_LAYERS - i) as i32),
            0.0,
        );
        deep_gw_flow += leak_deep;
        *level = (*level - leak_deep).max(0.0);
    }

    SoilFluxes {
        overland_flow,
        drain_flow,
        inter_flow,
        shallow_gw_flow,
        deep_gw_flow,
        soil_evaporation: 0.0,
        leftover_peva: 0.0,
    }
}

/// Draw evaporative demand from the layers, top layer first.
///
/// A layer that cannot meet the remaining demand is emptied and the
/// shortfall, decayed by `theta_c`, moves one layer down.
/// Returns (water drawn, demand left after the bottom layer).
pub fn water_limited_pass(
    layers: &mut [f64; N_LAYERS],
    unmet_peva: f64,
    theta_c: f64,
    active: bool,
) -> (f64, f64) {
    let mut demand = unmet_peva;
    let mut drawn = 0.0;

    for level in layers.iter_mut() {
        let before = *level;
        let enough = demand <= before;
        *level = select(active, select(enough, before - demand, 0.0), before).max(0.0);
        drawn += before - *level;
        demand = select(
            active,
            select(enough, 0.0, theta_c * (demand - before)),
            demand,
        );
    }

    (drawn, demand)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} +/- {tol}, got {actual}"
        );
    }

    fn params(theta_c: f64, theta_h: f64, theta_d: f64, theta_s: f64) -> Parameters {
        Parameters::new(theta_c, theta_h, theta_d, theta_s, 600.0, 86_400.0, 432_000.0, 2_592_000.0)
            .unwrap()
    }

    // -- Energy-limited: percolation --

    #[test]
    fn percolation_fills_layers_top_down() {
        let p = params(0.5, 0.1, 0.3, 0.0);
        let mut layers = [50.0; 6];
        let f = update(&mut layers, 120.0, 0.0, &p);

        assert_approx(f.overland_flow, 6.0, 1e-12);
        for (level, expected) in layers.iter().zip([100.0, 100.0, 64.0, 50.0, 50.0, 50.0]) {
            assert_approx(*level, expected, 1e-9);
        }
        assert_eq!(f.drain_flow, 0.0);
        assert_eq!(f.inter_flow, 0.0);
        assert_eq!(f.shallow_gw_flow, 0.0);
        assert_eq!(f.deep_gw_flow, 0.0);
    }

    #[test]
    fn saturation_excess_split_by_theta_d() {
        let p = params(0.5, 0.0, 0.25, 0.0);
        let mut layers = [90.0; 6];
        // 60 fills the column, 40 is left over
        let f = update(&mut layers, 100.0, 0.0, &p);

        assert_eq!(layers, [100.0; 6]);
        assert_approx(f.drain_flow, 10.0, 1e-12);
        assert_approx(f.inter_flow, 30.0, 1e-12);
    }

    // -- Energy-limited: leaks --

    #[test]
    fn leaks_extracted_sequentially() {
        let p = params(0.5, 0.0, 0.5, 0.5);
        let mut layers = [100.0; 6];
        let f = update(&mut layers, 10.0, 0.0, &p);

        // top layer: 100 -> 50 (inter) -> 25 (shallow) -> 25 - 25 * 0.5^6
        assert_approx(layers[0], 24.609375, 1e-12);
        // bottom layer: 100 -> 98.4375 -> 90.234375 -> 45.1171875
        assert_approx(layers[5], 45.1171875, 1e-12);
        assert_approx(f.drain_flow, 5.0, 1e-12);
        assert!(f.inter_flow > 5.0);
        assert!(f.shallow_gw_flow > 0.0);
        assert!(f.deep_gw_flow > 0.0);
    }

    #[test]
    fn energy_limited_conserves_mass() {
        let p = params(0.5, 0.3, 0.4, 0.6);
        let mut layers = [10.0, 80.0, 100.0, 0.0, 55.0, 30.0];
        let before: f64 = layers.iter().sum();
        let excess = 42.0;
        let f = update(&mut layers, excess, 0.0, &p);
        let after: f64 = layers.iter().sum();

        let out = f.overland_flow + f.drain_flow + f.inter_flow + f.shallow_gw_flow + f.deep_gw_flow;
        assert_approx(after + out, before + excess, 1e-9);
    }

    #[test]
    fn energy_limited_ignores_demand() {
        let p = params(0.5, 0.1, 0.3, 0.2);
        let mut layers = [50.0; 6];
        let f = update(&mut layers, 5.0, 7.0, &p);
        assert_eq!(f.leftover_peva, 7.0);
        assert_eq!(f.soil_evaporation, 0.0);
    }

    // -- Water-limited --

    #[test]
    fn demand_met_by_second_layer() {
        let p = params(0.5, 0.1, 0.3, 0.2);
        let mut layers = [50.0; 6];
        let f = update(&mut layers, 0.0, 120.0, &p);

        // 50 from the top, then 0.5 * 70 = 35 from the second
        assert_eq!(layers, [0.0, 15.0, 50.0, 50.0, 50.0, 50.0]);
        assert_approx(f.soil_evaporation, 85.0, 1e-12);
        assert_eq!(f.leftover_peva, 0.0);
        assert_eq!(f.overland_flow, 0.0);
        assert_eq!(f.inter_flow, 0.0);
    }

    #[test]
    fn large_demand_decays_down_the_column() {
        let (drawn, left) = water_limited_pass(&mut [50.0; 6], 1000.0, 0.5, true);
        // 475, 212.5, 81.25, 15.625 reach layers 1..4; layer 4 covers it
        assert_approx(drawn, 215.625, 1e-12);
        assert_eq!(left, 0.0);
    }

    #[test]
    fn dry_column_returns_leftover() {
        let mut layers = [0.0; 6];
        let (drawn, left) = water_limited_pass(&mut layers, 10.0, 1.0, true);
        assert_eq!(drawn, 0.0);
        assert_approx(left, 10.0, 1e-12);
    }

    #[test]
    fn inactive_passes_leave_layers_untouched() {
        let p = params(0.5, 0.1, 0.3, 0.9);
        let mut layers = [20.0, 40.0, 60.0, 80.0, 100.0, 0.0];
        let original = layers;

        energy_limited_pass(&mut layers, 30.0, 300.0, &p, false);
        water_limited_pass(&mut layers, 30.0, 0.5, false);
        assert_eq!(layers, original);
    }

    #[test]
    fn zero_input_leaves_layers_unchanged() {
        let p = params(0.5, 0.1, 0.3, 0.9);
        let mut layers = [20.0, 40.0, 60.0, 80.0, 100.0, 0.0];
        let original = layers;
        let f = update(&mut layers, 0.0, 0.0, &p);
        assert_eq!(layers, original);
        assert_eq!(f, SoilFluxes::default());
    }
}
