//! Vectorised SMART over a grid of independent cells.
//!
//! Every cell owns its parameters and state; no cell reads another cell's
//! state, so the step is embarrassingly parallel. State is double-buffered:
//! each step reads the `previous` buffer, writes the `current` buffer, then
//! swaps them. With the `parallel` feature, cells are spread across rayon
//! workers; results are identical to the serial path.

use crate::checkpoint::Checkpoint;
use crate::error::{Result, SmartError};
use crate::forcing::check_series;
use crate::smart::fluxes::{Fluxes, Outwards};
use crate::smart::params::Parameters;
use crate::smart::run;
use crate::smart::state::State;

/// Outward fluxes for every cell after one grid step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridOutputs {
    pub surface_runoff_flux_delivered_to_rivers: Vec<f64>,
    pub net_groundwater_flux_to_rivers: Vec<f64>,
    pub soil_water_stress_for_transpiration: Vec<f64>,
}

impl GridOutputs {
    fn from_cells(cells: &[Fluxes]) -> Self {
        let mut out = Self {
            surface_runoff_flux_delivered_to_rivers: Vec::with_capacity(cells.len()),
            net_groundwater_flux_to_rivers: Vec::with_capacity(cells.len()),
            soil_water_stress_for_transpiration: Vec::with_capacity(cells.len()),
        };
        for f in cells {
            let o = Outwards::from(f);
            out.surface_runoff_flux_delivered_to_rivers
                .push(o.surface_runoff_flux_delivered_to_rivers);
            out.net_groundwater_flux_to_rivers
                .push(o.net_groundwater_flux_to_rivers);
            out.soil_water_stress_for_transpiration
                .push(o.soil_water_stress_for_transpiration);
        }
        out
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.soil_water_stress_for_transpiration.len()
    }

    /// Returns `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.soil_water_stress_for_transpiration.is_empty()
    }
}

/// A grid of SMART cells stepped together.
#[derive(Debug, Clone)]
pub struct Grid {
    params: Vec<Parameters>,
    previous: Vec<State>,
    current: Vec<State>,
    dt: f64,
    steps_taken: u64,
}

impl Grid {
    /// One cell per parameter set, soil half full and reservoirs empty.
    pub fn new(params: Vec<Parameters>, dt: f64) -> Result<Self> {
        check_dt(dt)?;
        let previous: Vec<State> = params.iter().map(State::initialize).collect();
        tracing::debug!(cells = params.len(), dt, "initialised SMART grid");
        Ok(Self {
            current: previous.clone(),
            previous,
            params,
            dt,
            steps_taken: 0,
        })
    }

    /// `n_cells` cells sharing one parameter set.
    pub fn uniform(params: Parameters, n_cells: usize, dt: f64) -> Result<Self> {
        Self::new(vec![params; n_cells], dt)
    }

    /// Restore a grid from per-cell states, one per parameter set.
    ///
    /// Every state must hold its layers within `[0, capacity]` and its
    /// stores non-negative; the first offending cell is reported.
    pub fn from_states(params: Vec<Parameters>, states: Vec<State>, dt: f64) -> Result<Self> {
        check_dt(dt)?;
        if states.len() != params.len() {
            return Err(SmartError::shape_mismatch("states", params.len(), states.len()));
        }
        for (cell, (state, p)) in states.iter().zip(&params).enumerate() {
            if let Err(e) = state.check_physical(p, cell) {
                tracing::warn!(cell, "restored state outside physical bounds");
                return Err(e);
            }
        }
        tracing::debug!(cells = params.len(), dt, "restored SMART grid");
        Ok(Self {
            current: states.clone(),
            previous: states,
            params,
            dt,
            steps_taken: 0,
        })
    }

    /// Restore a grid from a checkpoint taken with the same parameters.
    pub fn restore(params: Vec<Parameters>, checkpoint: Checkpoint) -> Result<Self> {
        let mut grid = Self::from_states(params, checkpoint.states, checkpoint.dt)?;
        grid.steps_taken = checkpoint.steps_taken;
        Ok(grid)
    }

    /// Snapshot the latest state of every cell.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            dt: self.dt,
            steps_taken: self.steps_taken,
            states: self.previous.clone(),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Timestep length [s].
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of steps taken since initialisation or restore point.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Per-cell parameters.
    pub fn params(&self) -> &[Parameters] {
        &self.params
    }

    /// Latest state of every cell.
    pub fn states(&self) -> &[State] {
        &self.previous
    }

    /// Advance every cell by one timestep and return its outward fluxes.
    ///
    /// `throughfall` and `transpiration` hold one flux per cell [kg m-2 s-1].
    pub fn step(&mut self, throughfall: &[f64], transpiration: &[f64]) -> Result<GridOutputs> {
        let fluxes = self.step_fluxes(throughfall, transpiration)?;
        Ok(GridOutputs::from_cells(&fluxes))
    }

    /// Advance every cell by one timestep and return the full flux records.
    pub fn step_fluxes(
        &mut self,
        throughfall: &[f64],
        transpiration: &[f64],
    ) -> Result<Vec<Fluxes>> {
        let n = self.len();
        if throughfall.len() != n {
            return Err(SmartError::shape_mismatch("throughfall", n, throughfall.len()));
        }
        if transpiration.len() != n {
            return Err(SmartError::shape_mismatch("transpiration", n, transpiration.len()));
        }
        check_series("throughfall", throughfall)?;
        check_series("transpiration", transpiration)?;

        let fluxes = self.advance(throughfall, transpiration);
        std::mem::swap(&mut self.previous, &mut self.current);
        self.steps_taken += 1;
        tracing::trace!(step = self.steps_taken, cells = n, "grid step");
        Ok(fluxes)
    }

    #[cfg(not(feature = "parallel"))]
    fn advance(&mut self, throughfall: &[f64], transpiration: &[f64]) -> Vec<Fluxes> {
        let dt = self.dt;
        self.current
            .iter_mut()
            .zip(&self.previous)
            .zip(&self.params)
            .zip(throughfall.iter().zip(transpiration))
            .map(|(((current, previous), params), (&tf, &tr))| {
                run::step_into(previous, current, params, tf, tr, dt)
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn advance(&mut self, throughfall: &[f64], transpiration: &[f64]) -> Vec<Fluxes> {
        use rayon::prelude::*;

        let dt = self.dt;
        self.current
            .par_iter_mut()
            .zip(self.previous.par_iter())
            .zip(self.params.par_iter())
            .zip(throughfall.par_iter().zip(transpiration.par_iter()))
            .map(|(((current, previous), params), (&tf, &tr))| {
                run::step_into(previous, current, params, tf, tr, dt)
            })
            .collect()
    }
}

fn check_dt(dt: f64) -> Result<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(SmartError::InvalidForcing(format!(
            "timestep must be positive, got {dt}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 3_600.0;

    fn params(theta_z: f64) -> Parameters {
        Parameters::new(0.5, 0.1, 0.3, 0.2, theta_z, 36_000.0, 360_000.0, 3_600_000.0).unwrap()
    }

    fn mixed_grid() -> Grid {
        Grid::new(vec![params(600.0), params(300.0), params(900.0)], DT).unwrap()
    }

    #[test]
    fn new_grid_starts_half_full() {
        let g = mixed_grid();
        assert_eq!(g.len(), 3);
        assert_eq!(g.states()[1].soil_layers, [25.0; 6]);
        assert_eq!(g.states()[2].stores(), [0.0; 5]);
    }

    #[test]
    fn cells_match_single_cell_step() {
        let mut g = mixed_grid();
        let initial = g.states().to_vec();
        let throughfall = [5e-3, 0.0, 1e-4];
        let transpiration = [0.0, 2e-4, 0.0];

        let out = g.step(&throughfall, &transpiration).unwrap();

        for i in 0..3 {
            let (state, f) = run::step(
                &initial[i],
                &g.params()[i],
                throughfall[i],
                transpiration[i],
                DT,
            );
            assert_eq!(g.states()[i], state);
            assert_eq!(
                out.surface_runoff_flux_delivered_to_rivers[i],
                f.surface_runoff_flux_delivered_to_rivers
            );
            assert_eq!(
                out.soil_water_stress_for_transpiration[i],
                f.soil_water_stress_for_transpiration
            );
        }
    }

    #[test]
    fn cells_do_not_interact() {
        let mut wet = Grid::uniform(params(600.0), 2, DT).unwrap();
        let mut alone = Grid::uniform(params(600.0), 1, DT).unwrap();
        for _ in 0..24 {
            wet.step(&[1e-2, 0.0], &[0.0, 1e-4]).unwrap();
            alone.step(&[0.0], &[1e-4]).unwrap();
        }
        assert_eq!(wet.states()[1], alone.states()[0]);
    }

    #[test]
    fn step_rejects_wrong_lengths() {
        let mut g = mixed_grid();
        assert!(matches!(
            g.step(&[0.0; 2], &[0.0; 3]),
            Err(SmartError::ShapeMismatch { name: "throughfall", .. })
        ));
        assert!(matches!(
            g.step(&[0.0; 3], &[0.0; 4]),
            Err(SmartError::ShapeMismatch { name: "transpiration", .. })
        ));
        assert_eq!(g.steps_taken(), 0);
    }

    #[test]
    fn from_states_rejects_count_mismatch() {
        let p = params(600.0);
        let states = vec![State::initialize(&p)];
        assert!(Grid::from_states(vec![p, p], states, DT).is_err());
    }

    #[test]
    fn step_rejects_negative_or_nan_forcing() {
        let mut g = Grid::uniform(params(600.0), 1, DT).unwrap();
        let before = g.states().to_vec();

        assert!(matches!(
            g.step(&[0.0], &[-1.0]),
            Err(SmartError::InvalidForcing(_))
        ));
        assert!(matches!(
            g.step(&[f64::NAN], &[0.0]),
            Err(SmartError::InvalidForcing(_))
        ));
        assert_eq!(g.states(), before.as_slice());
        assert_eq!(g.steps_taken(), 0);
    }

    #[test]
    fn from_states_rejects_overfull_layer() {
        let p = params(600.0);
        let mut overfull = State::initialize(&p);
        overfull.soil_layers[0] = 150.0;
        let states = vec![State::initialize(&p), overfull];
        assert!(matches!(
            Grid::from_states(vec![p, p], states, DT),
            Err(SmartError::UnphysicalState { cell: 1 })
        ));
    }

    #[test]
    fn restore_rejects_negative_store() {
        let p = params(600.0);
        let mut state = State::initialize(&p);
        state.deep_gw_store = -50.0;
        let cp = Checkpoint::single(state, DT, 3);
        assert!(matches!(
            Grid::restore(vec![p], cp),
            Err(SmartError::UnphysicalState { cell: 0 })
        ));
    }

    #[test]
    fn rejects_non_positive_dt() {
        assert!(Grid::uniform(params(600.0), 2, 0.0).is_err());
        assert!(Grid::uniform(params(600.0), 2, -1.0).is_err());
    }

    #[test]
    fn checkpoint_restore_continues_identically() {
        let mut a = mixed_grid();
        let throughfall = [2e-3, 1e-3, 0.0];
        let transpiration = [0.0, 0.0, 1e-4];
        for _ in 0..5 {
            a.step(&throughfall, &transpiration).unwrap();
        }
        let mut b = Grid::restore(a.params().to_vec(), a.checkpoint()).unwrap();
        assert_eq!(b.steps_taken(), 5);

        let out_a = a.step(&throughfall, &transpiration).unwrap();
        let out_b = b.step(&throughfall, &transpiration).unwrap();
        assert_eq!(out_a, out_b);
        assert_eq!(a.states(), b.states());
    }

    #[test]
    fn empty_grid_steps() {
        let mut g = Grid::new(Vec::new(), DT).unwrap();
        let out = g.step(&[], &[]).unwrap();
        assert!(out.is_empty());
        assert!(g.is_empty());
    }
}
