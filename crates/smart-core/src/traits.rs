use crate::error::Result;

/// Core trait for lumped hydrological models.
///
/// Defines the interface a single-cell model implements: prepare context,
/// initialize state, step, and run over a timeseries.
pub trait HydrologicalModel {
    const NAME: &'static str;
    type Params;
    type State: Clone;
    type Forcing: Copy;
    type Fluxes;
    type FluxesTimeseries: FluxesTimeseriesOps<Self::Fluxes>;
    /// Precomputed context derived from params, constant for a given run.
    type Context;

    /// Precompute any run-constant data from parameters.
    fn prepare(params: &Self::Params) -> Self::Context;

    /// Create a default initial state from parameters.
    fn initialize_state(params: &Self::Params) -> Self::State;

    /// Execute one timestep: given the previous state, params, forcing, and
    /// context, return the new state and fluxes. The previous state is
    /// never mutated.
    fn step(
        state: &Self::State,
        params: &Self::Params,
        forcing: &Self::Forcing,
        context: &Self::Context,
    ) -> (Self::State, Self::Fluxes);

    /// Run the model over a forcing timeseries.
    ///
    /// Default implementation: prepare context, initialize/use provided state,
    /// loop over forcing calling step. Returns the collected fluxes and the
    /// state after the last step.
    fn run(
        params: &Self::Params,
        forcing: &[Self::Forcing],
        initial_state: Option<&Self::State>,
    ) -> (Self::FluxesTimeseries, Self::State) {
        let context = Self::prepare(params);
        let mut state = match initial_state {
            Some(s) => s.clone(),
            None => Self::initialize_state(params),
        };

        let mut outputs = Self::FluxesTimeseries::with_capacity(forcing.len());

        for f in forcing {
            let (new_state, fluxes) = Self::step(&state, params, f, &context);
            outputs.push(&fluxes);
            state = new_state;
        }

        (outputs, state)
    }
}

/// Operations required on the timeseries collection type.
pub trait FluxesTimeseriesOps<F> {
    fn with_capacity(n: usize) -> Self;
    fn push(&mut self, f: &F);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}

/// Flat-array view of a parameter set.
pub trait ModelParams: Sized {
    const N_PARAMS: usize;
    const PARAM_NAMES: &'static [&'static str];
    const PARAM_BOUNDS: &'static [(f64, f64)];

    fn from_array(arr: &[f64]) -> Result<Self>;
    fn to_array(&self) -> Vec<f64>;
}

/// Flat-array view of a model state, used for checkpoints and bindings.
pub trait ModelState: Sized {
    fn to_vec(&self) -> Vec<f64>;
    fn from_slice(arr: &[f64]) -> Result<Self>;
    fn array_len(&self) -> usize;
}
