use smart_macros::Fluxes;

pub trait SeriesOps<F> {
    fn with_capacity(n: usize) -> Self;
    fn push(&mut self, f: &F);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Fluxes)]
#[fluxes(ops_trait = "SeriesOps")]
pub struct StressFluxes {
    pub soil_water_stress: f64,
}

fn collect<T: SeriesOps<StressFluxes>>(values: &[f64]) -> T {
    let mut ts = T::with_capacity(values.len());
    for &v in values {
        ts.push(&StressFluxes { soil_water_stress: v });
    }
    ts
}

fn main() {
    let ts: StressFluxesTimeseries = collect(&[0.2, 0.4, 0.6]);
    assert_eq!(SeriesOps::len(&ts), 3);
    assert!(!SeriesOps::is_empty(&ts));
    assert_eq!(ts.soil_water_stress, vec![0.2, 0.4, 0.6]);
}
