use smart_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
pub struct RunoffFluxes {
    pub overland: f64,
    pub drain: f64,
    pub inter: f64,
}

fn main() {
    let f = RunoffFluxes { overland: 1.0, drain: 2.0, inter: 3.0 };
    let mut ts = RunoffFluxesTimeseries::with_capacity(10);
    ts.push(&f);
    ts.push(&f);
    assert_eq!(ts.len(), 2);
    assert!(!ts.is_empty());
    assert_eq!(RunoffFluxes::FIELD_COUNT, 3);
    assert_eq!(RunoffFluxes::field_names(), &["overland", "drain", "inter"]);
    assert_eq!(f.values(), [1.0, 2.0, 3.0]);
    assert_eq!(ts.column("drain"), Some(&[2.0, 2.0][..]));
    assert_eq!(ts.column("missing"), None);
    assert_eq!(ts.columns()[2].0, "inter");
}
