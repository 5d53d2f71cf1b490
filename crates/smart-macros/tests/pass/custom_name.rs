use smart_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
#[fluxes(timeseries_name = "StoreSeries")]
pub struct StoreFluxes {
    pub shallow_gw_store: f64,
    pub deep_gw_store: f64,
}

fn main() {
    let f = StoreFluxes { shallow_gw_store: 1.5, deep_gw_store: 50.0 };
    let mut ts = StoreSeries::with_capacity(5);
    ts.push(&f);
    assert_eq!(ts.len(), 1);
    assert_eq!(StoreFluxes::field_names(), &["shallow_gw_store", "deep_gw_store"]);
}
