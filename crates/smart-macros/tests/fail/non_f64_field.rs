use smart_macros::Fluxes;

#[derive(Fluxes)]
pub struct MixedFluxes {
    pub drain_flow: f64,
    pub layer: usize,
}

fn main() {}
