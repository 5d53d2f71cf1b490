use smart_macros::Fluxes;

#[derive(Fluxes)]
#[fluxes(window = "daily")]
pub struct WindowFluxes {
    pub inter_flow: f64,
}

fn main() {}
