/// SMART -- Soil Moisture Accounting and Routing for Transport, sub-surface.
///
/// A bucket-type rainfall-runoff component with six soil layers of equal
/// depth and five linear reservoirs (overland, drain, interflow, shallow
/// and deep groundwater). River routing is not part of this component.
pub mod constants;
pub mod fluxes;
pub mod params;
pub mod reservoir;
pub mod run;
pub mod soil;
pub mod state;
