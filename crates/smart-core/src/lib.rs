//! SMART sub-surface model.
//!
//! The soil moisture accounting and land runoff routing half of the SMART
//! bucket model: six soil layers of equal depth feeding five linear
//! reservoirs, stepped for a single cell or a whole grid of cells.
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod forcing;
pub mod grid;
pub mod smart;
pub mod traits;

pub use checkpoint::Checkpoint;
pub use config::RunConfig;
pub use error::{Result, SmartError};
pub use grid::{Grid, GridOutputs};
pub use smart::fluxes::{Fluxes, FluxesTimeseries, Outwards};
pub use smart::params::Parameters;
pub use smart::state::State;
