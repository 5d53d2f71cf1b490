//! Snapshot and restore of per-cell SMART state.
//!
//! A checkpoint holds the soil layers and reservoir volumes of every cell,
//! plus the timestep it was taken with, and round-trips through JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmartError};
use crate::smart::state::State;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Timestep length the states were produced with [s].
    pub dt: f64,
    /// Steps taken before the snapshot.
    pub steps_taken: u64,
    /// One state per cell, in grid order.
    pub states: Vec<State>,
}

impl Checkpoint {
    /// Single-cell checkpoint, e.g. the final state of a timeseries run.
    pub fn single(state: State, dt: f64, steps_taken: u64) -> Self {
        Self {
            dt,
            steps_taken,
            states: vec![state],
        }
    }

    /// Fail unless the checkpoint was taken with timestep `dt` [s].
    pub fn check_dt(&self, dt: f64) -> Result<()> {
        if self.dt == dt {
            Ok(())
        } else {
            Err(SmartError::CheckpointMismatch(format!(
                "checkpoint timestep is {} s, run timestep is {} s",
                self.dt, dt
            )))
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Write the checkpoint to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), cells = self.states.len(), "saved checkpoint");
        Ok(())
    }

    /// Read a checkpoint previously written by [`Checkpoint::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let checkpoint = Self::from_json(&fs::read_to_string(path)?)?;
        tracing::debug!(
            path = %path.display(),
            cells = checkpoint.states.len(),
            steps_taken = checkpoint.steps_taken,
            "loaded checkpoint"
        );
        Ok(checkpoint)
    }
}
