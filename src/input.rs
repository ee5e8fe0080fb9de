//! Sources of training data and live zone conditions.

use crate::dataset::TrainingSet;
use crate::forecast::ZoneConditions;
use crate::prelude::*;

pub mod args;
pub mod console;

/// Called by the pipeline at two points of every session:
/// first for the training set, then for the conditions to forecast.
pub trait InputProvider {
    /// Returns `None` when there are no more sessions to run.
    fn training_set(&mut self) -> Result<Option<TrainingSet>>;

    fn zone_conditions(&mut self) -> Result<ZoneConditions>;
}
