use crate::dataset::TrainingSet;
use crate::forecast::ZoneConditions;
use crate::input::InputProvider;
use crate::prelude::*;

/// Input fully specified upfront, e.g. on the command line. Runs a single session.
pub struct ArgsInput {
    training_set: Option<TrainingSet>,
    conditions: ZoneConditions,
}

impl ArgsInput {
    #[must_use]
    pub const fn new(training_set: TrainingSet, conditions: ZoneConditions) -> Self {
        Self {
            training_set: Some(training_set),
            conditions,
        }
    }
}

impl InputProvider for ArgsInput {
    fn training_set(&mut self) -> Result<Option<TrainingSet>> {
        Ok(self.training_set.take())
    }

    fn zone_conditions(&mut self) -> Result<ZoneConditions> {
        Ok(self.conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Observation;

    #[test]
    fn single_session_ok() -> Result {
        let conditions = ZoneConditions {
            observation: Observation::from([2.0, 1.0, 100000.0, 25.0, 30.0]),
            horizon_days: 20,
        };
        let mut input = ArgsInput::new(TrainingSet::default(), conditions);
        assert_eq!(input.training_set()?, Some(TrainingSet::default()));
        assert_eq!(input.zone_conditions()?, conditions);
        assert_eq!(input.training_set()?, None);
        Ok(())
    }
}
