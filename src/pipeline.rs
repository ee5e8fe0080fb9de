//! Wires the input, the model, the forecast, storage and presentation together.

use serde::{Deserialize, Serialize};

use crate::dataset::TrainingSet;
use crate::features::FeatureEngineering;
use crate::forecast::{Forecast, ForecastParams, Summary};
use crate::input::InputProvider;
use crate::model::LogisticRegression;
use crate::prelude::*;
use crate::report::Reporter;
use crate::store::{PredictionRecord, Store};
use crate::tracing::format_elapsed;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct TrainingParams {
    pub learning_rate: f64,
    pub n_epochs: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            n_epochs: 1000,
        }
    }
}

pub struct Pipeline<E, I, S, R> {
    pub engineering: E,
    pub training: TrainingParams,
    pub forecast: ForecastParams,
    pub input: I,
    pub store: S,
    pub reporter: R,
}

impl<E, I, S, R> Pipeline<E, I, S, R>
where
    E: FeatureEngineering,
    I: InputProvider,
    S: Store,
    R: Reporter,
{
    /// Runs sessions until the input provider runs out of training sets.
    /// Returns the summaries of all the sessions.
    #[instrument(skip_all)]
    pub fn run(&mut self) -> Result<Vec<Summary>> {
        let mut summaries = Vec::new();
        while let Some(training_set) = self.input.training_set()? {
            summaries.push(self.run_session(&training_set)?);
        }
        info!(n_sessions = summaries.len(), "finished");
        Ok(summaries)
    }

    #[instrument(skip_all, fields(n_examples = training_set.len()))]
    fn run_session(&mut self, training_set: &TrainingSet) -> Result<Summary> {
        if let Err(error) = self.store.save_training_batch(training_set.examples()) {
            error!("failed to save the training data: {:#}", error);
        }

        let model = self.train(training_set);
        self.reporter.report_training(&model)?;

        let conditions = self.input.zone_conditions()?;
        info!(?conditions, "forecasting…");
        let mut forecast = Forecast::new(&model, &self.engineering, conditions, self.forecast);
        for day in forecast.by_ref() {
            self.reporter.report_day(&day)?;
            if let Err(error) = self.store.save_prediction(&PredictionRecord::from(&day)) {
                error!(day = day.day, "failed to save the prediction: {:#}", error);
            }
        }

        let summary = forecast.summary();
        self.reporter.report_summary(&summary)?;
        info!(
            probability = summary.probability,
            is_disease_zone = summary.is_disease_zone,
            "done",
        );
        Ok(summary)
    }

    fn train(&self, training_set: &TrainingSet) -> LogisticRegression {
        let start_instant = Instant::now();
        let mut model = LogisticRegression::new(self.engineering.n_terms());
        model.train(
            &training_set.linear_terms(&self.engineering),
            &training_set.labels(),
            self.training.learning_rate,
            self.training.n_epochs,
        );
        info!(
            bias = model.bias,
            weights = ?model.weights,
            elapsed = format_elapsed(start_instant).as_str(),
            "trained",
        );
        model
    }
}
