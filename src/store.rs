//! Persistence of training batches and per-day predictions.
//!
//! Nothing is read back: stores are write-only sinks.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dataset::TrainingExample;
use crate::forecast::DayForecast;
use crate::prelude::*;

pub mod json_lines;
pub mod mongodb;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct PredictionRecord {
    pub day: u64,
    pub predicted_disease_rate: f64,
    pub predicted_infection_rate: f64,
    pub prediction_probability: f64,
    pub recorded_at: DateTime,
}

impl From<&DayForecast> for PredictionRecord {
    fn from(forecast: &DayForecast) -> Self {
        Self {
            day: forecast.day,
            predicted_disease_rate: forecast.disease.rate,
            predicted_infection_rate: forecast.infection.rate,
            prediction_probability: forecast.probability,
            recorded_at: Utc::now(),
        }
    }
}

pub trait Store {
    fn save_training_batch(&mut self, examples: &[TrainingExample]) -> Result;

    fn save_prediction(&mut self, record: &PredictionRecord) -> Result;
}

/// Used when no storage is configured.
pub struct Discard;

impl Store for Discard {
    fn save_training_batch(&mut self, examples: &[TrainingExample]) -> Result {
        debug!(n_examples = examples.len(), "discarding the training batch");
        Ok(())
    }

    fn save_prediction(&mut self, record: &PredictionRecord) -> Result {
        debug!(day = record.day, "discarding the prediction");
        Ok(())
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn save_training_batch(&mut self, examples: &[TrainingExample]) -> Result {
        (**self).save_training_batch(examples)
    }

    fn save_prediction(&mut self, record: &PredictionRecord) -> Result {
        (**self).save_prediction(record)
    }
}
