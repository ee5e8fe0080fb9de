//! Day-by-day disease zone forecast.
//!
//! Two growth figures are tracked side by side. The displayed rates are a
//! closed-form exponential of the initial input, while the model is fed a
//! running feature vector whose rate components are compounded after every step.
//! The model weighs the linear terms of that vector.

use serde::{Deserialize, Serialize};

use crate::features::{FeatureEngineering, FeatureVector, Observation};
use crate::model::{LogisticRegression, THRESHOLD};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct ForecastParams {
    /// Daily exponential growth rate.
    pub growth_rate: f64,

    /// Simulated days between two reported days.
    pub step_days: u32,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            growth_rate: 0.1,
            step_days: 10,
        }
    }
}

/// Live conditions of the zone being forecast.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct ZoneConditions {
    pub observation: Observation,
    pub horizon_days: u32,
}

/// A rate (percentage of the population) along with its derived figures.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Rate {
    pub rate: f64,
    pub n_people: f64,

    /// `rate / population * 100`.
    pub share_of_population: f64,
}

impl Rate {
    #[must_use]
    pub fn new(rate: f64, population: f64) -> Self {
        Self {
            rate,
            n_people: rate / 100.0 * population,
            share_of_population: rate / population * 100.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub day: u64,
    pub disease: Rate,
    pub infection: Rate,
    pub probability: f64,

    /// The running vector the probability was predicted from.
    pub features: FeatureVector,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Summary {
    pub horizon_days: u32,
    pub disease: Rate,
    pub infection: Rate,
    pub probability: f64,
    pub is_disease_zone: bool,
    pub features: FeatureVector,
}

/// Forecast state machine. Yields one [`DayForecast`] per reported day,
/// from day `0` through the horizon inclusive.
pub struct Forecast<'a, E> {
    model: &'a LogisticRegression,
    engineering: &'a E,
    params: ForecastParams,
    conditions: ZoneConditions,

    /// Wider than the horizon: the last step may overshoot `u32::MAX`.
    day: u64,

    features: FeatureVector,
}

impl<'a, E: FeatureEngineering> Forecast<'a, E> {
    /// # Panics
    ///
    /// Panics if the step is zero or the encoding does not match the model dimension.
    #[must_use]
    pub fn new(
        model: &'a LogisticRegression,
        engineering: &'a E,
        conditions: ZoneConditions,
        params: ForecastParams,
    ) -> Self {
        assert_ne!(params.step_days, 0, "forecast step must be positive");
        assert_eq!(engineering.n_terms(), model.dimension(), "encoding does not match the model");
        let features = engineering.encode(&conditions.observation);
        Self {
            model,
            engineering,
            params,
            conditions,
            day: 0,
            features,
        }
    }

    fn is_finished(&self) -> bool {
        self.day > u64::from(self.conditions.horizon_days)
    }

    fn predict(&self) -> f64 {
        self.model.predict(&self.engineering.linear_terms(&self.features))
    }

    fn step_multiplier(&self) -> f64 {
        (self.params.growth_rate * f64::from(self.params.step_days)).exp()
    }

    /// Final classification of the running vector.
    /// Meant to be called once the iterator is exhausted.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let population = self.conditions.observation.population;
        let probability = self.predict();
        Summary {
            horizon_days: self.conditions.horizon_days,
            disease: Rate::new(self.features[0], population),
            infection: Rate::new(self.features[1], population),
            probability,
            is_disease_zone: probability > THRESHOLD,
            features: self.features.clone(),
        }
    }
}

impl<'a, E: FeatureEngineering> Iterator for Forecast<'a, E> {
    type Item = DayForecast;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }

        let observation = &self.conditions.observation;
        let growth = (self.params.growth_rate * self.day as f64).exp();
        let item = DayForecast {
            day: self.day,
            disease: Rate::new(observation.disease_rate * growth, observation.population),
            infection: Rate::new(observation.infection_rate * growth, observation.population),
            probability: self.predict(),
            features: self.features.clone(),
        };

        let multiplier = self.step_multiplier();
        for rate in &mut self.features[..2] {
            *rate *= multiplier;
        }
        self.day += u64::from(self.params.step_days);

        Some(item)
    }
}
