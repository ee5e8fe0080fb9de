//! Feature engineering: raw zone observations to model inputs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type FeatureVector = Vec<f64>;

/// Raw fields of a single zone, in the order they are stored and typed in.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(from = "[f64; 5]", into = "[f64; 5]")]
pub struct Observation {
    /// Percentage of the population.
    pub disease_rate: f64,

    /// Percentage of the population.
    pub infection_rate: f64,

    pub population: f64,

    /// Ideal thriving temperature for the virus, °C.
    pub ideal_temp: f64,

    /// Current city temperature, °C.
    pub city_temp: f64,
}

impl From<[f64; 5]> for Observation {
    fn from(fields: [f64; 5]) -> Self {
        let [disease_rate, infection_rate, population, ideal_temp, city_temp] = fields;
        Self {
            disease_rate,
            infection_rate,
            population,
            ideal_temp,
            city_temp,
        }
    }
}

impl From<Observation> for [f64; 5] {
    fn from(observation: Observation) -> Self {
        [
            observation.disease_rate,
            observation.infection_rate,
            observation.population,
            observation.ideal_temp,
            observation.city_temp,
        ]
    }
}

impl Observation {
    #[must_use]
    pub fn temperature_gap(&self) -> f64 {
        (self.city_temp - self.ideal_temp).abs()
    }
}

/// Maps an observation onto the vector the forecast carries, and that vector
/// onto the linear terms the model weighs.
///
/// The first two components of the encoded vector must be the disease and
/// infection rates: the forecast compounds exactly those two.
pub trait FeatureEngineering {
    /// Length of the encoded vector.
    fn dimension(&self) -> usize;

    /// Number of linear terms, that is the number of model weights.
    fn n_terms(&self) -> usize;

    fn encode(&self, observation: &Observation) -> FeatureVector;

    fn linear_terms(&self, features: &[f64]) -> FeatureVector;
}

#[derive(ValueEnum, Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureEncoding {
    /// Disease rate, infection rate, temperature gap.
    #[default]
    Three,

    /// Disease rate, infection rate, city temperature, ideal temperature.
    /// The temperatures are weighed through their absolute gap.
    Four,
}

impl FeatureEngineering for FeatureEncoding {
    fn dimension(&self) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    fn n_terms(&self) -> usize {
        3
    }

    fn encode(&self, observation: &Observation) -> FeatureVector {
        match self {
            Self::Three => vec![
                observation.disease_rate,
                observation.infection_rate,
                observation.temperature_gap(),
            ],
            Self::Four => vec![
                observation.disease_rate,
                observation.infection_rate,
                observation.city_temp,
                observation.ideal_temp,
            ],
        }
    }

    fn linear_terms(&self, features: &[f64]) -> FeatureVector {
        assert_eq!(features.len(), self.dimension(), "encoded vector length mismatch");
        match self {
            Self::Three => features.to_vec(),
            Self::Four => vec![features[0], features[1], (features[2] - features[3]).abs()],
        }
    }
}
