//! Labeled training sets.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::features::{FeatureEngineering, FeatureVector, Observation};
use crate::prelude::*;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct TrainingExample {
    pub observation: Observation,
    pub is_disease_zone: bool,
}

/// Non-empty, ordered sequence of training examples.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet(Vec<TrainingExample>);

/// On-disk layout: rows of raw fields and a parallel array of `0`/`1` labels.
#[derive(Serialize, Deserialize)]
pub struct RawTrainingSet {
    pub rows: Vec<Observation>,
    pub labels: Vec<u8>,
}

impl Default for TrainingSet {
    /// The built-in set of eight zones.
    fn default() -> Self {
        const ROWS: [[f64; 5]; 8] = [
            [1.5, 0.8, 5000.0, 25.0, 30.0],
            [2.0, 1.1, 5000.0, 25.0, 28.0],
            [3.0, 1.5, 7000.0, 22.0, 23.0],
            [2.5, 1.2, 10000.0, 25.0, 25.0],
            [1.8, 0.9, 6000.0, 20.0, 18.0],
            [2.1, 1.3, 8000.0, 22.0, 20.0],
            [1.7, 1.0, 7500.0, 23.0, 21.0],
            [2.3, 1.4, 9500.0, 21.0, 19.0],
        ];
        const LABELS: [bool; 8] = [false, true, true, true, false, true, false, true];

        Self(
            ROWS.into_iter()
                .zip(LABELS)
                .map(|(row, is_disease_zone)| TrainingExample {
                    observation: row.into(),
                    is_disease_zone,
                })
                .collect(),
        )
    }
}

impl TryFrom<RawTrainingSet> for TrainingSet {
    type Error = Error;

    fn try_from(raw: RawTrainingSet) -> Result<Self> {
        if raw.rows.len() != raw.labels.len() {
            bail!(
                "{} rows but {} labels in the training set",
                raw.rows.len(),
                raw.labels.len(),
            );
        }
        let examples = raw
            .rows
            .into_iter()
            .zip(raw.labels)
            .map(|(observation, label)| {
                Ok(TrainingExample {
                    observation,
                    is_disease_zone: parse_label(label)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(examples)
    }
}

pub fn parse_label(label: u8) -> Result<bool> {
    match label {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(anyhow!("label must be either 0 or 1, got {}", label)),
    }
}

impl TrainingSet {
    pub fn new(examples: Vec<TrainingExample>) -> Result<Self> {
        match examples.is_empty() {
            false => Ok(Self(examples)),
            true => Err(anyhow!("training set is empty")),
        }
    }

    /// Reads a JSON training set, see [`RawTrainingSet`].
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let raw: RawTrainingSet =
            serde_json::from_reader(reader).context("failed to parse the training set")?;
        raw.try_into()
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("failed to open `{}`", path.as_ref().display()))?;
        let training_set = Self::from_reader(BufReader::new(file))?;
        info!(n_examples = training_set.len(), "loaded");
        Ok(training_set)
    }

    #[must_use]
    pub fn examples(&self) -> &[TrainingExample] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Linear terms of every example, the rows the model is trained on.
    #[must_use]
    pub fn linear_terms(&self, engineering: &impl FeatureEngineering) -> Vec<FeatureVector> {
        self.0
            .iter()
            .map(|example| engineering.linear_terms(&engineering.encode(&example.observation)))
            .collect_vec()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<bool> {
        self.0.iter().map(|example| example.is_disease_zone).collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureEncoding;

    #[test]
    fn default_ok() {
        let training_set = TrainingSet::default();
        assert_eq!(training_set.len(), 8);
        assert_eq!(
            training_set.labels(),
            [false, true, true, true, false, true, false, true],
        );
        assert_eq!(training_set.examples()[3].observation.population, 10000.0);
    }

    #[test]
    fn linear_terms_ok() {
        for encoding in [FeatureEncoding::Three, FeatureEncoding::Four] {
            let terms = TrainingSet::default().linear_terms(&encoding);
            assert_eq!(terms[0], vec![1.5, 0.8, 5.0]);
            assert_eq!(terms[7], vec![2.3, 1.4, 2.0]);
        }
    }

    #[test]
    fn from_reader_ok() -> Result {
        let json = r#"{"rows": [[1.5, 0.8, 5000, 25, 30], [3.0, 1.5, 7000, 22, 23]], "labels": [0, 1]}"#;
        let training_set = TrainingSet::from_reader(json.as_bytes())?;
        assert_eq!(training_set.labels(), [false, true]);
        assert_eq!(training_set.examples()[1].observation.city_temp, 23.0);
        Ok(())
    }

    #[test]
    fn from_reader_invalid_label_fails() {
        let json = r#"{"rows": [[1.5, 0.8, 5000, 25, 30]], "labels": [2]}"#;
        assert!(TrainingSet::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn from_reader_length_mismatch_fails() {
        let json = r#"{"rows": [[1.5, 0.8, 5000, 25, 30]], "labels": [0, 1]}"#;
        assert!(TrainingSet::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn from_reader_short_row_fails() {
        let json = r#"{"rows": [[1.5, 0.8, 5000, 25]], "labels": [0]}"#;
        assert!(TrainingSet::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn empty_fails() {
        let json = r#"{"rows": [], "labels": []}"#;
        assert!(TrainingSet::from_reader(json.as_bytes()).is_err());
    }
}
