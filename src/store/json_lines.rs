use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::dataset::TrainingExample;
use crate::prelude::*;
use crate::store::{PredictionRecord, Store};

/// Appends one JSON document per line.
pub struct JsonLinesStore<W> {
    writer: W,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Line<'a> {
    TrainingExample(&'a TrainingExample),
    Prediction(&'a PredictionRecord),
}

impl JsonLinesStore<BufWriter<File>> {
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .with_context(|| format!("failed to open `{}`", path.as_ref().display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesStore<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &Line) -> Result {
        serde_json::to_writer(&mut self.writer, line).context("failed to serialize the line")?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Store for JsonLinesStore<W> {
    fn save_training_batch(&mut self, examples: &[TrainingExample]) -> Result {
        for example in examples {
            self.write_line(&Line::TrainingExample(example))?;
        }
        self.writer.flush()?;
        info!(n_examples = examples.len(), "training data saved");
        Ok(())
    }

    fn save_prediction(&mut self, record: &PredictionRecord) -> Result {
        self.write_line(&Line::Prediction(record))?;
        self.writer.flush()?;
        debug!(day = record.day, "prediction saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::dataset::TrainingSet;

    #[test]
    fn save_ok() -> Result {
        let mut store = JsonLinesStore::new(Vec::new());
        store.save_training_batch(&TrainingSet::default().examples()[..2])?;
        store.save_prediction(&PredictionRecord {
            day: 10,
            predicted_disease_rate: 5.5,
            predicted_infection_rate: 2.5,
            prediction_probability: 0.75,
            recorded_at: Utc.timestamp_opt(0, 0).unwrap(),
        })?;

        let output = String::from_utf8(store.into_inner())?;
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["kind"], "training_example");
        assert_eq!(lines[0]["observation"][4], 30.0);
        assert_eq!(lines[0]["is_disease_zone"], false);
        assert_eq!(lines[1]["is_disease_zone"], true);
        assert_eq!(lines[2]["kind"], "prediction");
        assert_eq!(lines[2]["day"], 10);
        assert_eq!(lines[2]["prediction_probability"], 0.75);
        Ok(())
    }
}
