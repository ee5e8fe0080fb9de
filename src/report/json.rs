use std::io::Write;

use serde::Serialize;

use crate::forecast::{DayForecast, Summary};
use crate::model::LogisticRegression;
use crate::prelude::*;
use crate::report::Reporter;

pub struct JsonReporter<W> {
    writer: W,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Event<'a> {
    Model(&'a LogisticRegression),
    Day(&'a DayForecast),
    Summary(&'a Summary),
}

impl<W: Write> JsonReporter<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &Event) -> Result {
        serde_json::to_writer(&mut self.writer, event).context("failed to serialize the event")?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report_training(&mut self, model: &LogisticRegression) -> Result {
        self.write_event(&Event::Model(model))
    }

    fn report_day(&mut self, forecast: &DayForecast) -> Result {
        self.write_event(&Event::Day(forecast))
    }

    fn report_summary(&mut self, summary: &Summary) -> Result {
        self.write_event(&Event::Summary(summary))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::forecast::Rate;

    #[test]
    fn report_ok() -> Result {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report_training(&LogisticRegression::new(3))?;
        reporter.report_day(&DayForecast {
            day: 0,
            disease: Rate::new(2.0, 100000.0),
            infection: Rate::new(1.0, 100000.0),
            probability: 0.5,
            features: vec![2.0, 1.0, 5.0],
        })?;

        let output = String::from_utf8(reporter.into_inner())?;
        let events: Vec<Value> = output
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(events[0]["kind"], "model");
        assert_eq!(events[0]["weights"], serde_json::json!([0.0, 0.0, 0.0]));
        assert_eq!(events[1]["kind"], "day");
        assert_eq!(events[1]["disease"]["n_people"], 2000.0);
        assert_eq!(events[1]["features"][2], 5.0);
        Ok(())
    }
}
