use std::io::Write;

use crate::forecast::{DayForecast, Rate, Summary};
use crate::model::LogisticRegression;
use crate::prelude::*;
use crate::report::Reporter;

pub struct TextReporter<W> {
    writer: W,
    is_timeline_started: bool,
}

impl<W: Write> TextReporter<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            is_timeline_started: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_rate(&mut self, title: &str, rate: &Rate) -> Result {
        writeln!(
            self.writer,
            "  Predicted {} rate: {:.4} ({:.4} people, {:.4}% of population)",
            title, rate.rate, rate.n_people, rate.share_of_population,
        )?;
        Ok(())
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report_training(&mut self, _model: &LogisticRegression) -> Result {
        Ok(())
    }

    fn report_day(&mut self, forecast: &DayForecast) -> Result {
        if !self.is_timeline_started {
            writeln!(self.writer, "--- Prediction Timeline ---")?;
            self.is_timeline_started = true;
        }
        writeln!(self.writer, "Day {}:", forecast.day)?;
        self.write_rate("disease", &forecast.disease)?;
        self.write_rate("infection", &forecast.infection)?;
        writeln!(
            self.writer,
            "  Probability of being a disease zone: {:.4}%",
            forecast.probability * 100.0,
        )?;
        Ok(())
    }

    fn report_summary(&mut self, summary: &Summary) -> Result {
        self.is_timeline_started = false;
        writeln!(self.writer, "--- Final Prediction After {} Days ---", summary.horizon_days)?;
        for (title, rate) in [("disease", &summary.disease), ("infection", &summary.infection)] {
            writeln!(
                self.writer,
                "Final predicted {} rate: {:.4} ({:.4}% of population)",
                title, rate.rate, rate.share_of_population,
            )?;
        }
        writeln!(
            self.writer,
            "Final probability of being a disease zone: {:.4}%",
            summary.probability * 100.0,
        )?;
        writeln!(
            self.writer,
            "Classification: {}",
            if summary.is_disease_zone { "Disease Zone" } else { "No Disease Zone" },
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ok() -> Result {
        let mut reporter = TextReporter::new(Vec::new());
        reporter.report_day(&DayForecast {
            day: 10,
            disease: Rate::new(5.43656365691809, 100000.0),
            infection: Rate::new(2.718281828459045, 100000.0),
            probability: 0.913961089722653,
            features: vec![5.43656365691809, 2.718281828459045, 5.0],
        })?;
        reporter.report_summary(&Summary {
            horizon_days: 20,
            disease: Rate::new(40.17107384637533, 100000.0),
            infection: Rate::new(20.085536923187664, 100000.0),
            probability: 0.25,
            is_disease_zone: false,
            features: vec![40.17107384637533, 20.085536923187664, 5.0],
        })?;

        let output = String::from_utf8(reporter.into_inner())?;
        let expected = "\
            --- Prediction Timeline ---\n\
            Day 10:\n  \
            Predicted disease rate: 5.4366 (5436.5637 people, 0.0054% of population)\n  \
            Predicted infection rate: 2.7183 (2718.2818 people, 0.0027% of population)\n  \
            Probability of being a disease zone: 91.3961%\n\
            --- Final Prediction After 20 Days ---\n\
            Final predicted disease rate: 40.1711 (0.0402% of population)\n\
            Final predicted infection rate: 20.0855 (0.0201% of population)\n\
            Final probability of being a disease zone: 25.0000%\n\
            Classification: No Disease Zone\n";
        assert_eq!(output, expected);
        Ok(())
    }
}
