//! Presentation of the forecast.

use clap::ValueEnum;

use crate::forecast::{DayForecast, Summary};
use crate::model::LogisticRegression;
use crate::prelude::*;

pub mod json;
pub mod text;

pub trait Reporter {
    fn report_training(&mut self, model: &LogisticRegression) -> Result;

    fn report_day(&mut self, forecast: &DayForecast) -> Result;

    fn report_summary(&mut self, summary: &Summary) -> Result;
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable timeline.
    #[default]
    Text,

    /// One JSON object per line.
    Json,
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report_training(&mut self, model: &LogisticRegression) -> Result {
        (**self).report_training(model)
    }

    fn report_day(&mut self, forecast: &DayForecast) -> Result {
        (**self).report_day(forecast)
    }

    fn report_summary(&mut self, summary: &Summary) -> Result {
        (**self).report_summary(summary)
    }
}
