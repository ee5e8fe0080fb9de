//! CLI options.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::features::{FeatureEncoding, Observation};
use crate::forecast::{ForecastParams, ZoneConditions};
use crate::pipeline::TrainingParams;
use crate::report::Format;

pub mod parsers;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Opts {
    /// Sentry DSN
    #[arg(long, env = "ZONE_FORECAST_SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Performance traces sample rate for Sentry
    #[arg(long, default_value = "0", env = "ZONE_FORECAST_TRACES_SAMPLE_RATE")]
    pub traces_sample_rate: f32,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand)]
pub enum Subcommand {
    Forecast(ForecastOpts),
    Interactive(InteractiveOpts),
}

/// Trains the model and forecasts the zone given on the command line
#[derive(Args)]
pub struct ForecastOpts {
    #[command(flatten)]
    pub zone: ZoneOpts,

    /// JSON training set: `{"rows": [[disease_rate, infection_rate, population, ideal_temp, city_temp], …], "labels": [0, 1, …]}`.
    /// The built-in set is used when omitted.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionOpts,
}

/// Asks for the training set and the zone conditions interactively, session by session
#[derive(Args)]
pub struct InteractiveOpts {
    #[command(flatten)]
    pub session: SessionOpts,
}

#[derive(Args)]
pub struct ZoneOpts {
    /// Population of the zone
    #[arg(long, value_parser = parsers::non_negative_f64)]
    pub population: f64,

    /// Current disease rate, percentage of the population
    #[arg(long, value_parser = parsers::non_negative_f64)]
    pub disease_rate: f64,

    /// Current infection rate, percentage of the population
    #[arg(long, value_parser = parsers::non_negative_f64)]
    pub infection_rate: f64,

    /// Ideal thriving temperature for the virus, °C
    #[arg(long, value_parser = parsers::finite_f64, allow_negative_numbers = true)]
    pub ideal_temp: f64,

    /// Current city temperature, °C
    #[arg(long, value_parser = parsers::finite_f64, allow_negative_numbers = true)]
    pub city_temp: f64,

    /// Number of days into the future to predict
    #[arg(long)]
    pub days: u32,
}

impl From<&ZoneOpts> for ZoneConditions {
    fn from(opts: &ZoneOpts) -> Self {
        Self {
            observation: Observation {
                disease_rate: opts.disease_rate,
                infection_rate: opts.infection_rate,
                population: opts.population,
                ideal_temp: opts.ideal_temp,
                city_temp: opts.city_temp,
            },
            horizon_days: opts.days,
        }
    }
}

#[derive(Args)]
pub struct SessionOpts {
    #[command(flatten)]
    pub training: TrainingOpts,

    #[command(flatten)]
    pub forecast: ForecastParamsOpts,

    #[command(flatten)]
    pub store: StoreOpts,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Args)]
pub struct TrainingOpts {
    /// Feature encoding of the raw zone fields
    #[arg(long = "features", value_enum, default_value_t = FeatureEncoding::Three)]
    pub encoding: FeatureEncoding,

    /// Gradient descent learning rate
    #[arg(long, default_value = "0.01", value_parser = parsers::non_negative_f64)]
    pub learning_rate: f64,

    /// Number of passes over the training set
    #[arg(long, default_value = "1000")]
    pub epochs: usize,
}

impl From<&TrainingOpts> for TrainingParams {
    fn from(opts: &TrainingOpts) -> Self {
        Self {
            learning_rate: opts.learning_rate,
            n_epochs: opts.epochs,
        }
    }
}

#[derive(Args)]
pub struct ForecastParamsOpts {
    /// Daily exponential growth rate of the disease and infection rates
    #[arg(long, default_value = "0.1", value_parser = parsers::finite_f64, allow_negative_numbers = true)]
    pub growth_rate: f64,

    /// Days between two reported days
    #[arg(long, default_value = "10", value_parser = parsers::non_zero_u32)]
    pub step_days: u32,
}

impl From<&ForecastParamsOpts> for ForecastParams {
    fn from(opts: &ForecastParamsOpts) -> Self {
        Self {
            growth_rate: opts.growth_rate,
            step_days: opts.step_days,
        }
    }
}

#[derive(Args)]
pub struct StoreOpts {
    /// MongoDB URI, including the database name, to save the training data and the predictions to
    #[arg(long, env = "ZONE_FORECAST_MONGODB_URI", conflicts_with = "json_lines")]
    pub mongodb_uri: Option<String>,

    /// File to append the training data and the predictions to, one JSON document per line
    #[arg(long)]
    pub json_lines: Option<PathBuf>,
}

#[must_use]
pub fn parse() -> Opts {
    Opts::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_command_ok() {
        Opts::command().debug_assert();
    }

    #[test]
    fn forecast_defaults_ok() -> crate::prelude::Result {
        let opts = Opts::try_parse_from([
            "zone-forecast",
            "forecast",
            "--population=100000",
            "--disease-rate=2",
            "--infection-rate=1",
            "--ideal-temp=25",
            "--city-temp=-5",
            "--days=20",
        ])?;
        let forecast_opts = match opts.subcommand {
            Subcommand::Forecast(forecast_opts) => forecast_opts,
            Subcommand::Interactive(_) => unreachable!(),
        };
        let conditions = ZoneConditions::from(&forecast_opts.zone);
        assert_eq!(conditions.observation.city_temp, -5.0);
        assert_eq!(conditions.horizon_days, 20);

        let session = &forecast_opts.session;
        assert_eq!(session.training.encoding, FeatureEncoding::Three);
        assert_eq!(TrainingParams::from(&session.training), TrainingParams::default());
        assert_eq!(ForecastParams::from(&session.forecast), ForecastParams::default());
        assert_eq!(session.format, Format::Text);
        assert!(forecast_opts.dataset.is_none());
        Ok(())
    }

    #[test]
    fn zero_step_fails() {
        let result = Opts::try_parse_from(["zone-forecast", "interactive", "--step-days=0"]);
        assert!(result.is_err());
    }

    #[test]
    fn conflicting_stores_fail() {
        let result = Opts::try_parse_from([
            "zone-forecast",
            "interactive",
            "--mongodb-uri=mongodb://localhost/zones",
            "--json-lines=predictions.jsonl",
        ]);
        assert!(result.is_err());
    }
}
