#![warn(clippy::all, clippy::missing_const_for_fn)]

use std::io::{stdin, stdout};

use crate::dataset::TrainingSet;
use crate::forecast::ZoneConditions;
use crate::input::args::ArgsInput;
use crate::input::console::ConsoleInput;
use crate::input::InputProvider;
use crate::opts::{SessionOpts, Subcommand};
use crate::pipeline::Pipeline;
use crate::prelude::Result;
use crate::report::json::JsonReporter;
use crate::report::text::TextReporter;
use crate::report::{Format, Reporter};
use crate::store::json_lines::JsonLinesStore;
use crate::store::mongodb::MongoStore;
use crate::store::{Discard, Store};

mod dataset;
mod features;
mod forecast;
mod input;
mod math;
mod model;
mod opts;
mod pipeline;
mod prelude;
mod report;
mod store;
mod tracing;

fn main() -> Result {
    let opts = opts::parse();
    let _sentry_guard = crate::tracing::init(opts.sentry_dsn, opts.traces_sample_rate)?;

    match opts.subcommand {
        Subcommand::Forecast(opts) => {
            let training_set = match &opts.dataset {
                Some(path) => TrainingSet::from_file(path)?,
                None => TrainingSet::default(),
            };
            let input = ArgsInput::new(training_set, ZoneConditions::from(&opts.zone));
            run(&opts.session, input)
        }
        Subcommand::Interactive(opts) => {
            run(&opts.session, ConsoleInput::new(stdin().lock(), stdout()))
        }
    }
}

fn run(opts: &SessionOpts, input: impl InputProvider) -> Result {
    let store: Box<dyn Store> = match (&opts.store.mongodb_uri, &opts.store.json_lines) {
        (Some(uri), _) => Box::new(MongoStore::open(uri)?),
        (None, Some(path)) => Box::new(JsonLinesStore::append_to(path)?),
        (None, None) => Box::new(Discard),
    };
    let reporter: Box<dyn Reporter> = match opts.format {
        Format::Text => Box::new(TextReporter::new(stdout())),
        Format::Json => Box::new(JsonReporter::new(stdout())),
    };
    Pipeline {
        engineering: opts.training.encoding,
        training: (&opts.training).into(),
        forecast: (&opts.forecast).into(),
        input,
        store,
        reporter,
    }
    .run()?;
    Ok(())
}
