use std::borrow::Cow;

use sentry::integrations::tracing::EventFilter;
use sentry::{ClientInitGuard, ClientOptions};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::prelude::*;

/// Initialises tracing. Logs go to stderr, so that they never mix with the report or the prompts.
///
/// The Sentry layer is only installed when a DSN is given.
pub fn init(sentry_dsn: Option<String>, traces_sample_rate: f32) -> Result<ClientInitGuard> {
    let sentry_layer = match sentry_dsn {
        Some(_) => {
            let filter = EnvFilter::try_from_env("ZONE_FORECAST_SENTRY_LOG")
                .or_else(|_| EnvFilter::try_new("zone_forecast=info"))?;
            let layer = sentry::integrations::tracing::layer()
                .event_filter(|metadata| sentry_event_filter(metadata.level()))
                .span_filter(|metadata| metadata.level() <= &Level::INFO)
                .with_filter(filter);
            Some(layer)
        }
        None => None,
    };
    let guard = sentry::init((
        sentry_dsn,
        ClientOptions {
            release: Some(Cow::Borrowed(env!("CARGO_PKG_VERSION"))),
            traces_sample_rate,
            ..Default::default()
        },
    ));

    let format_filter = EnvFilter::try_from_env("ZONE_FORECAST_LOG")
        .or_else(|_| EnvFilter::try_new("zone_forecast=warn"))?;
    let format_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(format_filter);

    tracing_subscriber::Registry::default()
        .with(sentry_layer)
        .with(format_layer)
        .init();

    Ok(guard)
}

/// Failed store writes become Sentry events, the session milestones become their breadcrumbs.
/// Per-epoch training traces are dropped.
fn sentry_event_filter(level: &Level) -> EventFilter {
    match *level {
        Level::ERROR => EventFilter::Event,
        Level::WARN | Level::INFO => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

pub fn format_elapsed(instant: Instant) -> String {
    humantime::format_duration(instant.elapsed()).to_string()
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use super::*;

    #[test]
    fn sentry_event_filter_ok() {
        assert!(matches!(sentry_event_filter(&Level::ERROR), EventFilter::Event));
        assert!(matches!(sentry_event_filter(&Level::WARN), EventFilter::Breadcrumb));
        assert!(matches!(sentry_event_filter(&Level::INFO), EventFilter::Breadcrumb));
        assert!(matches!(sentry_event_filter(&Level::DEBUG), EventFilter::Ignore));
        assert!(matches!(sentry_event_filter(&Level::TRACE), EventFilter::Ignore));
    }

    #[test]
    fn format_elapsed_ok() -> Result {
        let instant = Instant::now()
            .checked_sub(StdDuration::from_secs(3600))
            .ok_or_else(|| anyhow!("monotonic clock is too young"))?;
        assert!(format_elapsed(instant).starts_with("1h"));
        Ok(())
    }
}
