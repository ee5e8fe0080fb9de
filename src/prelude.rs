pub use std::time::Instant;

pub use anyhow::{anyhow, bail, Context, Error};
pub use tracing::{debug, error, info, instrument};

pub type DateTime = chrono::DateTime<chrono::Utc>;
pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
