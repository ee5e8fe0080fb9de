use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::sync::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::dataset::TrainingExample;
use crate::prelude::*;
use crate::store::{PredictionRecord, Store};

pub trait TypedDocument: 'static + Sized + Send + Sync {
    const NAME: &'static str;

    #[inline]
    fn collection(in_: &Database) -> Collection<Self> {
        in_.collection(Self::NAME)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TrainingDocument {
    pub disease_rate: f64,
    pub infection_rate: f64,
    pub population: f64,
    pub ideal_temp: f64,
    pub city_temp: f64,
    pub label: i32,
}

impl TypedDocument for TrainingDocument {
    const NAME: &'static str = "training_data";
}

impl From<&TrainingExample> for TrainingDocument {
    fn from(example: &TrainingExample) -> Self {
        let observation = &example.observation;
        Self {
            disease_rate: observation.disease_rate,
            infection_rate: observation.infection_rate,
            population: observation.population,
            ideal_temp: observation.ideal_temp,
            city_temp: observation.city_temp,
            label: i32::from(example.is_disease_zone),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PredictionDocument {
    pub day: i64,
    pub predicted_disease_rate: f64,
    pub predicted_infection_rate: f64,
    pub prediction_probability: f64,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub recorded_at: DateTime,
}

impl TypedDocument for PredictionDocument {
    const NAME: &'static str = "predictions";
}

impl TryFrom<&PredictionRecord> for PredictionDocument {
    type Error = Error;

    fn try_from(record: &PredictionRecord) -> Result<Self> {
        Ok(Self {
            day: i64::try_from(record.day).context("the day does not fit into BSON")?,
            predicted_disease_rate: record.predicted_disease_rate,
            predicted_infection_rate: record.predicted_infection_rate,
            prediction_probability: record.prediction_probability,
            recorded_at: record.recorded_at,
        })
    }
}

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    #[instrument(level = "debug")]
    pub fn open(uri: &str) -> Result<Self> {
        info!(uri, "connecting…");
        let client = Client::with_uri_str(uri).context("failed to parse the specified MongoDB URI")?;
        let database = client
            .default_database()
            .ok_or_else(|| anyhow!("MongoDB database name is not specified"))?;
        info!(database = database.name(), "connected");
        Ok(Self { database })
    }
}

impl Store for MongoStore {
    #[instrument(level = "debug", skip_all, fields(n_examples = examples.len()))]
    fn save_training_batch(&mut self, examples: &[TrainingExample]) -> Result {
        let documents = examples.iter().map(TrainingDocument::from);
        TrainingDocument::collection(&self.database)
            .insert_many(documents, None)
            .with_context(|| format!("failed to insert into `{}`", TrainingDocument::NAME))?;
        info!("training data saved");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(day = record.day))]
    fn save_prediction(&mut self, record: &PredictionRecord) -> Result {
        let document = PredictionDocument::try_from(record)?;
        PredictionDocument::collection(&self.database)
            .insert_one(document, None)
            .with_context(|| format!("failed to insert into `{}`", PredictionDocument::NAME))?;
        debug!("prediction saved");
        Ok(())
    }
}
