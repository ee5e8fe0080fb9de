use std::collections::VecDeque;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::dataset::{parse_label, TrainingExample, TrainingSet};
use crate::features::Observation;
use crate::forecast::ZoneConditions;
use crate::input::InputProvider;
use crate::prelude::*;

/// Interactive prompts. Values are whitespace-separated and may span lines.
///
/// A custom training set of zero data points and a negative number of days are
/// rejected with an error, which ends the run: there is no session with an
/// untrained model or an empty timeline.
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
    tokens: VecDeque<String>,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            tokens: VecDeque::new(),
        }
    }

    /// Returns `None` on the end of input.
    fn next_token(&mut self) -> Result<Option<String>> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line).context("failed to read the input")? == 0 {
                return Ok(None);
            }
            self.tokens.extend(line.split_whitespace().map(String::from));
        }
        Ok(self.tokens.pop_front())
    }

    fn prompt(&mut self, text: impl Display) -> Result {
        write!(self.writer, "{}", text)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let token = self
            .next_token()?
            .ok_or_else(|| anyhow!("input ended while expecting {}", what))?;
        token
            .parse()
            .with_context(|| format!("`{}` is not a valid {}", token, what))
    }

    fn ask<T>(&mut self, prompt: impl Display, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.prompt(prompt)?;
        self.read(what)
    }

    fn read_custom_training_set(&mut self) -> Result<TrainingSet> {
        let n_examples: usize = self.ask("Enter the number of data points: ", "number of data points")?;
        let mut examples = Vec::with_capacity(n_examples);
        for i in 1..=n_examples {
            self.prompt(format_args!("Enter features (5 values) for data point {}: ", i))?;
            let mut fields = [0.0; 5];
            for field in &mut fields {
                *field = self.read("feature value")?;
            }
            let label = self.ask(
                format_args!("Enter label for data point {} (0 or 1): ", i),
                "label",
            )?;
            examples.push(TrainingExample {
                observation: Observation::from(fields),
                is_disease_zone: parse_label(label)?,
            });
        }
        TrainingSet::new(examples)
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsoleInput<R, W> {
    fn training_set(&mut self) -> Result<Option<TrainingSet>> {
        self.prompt(concat!(
            "1. Use default training dataset\n",
            "2. Enter custom training dataset\n",
            "3. Exit\n",
            "Enter your choice: ",
        ))?;
        let choice = match self.next_token()? {
            Some(token) => token,
            None => return Ok(None),
        };
        match choice.as_str() {
            "1" => Ok(Some(TrainingSet::default())),
            "2" => self.read_custom_training_set().map(Some),
            _ => Ok(None),
        }
    }

    fn zone_conditions(&mut self) -> Result<ZoneConditions> {
        let population = self.ask("Enter the population of the zone: ", "population")?;
        let disease_rate = self.ask(
            "Enter the current disease rate (as a percentage of population): ",
            "disease rate",
        )?;
        let infection_rate = self.ask(
            "Enter the current infection rate (as a percentage of population): ",
            "infection rate",
        )?;
        let ideal_temp = self.ask(
            "Enter ideal thriving temperature for the virus (in °C): ",
            "temperature",
        )?;
        let city_temp = self.ask("Enter current city temperature (in °C): ", "temperature")?;
        let horizon_days = self.ask(
            "Enter the number of days into the future to predict: ",
            "number of days",
        )?;
        Ok(ZoneConditions {
            observation: Observation {
                disease_rate,
                infection_rate,
                population,
                ideal_temp,
                city_temp,
            },
            horizon_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_training_set_ok() -> Result {
        let mut input = ConsoleInput::new("1\n".as_bytes(), Vec::new());
        assert_eq!(input.training_set()?, Some(TrainingSet::default()));
        assert_eq!(input.training_set()?, None);
        Ok(())
    }

    #[test]
    fn custom_training_set_ok() -> Result {
        let text = "2\n2\n1.5 0.8 5000 25 30\n0\n3.0 1.5\n7000 22 23 1\n";
        let mut output = Vec::new();
        let training_set = ConsoleInput::new(text.as_bytes(), &mut output)
            .training_set()?
            .ok_or_else(|| anyhow!("expected a training set"))?;
        assert_eq!(training_set.labels(), [false, true]);
        assert_eq!(training_set.examples()[1].observation.population, 7000.0);
        assert!(String::from_utf8(output)?.contains("Enter label for data point 2 (0 or 1): "));
        Ok(())
    }

    #[test]
    fn exit_ok() -> Result {
        assert_eq!(ConsoleInput::new("3\n".as_bytes(), Vec::new()).training_set()?, None);
        assert_eq!(ConsoleInput::new("".as_bytes(), Vec::new()).training_set()?, None);
        Ok(())
    }

    #[test]
    fn invalid_label_fails() {
        let text = "2\n1\n1.5 0.8 5000 25 30\n7\n";
        assert!(ConsoleInput::new(text.as_bytes(), Vec::new()).training_set().is_err());
    }

    #[test]
    fn zero_data_points_fails() {
        let error = ConsoleInput::new("2\n0\n".as_bytes(), Vec::new())
            .training_set()
            .unwrap_err();
        assert!(error.to_string().contains("training set is empty"));
    }

    #[test]
    fn zone_conditions_ok() -> Result {
        let text = "100000\n2.0\n1.0\n25\n30\n20\n";
        let conditions = ConsoleInput::new(text.as_bytes(), Vec::new()).zone_conditions()?;
        assert_eq!(conditions.observation, Observation::from([2.0, 1.0, 100000.0, 25.0, 30.0]));
        assert_eq!(conditions.horizon_days, 20);
        Ok(())
    }

    #[test]
    fn zone_conditions_not_a_number_fails() {
        let text = "many\n";
        let error = ConsoleInput::new(text.as_bytes(), Vec::new())
            .zone_conditions()
            .unwrap_err();
        assert!(error.to_string().contains("`many` is not a valid population"));
    }

    #[test]
    fn zone_conditions_negative_days_fails() {
        let text = "100000\n2.0\n1.0\n25\n30\n-5\n";
        let error = ConsoleInput::new(text.as_bytes(), Vec::new())
            .zone_conditions()
            .unwrap_err();
        assert!(error.to_string().contains("`-5` is not a valid number of days"));
    }

    #[test]
    fn zone_conditions_truncated_fails() {
        let text = "100000 2.0\n";
        assert!(ConsoleInput::new(text.as_bytes(), Vec::new()).zone_conditions().is_err());
    }
}
