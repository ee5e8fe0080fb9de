//! Binary logistic regression trained with online stochastic gradient descent.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::math::{dot, sigmoid};
use crate::prelude::*;

/// Probability above which a zone is classified as a disease zone.
pub const THRESHOLD: f64 = 0.5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    pub bias: f64,
    pub weights: Vec<f64>,
}

impl LogisticRegression {
    /// Creates an untrained model with all the parameters set to zero.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            bias: 0.0,
            weights: vec![0.0; dimension],
        }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Runs `n_epochs` passes over the examples, in the given order,
    /// adjusting the parameters after every single example.
    ///
    /// There is no convergence check: too large a learning rate or feature
    /// magnitudes drive the parameters to infinity or `NaN`.
    #[instrument(level = "debug", skip(self, features, labels), fields(n_examples = features.len()))]
    pub fn train(
        &mut self,
        features: &[FeatureVector],
        labels: &[bool],
        learning_rate: f64,
        n_epochs: usize,
    ) {
        assert_eq!(features.len(), labels.len(), "every example must have a label");

        for epoch in 0..n_epochs {
            for (x, is_positive) in features.iter().zip(labels) {
                let prediction = self.predict(x);
                let target = if *is_positive { 1.0 } else { 0.0 };
                self.adjust(x, target - prediction, prediction, learning_rate);
            }
            if epoch % 100 == 0 {
                tracing::trace!(epoch, bias = self.bias, weights = ?self.weights);
            }
        }
    }

    /// Probability of the positive class.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.dimension(), "feature vector length mismatch");
        sigmoid(self.bias + dot(&self.weights, x))
    }

    fn adjust(&mut self, x: &[f64], residual_error: f64, prediction: f64, learning_rate: f64) {
        let scale = learning_rate * residual_error * prediction * (1.0 - prediction);
        self.bias += scale;
        for (weight, xi) in self.weights.iter_mut().zip(x) {
            *weight += scale * xi;
        }
    }
}
