//! Configuration for the placeholder model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Training and runtime knobs for [`crate::ModelHandle`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Training passes over the synthetic batch (default: 10)
    #[serde(default = "default_epochs")]
    pub epochs: usize,

    /// Synthetic input/target pairs generated for training (default: 100)
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// AdamW learning rate (default: 0.01)
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Upper bound on one train-or-infer step, in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seed for the synthetic batch; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_epochs()        -> usize { 10 }
fn default_samples()       -> usize { 100 }
fn default_learning_rate() -> f64   { 0.01 }
fn default_timeout_secs()  -> u64   { 30 }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            samples: default_samples(),
            learning_rate: default_learning_rate(),
            timeout_secs: default_timeout_secs(),
            seed: None,
        }
    }
}

impl ModelConfig {
    /// Set the number of training passes.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the synthetic batch size.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Seed the synthetic batch.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the step timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let cfg: ModelConfig = serde_json::from_str(r#"{ "epochs": 3 }"#).unwrap();
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.samples, 100);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn test_timeout_never_rounds_to_zero() {
        let cfg = ModelConfig::default().with_timeout(Duration::from_millis(10));
        assert_eq!(cfg.timeout_secs, 1);
    }
}
