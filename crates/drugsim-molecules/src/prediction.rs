//! Efficacy / toxicity prediction for generated drugs.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use drugsim_common::{Drug, FixedDecimal, Result, TestResult, Variant, SIDE_EFFECT_VOCABULARY};
use drugsim_model::{ModelConfig, ModelHandle, ModelPhase};

use crate::randomizer::Randomizer;

const RESULT_DECIMALS: u8 = 1;
const RESULT_SIDE_EFFECTS: usize = 2;

/// Something that can turn a drug into a test result.
#[async_trait]
pub trait Predictor: Send {
    /// Short identifier shown in logs and the UI.
    fn name(&self) -> &str;

    async fn predict(&mut self, drug: &Drug, rng: &mut Randomizer) -> Result<TestResult>;

    /// Lifecycle of the backing network, if there is one.
    fn model_phase(&self) -> Option<ModelPhase> {
        None
    }

    /// Number of times the backing network has been trained.
    fn training_runs(&self) -> usize {
        0
    }
}

/// Build the predictor matching `variant`.
pub fn predictor_for(variant: Variant, model: ModelConfig) -> Box<dyn Predictor> {
    match variant {
        Variant::Basic => Box::new(RandomPredictor::new()),
        Variant::Enhanced => Box::new(ModelPredictor::new(model)),
    }
}

// ─────────────────────────────────────────────
//  Basic: pure randomness
// ─────────────────────────────────────────────

/// Draws every field at random; the drug's own fields are ignored.
#[derive(Debug, Default)]
pub struct RandomPredictor {}

impl RandomPredictor {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Predictor for RandomPredictor {
    fn name(&self) -> &str {
        "random"
    }

    async fn predict(&mut self, drug: &Drug, rng: &mut Randomizer) -> Result<TestResult> {
        let efficacy = rng.random_in_range(0.0, 100.0, RESULT_DECIMALS)?;
        let toxicity = rng.random_in_range(0.0, 100.0, RESULT_DECIMALS)?;
        let side_effects = rng
            .shuffle_and_take(&SIDE_EFFECT_VOCABULARY, RESULT_SIDE_EFFECTS)?
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(TestResult {
            drug_id: drug.id,
            efficacy,
            toxicity,
            side_effects,
            tested_at: Utc::now(),
        })
    }
}

// ─────────────────────────────────────────────
//  Enhanced: placeholder network
// ─────────────────────────────────────────────

/// Runs the drug's structure through the session's placeholder network.
/// Side effects are carried over from the drug.
pub struct ModelPredictor {
    handle: ModelHandle,
}

impl ModelPredictor {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            handle: ModelHandle::new(config),
        }
    }
}

#[async_trait]
impl Predictor for ModelPredictor {
    fn name(&self) -> &str {
        "placeholder-network"
    }

    async fn predict(&mut self, drug: &Drug, _rng: &mut Randomizer) -> Result<TestResult> {
        let out = self.handle.predict(&drug.structure).await?;
        debug!(
            "Network output for {}: efficacy={:.4} toxicity={:.4}",
            drug.name, out.efficacy, out.toxicity
        );

        Ok(TestResult {
            drug_id: drug.id,
            efficacy: to_percentage(out.efficacy),
            toxicity: to_percentage(out.toxicity),
            side_effects: drug.side_effects.clone(),
            tested_at: Utc::now(),
        })
    }

    fn model_phase(&self) -> Option<ModelPhase> {
        Some(self.handle.phase())
    }

    fn training_runs(&self) -> usize {
        self.handle.training_runs()
    }
}

/// [0, 1] network output → one-decimal percentage in [0, 100].
fn to_percentage(unit: f32) -> FixedDecimal {
    let pct = (unit as f64 * 100.0).clamp(0.0, 100.0);
    FixedDecimal::new((pct * 10.0).floor() / 10.0, RESULT_DECIMALS)
}
