//! Fixed-topology placeholder network.
//!
//! Architecture: 10 → 16 → 8 → 2 (ReLU, ReLU, sigmoid). Both outputs land in
//! [0, 1].

use std::sync::atomic::{AtomicBool, Ordering};

use candle_core::{DType, Device, Tensor};
use candle_nn::optim::{AdamW, Optimizer, ParamsAdamW};
use candle_nn::{linear, Linear, Module, VarBuilder, VarMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::encoding::FEATURE_LEN;
use crate::{ModelConfig, ModelError, Result};

const HIDDEN_DIM: usize = 16;
const BOTTLENECK_DIM: usize = 8;
/// Efficacy and toxicity.
pub const OUTPUT_DIM: usize = 2;

/// Three stacked linear layers over a CPU-resident var map.
pub struct PlaceholderNet {
    input: Linear,
    hidden: Linear,
    output: Linear,
    varmap: VarMap,
    device: Device,
}

/// Randomly generated training pairs; inputs and targets in [0, 1).
pub struct SyntheticBatch {
    pub inputs: Tensor,
    pub targets: Tensor,
}

impl SyntheticBatch {
    pub fn generate(samples: usize, seed: Option<u64>, device: &Device) -> Result<Self> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let inputs: Vec<f32> = (0..samples * FEATURE_LEN).map(|_| rng.gen::<f32>()).collect();
        let targets: Vec<f32> = (0..samples * OUTPUT_DIM).map(|_| rng.gen::<f32>()).collect();

        Ok(Self {
            inputs: Tensor::from_vec(inputs, (samples, FEATURE_LEN), device)?,
            targets: Tensor::from_vec(targets, (samples, OUTPUT_DIM), device)?,
        })
    }
}

impl PlaceholderNet {
    /// Build the network with freshly initialised weights.
    pub fn new(device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

        let input = linear(FEATURE_LEN, HIDDEN_DIM, vb.pp("input"))
            .map_err(|e| ModelError::Build(e.to_string()))?;
        let hidden = linear(HIDDEN_DIM, BOTTLENECK_DIM, vb.pp("hidden"))
            .map_err(|e| ModelError::Build(e.to_string()))?;
        let output = linear(BOTTLENECK_DIM, OUTPUT_DIM, vb.pp("output"))
            .map_err(|e| ModelError::Build(e.to_string()))?;

        Ok(Self {
            input,
            hidden,
            output,
            varmap,
            device: device.clone(),
        })
    }

    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.input.forward(xs)?.relu()?;
        let xs = self.hidden.forward(&xs)?.relu()?;
        candle_nn::ops::sigmoid(&self.output.forward(&xs)?)
    }

    /// Fit against a synthetic batch for `config.epochs` passes with MSE loss.
    /// Returns the final loss. `cancel` is checked before every epoch.
    pub fn fit(
        &self,
        batch: &SyntheticBatch,
        config: &ModelConfig,
        cancel: &AtomicBool,
    ) -> Result<f32> {
        let params = ParamsAdamW {
            lr: config.learning_rate,
            ..Default::default()
        };
        let mut opt = AdamW::new(self.varmap.all_vars(), params)
            .map_err(|e| ModelError::Training(e.to_string()))?;

        let mut last_loss = f32::NAN;
        for epoch in 0..config.epochs {
            if cancel.load(Ordering::Relaxed) {
                debug!("Training cancelled after {} epochs", epoch);
                return Err(ModelError::Cancelled);
            }
            let preds = self.forward(&batch.inputs)?;
            let loss = candle_nn::loss::mse(&preds, &batch.targets)?;
            opt.backward_step(&loss)
                .map_err(|e| ModelError::Training(e.to_string()))?;
            last_loss = loss.to_scalar::<f32>()?;
            debug!("epoch {} loss {:.5}", epoch + 1, last_loss);
        }
        Ok(last_loss)
    }

    /// Run one encoded structure through the network.
    pub fn infer(&self, features: &[f32; FEATURE_LEN]) -> Result<[f32; OUTPUT_DIM]> {
        let xs = Tensor::from_slice(features.as_slice(), (1, FEATURE_LEN), &self.device)?;
        let out = self.forward(&xs)?.squeeze(0)?.to_vec1::<f32>()?;
        match out.as_slice() {
            [efficacy, toxicity] => Ok([*efficacy, *toxicity]),
            other => Err(ModelError::Inference(format!(
                "expected {} outputs, got {}",
                OUTPUT_DIM,
                other.len()
            ))),
        }
    }
}
