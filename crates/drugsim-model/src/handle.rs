//! Session-scoped handle over the placeholder network.
//!
//! The handle moves `Unloaded → Trained → Ready` exactly once. Construction,
//! fitting and inference run on the blocking pool and are bounded by the
//! configured timeout. A worker that outlives its timeout is told to stop
//! through a shared cancel flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use candle_core::Device;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::encoding::encode_structure;
use crate::network::{PlaceholderNet, SyntheticBatch};
use crate::{ModelConfig, ModelError, Result};

/// Lifecycle of the session's network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelPhase {
    Unloaded,
    Trained,
    Ready,
}

/// Raw network output, both values in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    pub efficacy: f32,
    pub toxicity: f32,
}

pub struct ModelHandle {
    config: ModelConfig,
    phase: ModelPhase,
    net: Option<Arc<PlaceholderNet>>,
    training_runs: usize,
}

impl ModelHandle {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            phase: ModelPhase::Unloaded,
            net: None,
            training_runs: 0,
        }
    }

    pub fn phase(&self) -> ModelPhase {
        self.phase
    }

    /// How many times the network has been built and fitted.
    pub fn training_runs(&self) -> usize {
        self.training_runs
    }

    /// Encode `structure`, training the network first if this is the first call.
    pub async fn predict(&mut self, structure: &str) -> Result<ModelOutput> {
        let net = match &self.net {
            Some(net) => Arc::clone(net),
            None => self.train().await?,
        };

        let features = encode_structure(structure);
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let worker = tokio::task::spawn_blocking(move || {
            if flag.load(Ordering::Relaxed) {
                return Err(ModelError::Cancelled);
            }
            net.infer(&features)
        });
        let [efficacy, toxicity] = match tokio::time::timeout(self.config.timeout(), worker).await {
            Ok(joined) => joined??,
            Err(_) => {
                cancel.store(true, Ordering::Relaxed);
                warn!("Placeholder model inference timed out");
                return Err(ModelError::Timeout(self.config.timeout_secs));
            }
        };

        if self.phase != ModelPhase::Ready {
            debug!("Placeholder model ready");
            self.phase = ModelPhase::Ready;
        }
        Ok(ModelOutput { efficacy, toxicity })
    }

    async fn train(&mut self) -> Result<Arc<PlaceholderNet>> {
        let start = Instant::now();
        info!(
            "Training placeholder model: {} samples x {} epochs",
            self.config.samples, self.config.epochs
        );

        let config = self.config.clone();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let worker = tokio::task::spawn_blocking(move || {
            let device = Device::Cpu;
            let net = PlaceholderNet::new(&device)?;
            let batch = SyntheticBatch::generate(config.samples, config.seed, &device)?;
            let loss = net.fit(&batch, &config, &flag)?;
            Ok::<_, ModelError>((net, loss))
        });

        let (net, loss) = match tokio::time::timeout(self.config.timeout(), worker).await {
            Ok(joined) => joined??,
            Err(_) => {
                cancel.store(true, Ordering::Relaxed);
                warn!("Placeholder model training timed out; handle stays unloaded");
                return Err(ModelError::Timeout(self.config.timeout_secs));
            }
        };

        info!(
            "Placeholder model trained in {:.2}s (final loss {:.4})",
            start.elapsed().as_secs_f32(),
            loss
        );

        let net = Arc::new(net);
        self.net = Some(Arc::clone(&net));
        self.training_runs += 1;
        self.phase = ModelPhase::Trained;
        Ok(net)
    }
}
