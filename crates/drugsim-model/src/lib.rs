//! drugsim Placeholder Model
//!
//! A tiny fixed-topology network built with Candle. It is trained once per
//! session on randomly generated input/target pairs and then used to turn a
//! drug's structure string into two bounded values. The output carries no
//! chemical meaning; it is noise shaped by the network topology.
//!
//! # Example
//! ```no_run
//! use drugsim_model::{ModelConfig, ModelHandle};
//!
//! #[tokio::main]
//! async fn main() -> drugsim_model::Result<()> {
//!     let mut handle = ModelHandle::new(ModelConfig::default().with_seed(7));
//!     let out = handle.predict("eniaffac-MOL").await?;
//!     println!("efficacy={:.3} toxicity={:.3}", out.efficacy, out.toxicity);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod handle;
pub mod network;

pub use config::ModelConfig;
pub use encoding::{encode_structure, FEATURE_LEN};
pub use error::{ModelError, Result};
pub use handle::{ModelHandle, ModelOutput, ModelPhase};
pub use network::PlaceholderNet;
