//! drugsim-web: browser front end for the drug design-and-test simulator.
//! Provides:
//!   - A wizard page per browser session (create → review → test)
//!   - A JSON API mirroring the wizard actions
//!   - An SSE stream of session events
//!   - TOML configuration loading

pub mod config;
pub mod handlers;
pub mod panels;
pub mod router;
pub mod session;
pub mod sse;
pub mod state;
