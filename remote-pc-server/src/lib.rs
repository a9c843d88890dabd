//! HTTP remote-control server for desktop OS actions.

pub mod config;
pub mod http;
pub mod logging;

pub use config::{KeyTimingConfig, ServerConfig, DEFAULT_CONFIG_PATH};
pub use http::{router, serve};
