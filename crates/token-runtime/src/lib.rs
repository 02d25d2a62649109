//! # Token Runtime
//!
//! Process-level wiring for the Stable Token.
//!
//! ## Modules
//!
//! - `config/` - `TokenConfig` from `ST_*` environment variables
//! - `logging/` - tracing subscriber (env filter, optional JSON)
//! - `deployment/` - Implementation, Store, Proxy and `init`, plus upgrades
//! - `walkthrough/` - scripted lifecycle run producing a serializable report
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Install logging
//! 3. Deploy and initialize the token
//! 4. Run the walkthrough and print its report

pub mod config;
pub mod deployment;
pub mod logging;
pub mod walkthrough;

pub use config::{ConfigError, TokenConfig};
pub use deployment::{Deployment, DeploymentError};
pub use logging::{init_logging, LoggingError};
pub use walkthrough::{run, WalkthroughReport, WalkthroughStep};
