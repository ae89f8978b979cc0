//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (TARGET_GROUP_ARN, ELB_ENDPOINT, LOG_LEVEL)
//!     → validation.rs (semantic checks)
//!     → HandlerConfig (validated, immutable)
//!     → injected into TransitionHandler at construction
//! ```
//!
//! # Design Decisions
//! - Config is read once at process start and never reloaded
//! - All fields except the target group ARN have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::HandlerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ServiceBackend;
pub use schema::ServiceConfig;
pub use schema::TargetGroupConfig;
