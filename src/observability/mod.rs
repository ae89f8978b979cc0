//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler, event decode, load balancer client
//!     → tracing events (structured fields)
//!     → invocation span (invocation_id, alarm_name)
//!     → logging.rs subscriber (pretty or JSON on stdout)
//! ```
//!
//! # Design Decisions
//! - Log lines are the only outcome channel; no metrics, no audit trail
//! - `RUST_LOG` wins over the configured level

pub mod logging;

pub use logging::{init_logging, subscriber};
