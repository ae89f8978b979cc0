//! Alarm-driven target group membership handler.

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod load_balancer;
pub mod observability;

pub use config::HandlerConfig;
pub use error::HandlerError;
pub use handler::{Outcome, RegistrationAction, TransitionHandler};
pub use load_balancer::{AwsElbClient, QueryApiClient, TargetGroupService};
