//! Load balancer target group subsystem.
//!
//! # Data Flow
//! ```text
//! TransitionHandler decides an action
//!     → TargetGroupService (capability trait)
//!         - describe_target_health (read-only health check)
//!         - deregister_targets / register_targets (mutations)
//!     → aws.rs (AwsElbClient: signed calls through the AWS SDK, default backend)
//!       or query.rs (QueryApiClient: unsigned Query API for emulators)
//!     → ServiceResponse (status code + request id)
//! ```
//!
//! # Design Decisions
//! - The handler only depends on the trait; tests swap in a recording fake
//! - A non-success status is data, not an error
//! - Transport, timeout and credential rejection (401/403) are `Err`
//! - An undecodable health body is logged and reported as empty

pub mod aws;
pub mod query;
pub mod types;

use std::future::Future;

pub use aws::AwsElbClient;
pub use query::QueryApiClient;
pub use types::{
    classify_status, is_success_status, EndpointId, ServiceError, ServiceResponse, ServiceResult,
    TargetDescription, TargetGroupArn, TargetHealth, TargetHealthDescription, TargetHealthReport,
    DEREGISTER_TARGETS, DESCRIBE_TARGET_HEALTH, REGISTER_TARGETS,
};

/// Capability set required of the load-balancing collaborator.
///
/// Every call targets exactly one target group and carries the endpoints
/// it applies to. Implementations never retry.
pub trait TargetGroupService {
    /// Query current membership and health of `targets` in `target_group`.
    fn describe_target_health(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> impl Future<Output = Result<TargetHealthReport, ServiceError>> + Send;

    /// Remove `targets` from `target_group`.
    fn deregister_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> impl Future<Output = Result<ServiceResponse, ServiceError>> + Send;

    /// Add `targets` to `target_group`.
    fn register_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> impl Future<Output = Result<ServiceResponse, ServiceError>> + Send;
}
