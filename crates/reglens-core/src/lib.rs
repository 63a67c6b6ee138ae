//! Requirement aggregation and risk classification for the compliance dashboard.

pub mod board;
pub mod category;
mod error;
pub mod filter;
pub mod flatten;
pub mod handoff;
pub mod model;
pub mod risk;
pub mod schema;
pub mod snapshot;
pub mod stats;

pub use board::{BoardTask, TaskBoard, TaskStatus};
pub use category::{CategoryBucket, DEFAULT_CATEGORY, categorize, category_counts, category_of};
pub use error::CoreError;
pub use filter::RequirementFilter;
pub use flatten::{Placed, flatten_clusters, flatten_groups, place, regroup};
pub use handoff::HandoffStore;
pub use model::{
    ClusteredRequirement, ComplianceRule, Finding, GapAnalysis, GapTask, MappedControl,
    OrganizedGroup, PipelineResults, ProcessResponse, Requirement, RequirementCluster,
};
pub use risk::{ComplianceStatus, RiskLevel, RiskSource, assess_confidence, classify};
pub use snapshot::{Snapshot, SnapshotCell, Ticket};
pub use stats::{DashboardStats, OrganizedSummary, RiskCounts, StatusSummary};
