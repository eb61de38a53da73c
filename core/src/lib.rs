//! Retention task distribution for policy-lapse workflows.
//!
//! Given a roster of retention specialists and a snapshot of tasks in
//! flight, the engine picks an assignee for each new NSF/cancellation task,
//! proposes rebalancing moves for an overloaded team, and summarizes team
//! workload for display.

pub mod config;
pub mod distributor;
pub mod error;
pub mod redistribution;
pub mod report;
pub mod roster;
pub mod specialty;
pub mod strategy;
pub mod task;
pub mod types;
pub mod workload;

pub use distributor::{Assignment, TaskDistributor};
pub use error::{DeskError, DeskResult};
