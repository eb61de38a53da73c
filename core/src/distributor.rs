//! The task distributor: entry point for the host application.
//!
//! Owns the roster, the default strategy, and the round-robin counter, and
//! holds one registered assigner per strategy. Every call analyzes the
//! snapshot it is handed; the distributor keeps no task state of its own.
//!
//! RULES:
//!   - The roster is read-only after construction.
//!   - The round-robin counter is the only mutable state, and it is atomic.
//!   - Assignment never validates the task: malformed fields are defaulted,
//!     and a non-empty roster always yields an assignee.

use crate::{
    config::DeskConfig,
    error::{DeskError, DeskResult},
    redistribution::{redistribute, Redistribution},
    report::{report, WorkloadReport},
    roster::Roster,
    strategy::{build_assigner, Assigner, RoundRobinCounter, StrategyKind},
    task::{ExistingTask, TaskDescriptor, TaskStatus},
    types::{MemberName, TaskId},
    workload::{analyze, Workload},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The outcome of one assignment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub task: TaskDescriptor,
    pub assignee: MemberName,
    pub strategy: StrategyKind,
}

impl Assignment {
    /// The assigned task as an open entry for the next snapshot.
    pub fn into_existing_task(self, id: impl Into<TaskId>) -> ExistingTask {
        ExistingTask {
            id: id.into(),
            task_type: self.task.task_type,
            priority: self.task.priority,
            premium: self.task.premium,
            assigned_to: Some(self.assignee),
            status: TaskStatus::Open,
        }
    }
}

pub struct TaskDistributor {
    roster: Roster,
    default_strategy: StrategyKind,
    max_imbalance_percent: f64,
    counter: Arc<RoundRobinCounter>,
    assigners: Vec<Box<dyn Assigner>>,
}

impl TaskDistributor {
    pub fn new(roster: Roster, default_strategy: StrategyKind, max_imbalance_percent: f64) -> Self {
        Self::with_counter(
            roster,
            default_strategy,
            max_imbalance_percent,
            Arc::new(RoundRobinCounter::new()),
        )
    }

    /// Share a rotation counter across distributors so round-robin stays
    /// monotonic process-wide.
    pub fn with_counter(
        roster: Roster,
        default_strategy: StrategyKind,
        max_imbalance_percent: f64,
        counter: Arc<RoundRobinCounter>,
    ) -> Self {
        let assigners = StrategyKind::ALL
            .into_iter()
            .map(|kind| build_assigner(kind, Arc::clone(&counter)))
            .collect();
        Self {
            roster,
            default_strategy,
            max_imbalance_percent,
            counter,
            assigners,
        }
    }

    pub fn from_config(config: &DeskConfig) -> Self {
        Self::new(
            config.roster.clone(),
            config.distribution.default_strategy,
            config.distribution.max_imbalance_percent,
        )
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn default_strategy(&self) -> StrategyKind {
        self.default_strategy
    }

    pub fn counter(&self) -> &RoundRobinCounter {
        &self.counter
    }

    /// Assign with the default strategy.
    pub fn assign(&self, task: &TaskDescriptor, tasks: &[ExistingTask]) -> DeskResult<Assignment> {
        self.assign_with(self.default_strategy, task, tasks)
    }

    pub fn assign_with(
        &self,
        kind: StrategyKind,
        task: &TaskDescriptor,
        tasks: &[ExistingTask],
    ) -> DeskResult<Assignment> {
        let assigner = self
            .assigners
            .iter()
            .find(|a| a.kind() == kind)
            .ok_or_else(|| DeskError::UnknownStrategy {
                name: kind.to_string(),
            })?;
        let assignee = assigner.assign(task, tasks, &self.roster)?;
        log::debug!(
            "assign: '{}' priority={} premium={:.2} via {kind} → {assignee}",
            task.task_type,
            task.priority,
            task.effective_premium()
        );
        Ok(Assignment {
            task: task.clone(),
            assignee,
            strategy: kind,
        })
    }

    pub fn analyze(&self, tasks: &[ExistingTask]) -> Workload {
        analyze(&self.roster, tasks)
    }

    pub fn redistribute(&self, tasks: &[ExistingTask]) -> Vec<Redistribution> {
        redistribute(tasks, &self.roster, self.max_imbalance_percent)
    }

    pub fn report(&self, tasks: &[ExistingTask]) -> WorkloadReport {
        report(tasks, &self.roster, self.max_imbalance_percent)
    }
}
