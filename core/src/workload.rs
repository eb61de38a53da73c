//! Workload analyzer.
//!
//! Builds per-member load statistics from a snapshot of tasks in flight.
//! The result is a pure function of (roster, snapshot): it is recomputed in
//! full on every call and never cached, because callers mutate the task
//! list between decisions.

use crate::{
    roster::{Roster, RosterMember},
    task::{ExistingTask, Priority},
    types::MemberName,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub total: u32,
}

impl PriorityBreakdown {
    fn record(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
        self.total += 1;
    }
}

/// Load statistics for a single roster member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadStat {
    pub name: MemberName,
    pub capacity: u32,
    /// Open tasks only.
    pub assigned_count: u32,
    /// assigned / capacity × 100. Exceeds 100 when overloaded.
    pub utilization_percent: f64,
    /// Free slots, never negative.
    pub available: u32,
    pub priority_breakdown: PriorityBreakdown,
    pub avg_premium: f64,
    pub total_premium: f64,
    pub specialties: Vec<String>,
}

impl WorkloadStat {
    fn for_member(member: &RosterMember, open_tasks: &[&ExistingTask]) -> Self {
        let assigned_count = open_tasks.len() as u32;
        let mut priority_breakdown = PriorityBreakdown::default();
        let mut total_premium = 0.0;
        for task in open_tasks {
            priority_breakdown.record(task.priority);
            total_premium += task.effective_premium();
        }
        let avg_premium = if assigned_count > 0 {
            total_premium / assigned_count as f64
        } else {
            0.0
        };

        Self {
            name: member.name.clone(),
            capacity: member.capacity,
            assigned_count,
            utilization_percent: utilization(assigned_count, member),
            available: member.capacity.saturating_sub(assigned_count),
            priority_breakdown,
            avg_premium,
            total_premium,
            specialties: member.specialties.clone(),
        }
    }
}

/// Utilization of `member` if it held `assigned` open tasks.
pub fn utilization(assigned: u32, member: &RosterMember) -> f64 {
    assigned as f64 / member.effective_capacity() as f64 * 100.0
}

/// Workload statistics for a whole roster, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub stats: Vec<WorkloadStat>,
    /// Open tasks whose assignee is not on the roster (e.g. a former member).
    /// They carry no weight in any member's load.
    pub orphaned_open_tasks: u32,
}

impl Workload {
    pub fn get(&self, name: &str) -> Option<&WorkloadStat> {
        self.stats.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkloadStat> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Utilization for `name`, or 0 when the name is unknown.
    pub fn utilization_of(&self, name: &str) -> f64 {
        self.get(name).map(|s| s.utilization_percent).unwrap_or(0.0)
    }
}

/// Compute per-member workload from the task snapshot.
/// An empty roster yields an empty workload.
pub fn analyze(roster: &Roster, tasks: &[ExistingTask]) -> Workload {
    let stats: Vec<WorkloadStat> = roster
        .iter()
        .map(|member| {
            let open: Vec<&ExistingTask> =
                tasks.iter().filter(|t| t.is_open_for(&member.name)).collect();
            WorkloadStat::for_member(member, &open)
        })
        .collect();

    let orphaned_open_tasks = tasks
        .iter()
        .filter(|t| t.is_open())
        .filter(|t| matches!(t.assigned_to.as_deref(), Some(name) if !roster.contains(name)))
        .count() as u32;
    if orphaned_open_tasks > 0 {
        log::warn!(
            "workload: {orphaned_open_tasks} open task(s) assigned to names not on the roster; ignored"
        );
    }

    Workload {
        stats,
        orphaned_open_tasks,
    }
}
