//! Redistribution engine.
//!
//! Greedy single pass over the snapshot: members above
//! 100 + `max_imbalance_percent` shed a fifth of their open tasks, lowest
//! priority first, to members below 100 − `max_imbalance_percent`.
//! Moves are proposals only; nothing in the snapshot is changed.
//!
//! The overloaded and underloaded lists are ordered once, by the
//! utilization seen at analysis time, and are not re-sorted as moves are
//! proposed. Only the running assigned counts change between moves.

use crate::{
    roster::Roster,
    specialty::member_matches,
    task::ExistingTask,
    types::{MemberName, TaskId},
    workload::{analyze, WorkloadStat},
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap, fmt};

/// Fraction of an overloaded member's open tasks proposed for a move.
pub const SHED_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedistributionReason {
    /// Target is underloaded and holds a specialty the task calls for.
    SpecialtyMatch,
    /// Target is the most underloaded member with a free slot.
    LoadBalance,
}

impl fmt::Display for RedistributionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedistributionReason::SpecialtyMatch => f.write_str("specialty match with spare capacity"),
            RedistributionReason::LoadBalance => f.write_str("load balancing to least utilized member"),
        }
    }
}

/// A proposed move of one open task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redistribution {
    pub task_id: TaskId,
    pub from: MemberName,
    pub to: MemberName,
    pub reason: RedistributionReason,
}

fn by_utilization(a: &&WorkloadStat, b: &&WorkloadStat) -> Ordering {
    a.utilization_percent
        .partial_cmp(&b.utilization_percent)
        .unwrap_or(Ordering::Equal)
}

/// Number of tasks an overloaded member with `assigned` open tasks sheds.
pub fn tasks_to_move(assigned: u32) -> usize {
    (assigned as f64 * SHED_FRACTION).floor() as usize
}

/// Propose moves from overloaded to underloaded members.
/// A target must still have a free slot after earlier proposed moves; the
/// fallback is the most underloaded member with room, else the task is skipped.
pub fn redistribute(
    tasks: &[ExistingTask],
    roster: &Roster,
    max_imbalance_percent: f64,
) -> Vec<Redistribution> {
    let workload = analyze(roster, tasks);

    let mut overloaded: Vec<&WorkloadStat> = workload
        .iter()
        .filter(|s| s.utilization_percent > 100.0 + max_imbalance_percent)
        .collect();
    overloaded.sort_by(|a, b| by_utilization(b, a));

    let mut underloaded: Vec<&WorkloadStat> = workload
        .iter()
        .filter(|s| s.utilization_percent < 100.0 - max_imbalance_percent)
        .collect();
    underloaded.sort_by(by_utilization);

    let mut assigned: HashMap<&str, u32> = workload
        .iter()
        .map(|s| (s.name.as_str(), s.assigned_count))
        .collect();

    let mut moves = Vec::new();

    for source in &overloaded {
        let mut open: Vec<&ExistingTask> =
            tasks.iter().filter(|t| t.is_open_for(&source.name)).collect();
        open.sort_by_key(|t| t.priority);

        for task in open.into_iter().take(tasks_to_move(source.assigned_count)) {
            let has_room = |stat: &&&WorkloadStat| {
                if stat.name == source.name {
                    return false;
                }
                let load = assigned.get(stat.name.as_str()).copied().unwrap_or(0);
                roster
                    .get(&stat.name)
                    .is_some_and(|m| load < m.effective_capacity())
            };
            let descriptor = task.descriptor();

            let specialist = underloaded.iter().filter(has_room).find(|stat| {
                roster
                    .get(&stat.name)
                    .is_some_and(|m| member_matches(&descriptor, m))
            });
            let target = match specialist {
                Some(stat) => Some((*stat, RedistributionReason::SpecialtyMatch)),
                None => underloaded
                    .iter()
                    .find(has_room)
                    .map(|stat| (*stat, RedistributionReason::LoadBalance)),
            };

            let Some((target, reason)) = target else {
                log::debug!(
                    "redistribute: no target with room for task {} from {}",
                    task.id,
                    source.name
                );
                continue;
            };

            if let Some(count) = assigned.get_mut(source.name.as_str()) {
                *count = count.saturating_sub(1);
            }
            *assigned.entry(target.name.as_str()).or_insert(0) += 1;

            moves.push(Redistribution {
                task_id: task.id.clone(),
                from: source.name.clone(),
                to: target.name.clone(),
                reason,
            });
        }
    }

    if !moves.is_empty() {
        log::info!(
            "redistribute: {} move(s) proposed from {} overloaded member(s)",
            moves.len(),
            overloaded.len()
        );
    }
    moves
}
