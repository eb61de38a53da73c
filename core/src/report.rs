//! Workload report: team balance, per-member stats and rebalancing suggestions.

use crate::{
    redistribution::{redistribute, Redistribution},
    roster::Roster,
    task::{ExistingTask, Priority},
    types::MemberName,
    workload::{analyze, Workload, WorkloadStat},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    OverloadCritical,
    OverloadWarning,
    Underutilized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub member: MemberName,
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub member_count: usize,
    pub total_capacity: u32,
    pub total_assigned: u32,
    pub average_utilization: f64,
    /// 100 − stddev(utilization), floored at 0. 100 is perfectly even.
    pub balance_score: f64,
    pub overloaded_members: usize,
    pub underutilized_members: usize,
    pub orphaned_open_tasks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadReport {
    pub generated_at: DateTime<Utc>,
    pub team_summary: TeamSummary,
    pub members: Vec<WorkloadStat>,
    pub redistribution_suggestions: Vec<Redistribution>,
    pub recommendations: Vec<Recommendation>,
}

/// Population mean and standard deviation.
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Balance score for a set of utilizations.
pub fn balance_score(utilizations: &[f64]) -> f64 {
    let (_, stddev) = mean_and_stddev(utilizations);
    (100.0 - stddev).max(0.0)
}

/// Recommendation for one member, if its utilization is outside 50–100%.
pub fn recommend(stat: &WorkloadStat) -> Option<Recommendation> {
    let util = stat.utilization_percent;
    let (kind, priority, message) = if util > 150.0 {
        (
            RecommendationKind::OverloadCritical,
            Priority::High,
            format!(
                "{} is critically overloaded at {util:.0}% ({} of {} slots); redistribute now",
                stat.name, stat.assigned_count, stat.capacity
            ),
        )
    } else if util > 100.0 {
        (
            RecommendationKind::OverloadWarning,
            Priority::Medium,
            format!(
                "{} is over capacity at {util:.0}%; hold new assignments",
                stat.name
            ),
        )
    } else if util < 50.0 {
        (
            RecommendationKind::Underutilized,
            Priority::Low,
            format!(
                "{} is at {util:.0}% with {} free slot(s); route new work here",
                stat.name, stat.available
            ),
        )
    } else {
        return None;
    };

    Some(Recommendation {
        member: stat.name.clone(),
        kind,
        priority,
        message,
    })
}

pub fn summarize(workload: &Workload) -> TeamSummary {
    let utilizations: Vec<f64> = workload.iter().map(|s| s.utilization_percent).collect();
    let (average_utilization, _) = mean_and_stddev(&utilizations);

    TeamSummary {
        member_count: workload.len(),
        total_capacity: workload.iter().map(|s| s.capacity).sum(),
        total_assigned: workload.iter().map(|s| s.assigned_count).sum(),
        average_utilization,
        balance_score: balance_score(&utilizations),
        overloaded_members: workload.iter().filter(|s| s.utilization_percent > 100.0).count(),
        underutilized_members: workload.iter().filter(|s| s.utilization_percent < 50.0).count(),
        orphaned_open_tasks: workload.orphaned_open_tasks,
    }
}

/// Build the full workload report for the snapshot.
pub fn report(tasks: &[ExistingTask], roster: &Roster, max_imbalance_percent: f64) -> WorkloadReport {
    let workload = analyze(roster, tasks);
    let team_summary = summarize(&workload);
    let recommendations = workload.iter().filter_map(recommend).collect();
    let redistribution_suggestions = redistribute(tasks, roster, max_imbalance_percent);

    log::info!(
        "report: {} members, avg utilization {:.1}%, balance {:.1}",
        team_summary.member_count,
        team_summary.average_utilization,
        team_summary.balance_score
    );

    WorkloadReport {
        generated_at: Utc::now(),
        team_summary,
        members: workload.stats,
        redistribution_suggestions,
        recommendations,
    }
}
