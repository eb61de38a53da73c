//! Assignment strategies.
//!
//! Every strategy answers the same question: given a new task, the current
//! snapshot of tasks in flight and the roster, which single member takes it?
//!
//! All strategies except round-robin are pure functions of their inputs.
//! Round-robin owns a monotonic counter; it is shared through an `Arc` so a
//! distributor can reset it and concurrent callers never draw the same slot.
//!
//! Ties are always broken by roster order: the earliest member wins.

use crate::{
    error::{DeskError, DeskResult},
    roster::Roster,
    specialty::matching_members,
    task::{ExistingTask, Priority, TaskDescriptor},
    types::MemberName,
    workload::{analyze, Workload, WorkloadStat},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

// ── Strategy selection ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    RoundRobin,
    LoadBalanced,
    SpecialtyFirst,
    PriorityWeighted,
    #[default]
    Hybrid,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::RoundRobin,
        StrategyKind::LoadBalanced,
        StrategyKind::SpecialtyFirst,
        StrategyKind::PriorityWeighted,
        StrategyKind::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::RoundRobin       => "round_robin",
            StrategyKind::LoadBalanced     => "load_balanced",
            StrategyKind::SpecialtyFirst   => "specialty_first",
            StrategyKind::PriorityWeighted => "priority_weighted",
            StrategyKind::Hybrid           => "hybrid",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = DeskError;

    /// Accepts "load_balanced", "load-balanced" or "LOAD_BALANCED".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| DeskError::UnknownStrategy { name: s.to_string() })
    }
}

// ── Assigner contract ────────────────────────────────────────────────────────

/// The contract every strategy fulfils.
pub trait Assigner: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Pick exactly one roster member for `task`.
    /// Fails only with `EmptyRoster`.
    fn assign(
        &self,
        task: &TaskDescriptor,
        tasks: &[ExistingTask],
        roster: &Roster,
    ) -> DeskResult<MemberName>;
}

/// Build the assigner for `kind`. Round-robin draws from `counter`.
pub fn build_assigner(kind: StrategyKind, counter: Arc<RoundRobinCounter>) -> Box<dyn Assigner> {
    match kind {
        StrategyKind::RoundRobin       => Box::new(RoundRobin::new(counter)),
        StrategyKind::LoadBalanced     => Box::new(LoadBalanced),
        StrategyKind::SpecialtyFirst   => Box::new(SpecialtyFirst),
        StrategyKind::PriorityWeighted => Box::new(PriorityWeighted),
        StrategyKind::Hybrid           => Box::new(Hybrid),
    }
}

fn ensure_roster(roster: &Roster) -> DeskResult<()> {
    if roster.is_empty() {
        Err(DeskError::EmptyRoster)
    } else {
        Ok(())
    }
}

/// First member with the lowest utilization.
fn least_utilized<'a>(stats: impl Iterator<Item = &'a WorkloadStat>) -> Option<&'a WorkloadStat> {
    let mut best: Option<&'a WorkloadStat> = None;
    for s in stats {
        if best.map_or(true, |b| s.utilization_percent < b.utilization_percent) {
            best = Some(s);
        }
    }
    best
}

// ── Round robin ──────────────────────────────────────────────────────────────

/// Monotonic rotation counter, starting at 0.
#[derive(Debug, Default)]
pub struct RoundRobinCounter {
    next: AtomicU64,
}

impl RoundRobinCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current value and advance by one.
    pub fn advance(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub fn current(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.next.store(0, Ordering::Relaxed);
    }
}

/// Ignores task content and load; walks the roster in order.
pub struct RoundRobin {
    counter: Arc<RoundRobinCounter>,
}

impl RoundRobin {
    pub fn new(counter: Arc<RoundRobinCounter>) -> Self {
        Self { counter }
    }
}

impl Assigner for RoundRobin {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RoundRobin
    }

    fn assign(
        &self,
        _task: &TaskDescriptor,
        _tasks: &[ExistingTask],
        roster: &Roster,
    ) -> DeskResult<MemberName> {
        ensure_roster(roster)?;
        let slot = (self.counter.advance() % roster.len() as u64) as usize;
        Ok(roster.members()[slot].name.clone())
    }
}

// ── Load balanced ────────────────────────────────────────────────────────────

/// Least-utilized member under capacity, else least-utilized overall.
pub struct LoadBalanced;

fn load_balanced_pick(workload: &Workload) -> Option<&WorkloadStat> {
    least_utilized(workload.iter().filter(|s| s.utilization_percent < 100.0))
        .or_else(|| least_utilized(workload.iter()))
}

impl Assigner for LoadBalanced {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LoadBalanced
    }

    fn assign(
        &self,
        _task: &TaskDescriptor,
        tasks: &[ExistingTask],
        roster: &Roster,
    ) -> DeskResult<MemberName> {
        ensure_roster(roster)?;
        let workload = analyze(roster, tasks);
        load_balanced_pick(&workload)
            .map(|s| s.name.clone())
            .ok_or(DeskError::EmptyRoster)
    }
}

// ── Specialty first ──────────────────────────────────────────────────────────

/// Least-utilized specialty match under capacity; otherwise load balanced
/// over the full roster.
pub struct SpecialtyFirst;

impl Assigner for SpecialtyFirst {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SpecialtyFirst
    }

    fn assign(
        &self,
        task: &TaskDescriptor,
        tasks: &[ExistingTask],
        roster: &Roster,
    ) -> DeskResult<MemberName> {
        ensure_roster(roster)?;
        let workload = analyze(roster, tasks);
        let candidates = matching_members(task, roster);

        let specialist = least_utilized(
            workload
                .iter()
                .filter(|s| candidates.contains(&s.name))
                .filter(|s| s.utilization_percent < 100.0),
        );
        if specialist.is_none() {
            log::debug!(
                "specialty_first: no specialist under capacity for '{}' ({} candidates); load balancing",
                task.task_type,
                candidates.len()
            );
        }

        specialist
            .or_else(|| load_balanced_pick(&workload))
            .map(|s| s.name.clone())
            .ok_or(DeskError::EmptyRoster)
    }
}

// ── Scored strategies ────────────────────────────────────────────────────────

/// One member's score under a scored strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub name: MemberName,
    pub score: f64,
    pub specialty_match: bool,
    pub utilization_percent: f64,
}

/// Highest score; the earliest candidate wins a tie.
pub fn best_candidate(scores: &[CandidateScore]) -> Option<&CandidateScore> {
    let mut best: Option<&CandidateScore> = None;
    for c in scores {
        if best.map_or(true, |b| c.score > b.score) {
            best = Some(c);
        }
    }
    best
}

/// Priority-weighted scores, in roster order:
/// free slots + 10 (specialty match) + 5 (high priority) + 3 (high value).
pub fn priority_weighted_scores(
    task: &TaskDescriptor,
    workload: &Workload,
    roster: &Roster,
) -> Vec<CandidateScore> {
    let candidates = matching_members(task, roster);
    let mut task_bonus = 0.0;
    if task.priority == Priority::High {
        task_bonus += 5.0;
    }
    if task.is_high_value() {
        task_bonus += 3.0;
    }

    workload
        .iter()
        .map(|s| {
            let specialty_match = candidates.contains(&s.name);
            let mut score = s.available as f64 + task_bonus;
            if specialty_match {
                score += 10.0;
            }
            CandidateScore {
                name: s.name.clone(),
                score: score.max(0.0),
                specialty_match,
                utilization_percent: s.utilization_percent,
            }
        })
        .collect()
}

/// Hybrid scores, in roster order.
///
/// ```text
/// score = (max(0, 100 − util) + 50·match + 30·high_value_specialist) × priority
/// score ×= 0.5  when util > 100
/// score ×= 0.3  when util > 150   (×0.15 in total)
/// ```
pub fn hybrid_scores(task: &TaskDescriptor, workload: &Workload, roster: &Roster) -> Vec<CandidateScore> {
    let candidates = matching_members(task, roster);

    workload
        .iter()
        .map(|s| {
            let util = s.utilization_percent;
            let specialty_match = candidates.contains(&s.name);

            let mut score = (100.0 - util).max(0.0);
            if specialty_match {
                score += 50.0;
            }
            let high_value_specialist = s.specialties.iter().any(|t| t.eq_ignore_ascii_case("high-value"));
            if high_value_specialist && task.is_high_value() {
                score += 30.0;
            }
            score *= task.priority.multiplier();
            if util > 100.0 {
                score *= 0.5;
            }
            if util > 150.0 {
                score *= 0.3;
            }

            CandidateScore {
                name: s.name.clone(),
                score,
                specialty_match,
                utilization_percent: util,
            }
        })
        .collect()
}

pub struct PriorityWeighted;

impl Assigner for PriorityWeighted {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PriorityWeighted
    }

    fn assign(
        &self,
        task: &TaskDescriptor,
        tasks: &[ExistingTask],
        roster: &Roster,
    ) -> DeskResult<MemberName> {
        ensure_roster(roster)?;
        let workload = analyze(roster, tasks);
        let scores = priority_weighted_scores(task, &workload, roster);
        best_candidate(&scores)
            .map(|c| c.name.clone())
            .ok_or(DeskError::EmptyRoster)
    }
}

/// Default strategy: availability, specialty and priority in one score.
pub struct Hybrid;

impl Assigner for Hybrid {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hybrid
    }

    fn assign(
        &self,
        task: &TaskDescriptor,
        tasks: &[ExistingTask],
        roster: &Roster,
    ) -> DeskResult<MemberName> {
        ensure_roster(roster)?;
        let workload = analyze(roster, tasks);
        let scores = hybrid_scores(task, &workload, roster);
        let best = best_candidate(&scores).ok_or(DeskError::EmptyRoster)?;
        log::debug!(
            "hybrid: '{}' ({}) → {} score={:.2} util={:.1}%",
            task.task_type,
            task.priority,
            best.name,
            best.score,
            best.utilization_percent
        );
        Ok(best.name.clone())
    }
}
