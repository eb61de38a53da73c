//! Distributor tests: strategy dispatch, shared rotation, batch assignment.

use lapse_core::{
    config::DeskConfig,
    roster::{Roster, RosterMember},
    strategy::{RoundRobinCounter, StrategyKind},
    task::{ExistingTask, Priority, TaskDescriptor},
    DeskError, TaskDistributor,
};
use std::sync::Arc;

fn distributor(kind: StrategyKind) -> TaskDistributor {
    let config = DeskConfig::default_test();
    TaskDistributor::new(config.roster, kind, config.distribution.max_imbalance_percent)
}

#[test]
fn assign_uses_default_strategy() {
    let d = distributor(StrategyKind::LoadBalanced);
    let a = d.assign(&TaskDescriptor::new("nsf", Priority::High, 100.0), &[]).unwrap();

    assert_eq!(a.strategy, StrategyKind::LoadBalanced);
    assert_eq!(a.assignee, "Mark Vallejo", "Idle team: first member wins the tie");
}

/// Idle team, high-value commercial task: Mark holds both matching tags
/// and the high-value bonus, so hybrid sends it to him.
#[test]
fn hybrid_routes_high_value_commercial_work() {
    let d = distributor(StrategyKind::Hybrid);
    let task = TaskDescriptor::new("commercial_renewal", Priority::High, 25_000.0);

    assert_eq!(d.assign(&task, &[]).unwrap().assignee, "Mark Vallejo");
}

#[test]
fn assign_with_overrides_default() {
    let d = distributor(StrategyKind::Hybrid);
    let task = TaskDescriptor::new("cancellation", Priority::Low, 0.0);
    let a = d.assign_with(StrategyKind::SpecialtyFirst, &task, &[]).unwrap();

    assert_eq!(a.strategy, StrategyKind::SpecialtyFirst);
    assert_eq!(a.assignee, "Priya Shah", "First idle cancellation specialist");
}

#[test]
fn empty_roster_surfaces_error() {
    let d = TaskDistributor::new(Roster::default(), StrategyKind::Hybrid, 50.0);
    let result = d.assign(&TaskDescriptor::new("nsf", Priority::High, 0.0), &[]);
    assert!(matches!(result, Err(DeskError::EmptyRoster)));
}

/// Two distributors sharing a counter continue each other's rotation.
#[test]
fn shared_counter_keeps_rotation_monotonic() {
    let counter = Arc::new(RoundRobinCounter::new());
    let roster = DeskConfig::default_test().roster;
    let d1 = TaskDistributor::with_counter(roster.clone(), StrategyKind::RoundRobin, 50.0, Arc::clone(&counter));
    let d2 = TaskDistributor::with_counter(roster, StrategyKind::RoundRobin, 50.0, Arc::clone(&counter));
    let task = TaskDescriptor::new("nsf", Priority::Medium, 0.0);

    assert_eq!(d1.assign(&task, &[]).unwrap().assignee, "Mark Vallejo");
    assert_eq!(d2.assign(&task, &[]).unwrap().assignee, "Ana Ortiz");
    assert_eq!(d1.assign(&task, &[]).unwrap().assignee, "Priya Shah");

    d2.counter().reset();
    assert_eq!(d1.assign(&task, &[]).unwrap().assignee, "Mark Vallejo");
}

/// Feeding each assignment back into the snapshot spreads a batch out.
#[test]
fn sequential_batch_sees_its_own_assignments() {
    let roster = Roster::new(vec![
        RosterMember::new("A", &[], 2),
        RosterMember::new("B", &[], 2),
    ])
    .unwrap();
    let d = TaskDistributor::new(roster, StrategyKind::LoadBalanced, 50.0);

    let mut snapshot: Vec<ExistingTask> = Vec::new();
    let mut picks = Vec::new();
    for i in 0..4 {
        let a = d.assign(&TaskDescriptor::new("nsf", Priority::Medium, 0.0), &snapshot).unwrap();
        picks.push(a.assignee.clone());
        snapshot.push(a.into_existing_task(format!("batch-{i}")));
    }

    assert_eq!(picks, vec!["A", "B", "A", "B"]);
    let workload = d.analyze(&snapshot);
    assert!(workload.iter().all(|s| s.assigned_count == 2));
}
