//! Redistribution engine tests.

use lapse_core::{
    redistribution::{redistribute, tasks_to_move, RedistributionReason},
    roster::{Roster, RosterMember},
    task::{ExistingTask, Priority, TaskStatus},
    types::DEFAULT_MAX_IMBALANCE_PERCENT,
};

fn load(member: &str, task_type: &str, priority: Priority, count: usize) -> Vec<ExistingTask> {
    (0..count)
        .map(|i| {
            ExistingTask::new(
                format!("{member}-{}-{i}", priority.as_str()),
                task_type,
                priority,
                1_000.0,
                member,
            )
        })
        .collect()
}

/// One member at 200% (20/10), one at 10% (1/10): floor(20 × 0.2) = 4 moves.
#[test]
fn overloaded_member_sheds_a_fifth() {
    let roster = Roster::new(vec![
        RosterMember::new("Over", &[], 10),
        RosterMember::new("Under", &[], 10),
    ])
    .unwrap();
    let mut tasks = load("Over", "cancellation", Priority::Medium, 20);
    tasks.extend(load("Under", "cancellation", Priority::Medium, 1));

    assert_eq!(tasks_to_move(20), 4);
    let moves = redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);

    assert_eq!(moves.len(), 4, "Expected 4 moves, got {moves:?}");
    for m in &moves {
        assert_eq!(m.from, "Over");
        assert_eq!(m.to, "Under");
        assert_eq!(m.reason, RedistributionReason::LoadBalance);
    }
}

/// Low-priority tasks move first, regardless of snapshot order.
#[test]
fn lowest_priority_tasks_move_first() {
    let roster = Roster::new(vec![
        RosterMember::new("Over", &[], 10),
        RosterMember::new("Under", &[], 10),
    ])
    .unwrap();
    let mut tasks = load("Over", "nsf", Priority::High, 8);
    tasks.extend(load("Over", "nsf", Priority::Medium, 8));
    tasks.extend(load("Over", "nsf", Priority::Low, 4));

    let moves = redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);
    assert_eq!(moves.len(), 4);
    for m in &moves {
        assert!(m.task_id.contains("-low-"), "Moved {} before all low tasks", m.task_id);
    }
}

/// A specialist target is preferred even when a less loaded generalist exists.
#[test]
fn specialist_target_preferred() {
    let roster = Roster::new(vec![
        RosterMember::new("Over", &[], 10),
        RosterMember::new("Generalist", &[], 10),
        RosterMember::new("Specialist", &["nsf"], 10),
    ])
    .unwrap();
    let mut tasks = load("Over", "payment_reversal", Priority::Low, 5);
    tasks.extend(load("Over", "nsf", Priority::Medium, 15));
    tasks.extend(load("Specialist", "nsf", Priority::Medium, 1)); // 10%, Generalist at 0%

    let moves = redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);
    assert_eq!(moves.len(), 4);

    // The four lowest-priority tasks are payment reversals: no specialist
    // for those, so they go to the least loaded member.
    assert!(moves.iter().all(|m| m.to == "Generalist"), "{moves:?}");

    let mut nsf_only = load("Over", "nsf", Priority::Medium, 20);
    nsf_only.extend(load("Specialist", "nsf", Priority::Medium, 1));
    let moves = redistribute(&nsf_only, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);
    assert_eq!(moves.len(), 4);
    for m in &moves {
        assert_eq!(m.to, "Specialist");
        assert_eq!(m.reason, RedistributionReason::SpecialtyMatch);
    }
}

/// Targets stop receiving work once their running count reaches capacity.
#[test]
fn target_capacity_limits_moves() {
    let roster = Roster::new(vec![
        RosterMember::new("Over", &[], 10),
        RosterMember::new("Tiny", &[], 2),
    ])
    .unwrap();
    let tasks = load("Over", "nsf", Priority::Low, 30); // 300%, wants to shed 6

    let moves = redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);
    assert_eq!(moves.len(), 2, "Tiny has only 2 free slots: {moves:?}");
}

/// Moves into a member count against it for later overloaded members.
#[test]
fn running_counts_carry_across_sources() {
    let roster = Roster::new(vec![
        RosterMember::new("Worst", &[], 10),
        RosterMember::new("Bad", &[], 10),
        RosterMember::new("Spare", &[], 6),
    ])
    .unwrap();
    let mut tasks = load("Bad", "nsf", Priority::Low, 16); // 160% → sheds 3
    tasks.extend(load("Worst", "nsf", Priority::Low, 25)); // 250% → sheds 5

    let moves = redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);
    assert_eq!(moves.len(), 6, "Spare fills after 6 moves: {moves:?}");
    assert!(
        moves[..5].iter().all(|m| m.from == "Worst"),
        "Most overloaded member is processed first"
    );
    assert_eq!(moves[5].from, "Bad");
}

#[test]
fn balanced_team_needs_no_moves() {
    let roster = Roster::new(vec![
        RosterMember::new("A", &[], 10),
        RosterMember::new("B", &[], 10),
    ])
    .unwrap();
    let mut tasks = load("A", "nsf", Priority::Low, 12);
    tasks.extend(load("B", "nsf", Priority::Low, 6));

    assert!(redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT).is_empty());
}

#[test]
fn no_underloaded_members_means_no_moves() {
    let roster = Roster::new(vec![
        RosterMember::new("A", &[], 10),
        RosterMember::new("B", &[], 10),
    ])
    .unwrap();
    let mut tasks = load("A", "nsf", Priority::Low, 20);
    tasks.extend(load("B", "nsf", Priority::Low, 7));

    assert!(redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT).is_empty());
}

#[test]
fn closed_tasks_are_never_moved() {
    let roster = Roster::new(vec![
        RosterMember::new("Over", &[], 5),
        RosterMember::new("Under", &[], 10),
    ])
    .unwrap();
    let mut tasks: Vec<ExistingTask> = load("Over", "nsf", Priority::Low, 5)
        .into_iter()
        .map(|t| t.with_status(TaskStatus::Other("closed".into())))
        .collect();
    tasks.extend(load("Over", "nsf", Priority::High, 10)); // 200%

    let moves = redistribute(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);
    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.task_id.contains("-high-")));
}

/// A tighter tolerance widens both bands.
#[test]
fn imbalance_threshold_is_configurable() {
    let roster = Roster::new(vec![
        RosterMember::new("Over", &[], 10),
        RosterMember::new("Under", &[], 10),
    ])
    .unwrap();
    let mut tasks = load("Over", "nsf", Priority::Low, 14); // 140%
    tasks.extend(load("Under", "nsf", Priority::Low, 1));

    assert!(redistribute(&tasks, &roster, 50.0).is_empty());
    assert_eq!(redistribute(&tasks, &roster, 30.0).len(), 2);
}

/// A negative tolerance makes the bands overlap; a member in both lists
/// must never be proposed as its own target.
#[test]
fn overlapping_bands_never_move_to_self() {
    let roster = Roster::new(vec![
        RosterMember::new("A", &[], 10),
        RosterMember::new("B", &[], 10),
    ])
    .unwrap();
    let mut tasks = load("A", "nsf", Priority::Low, 6); // 60%
    tasks.extend(load("B", "nsf", Priority::Low, 9)); // 90%

    let moves = redistribute(&tasks, &roster, -60.0);
    assert!(moves.iter().all(|m| m.from != m.to), "Self-move proposed: {moves:?}");
    assert_eq!(moves.len(), 2, "{moves:?}");
}
