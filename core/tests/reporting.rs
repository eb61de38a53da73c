//! Workload report tests.

use lapse_core::{
    report::{balance_score, report, RecommendationKind},
    roster::{Roster, RosterMember},
    task::{ExistingTask, Priority},
    types::DEFAULT_MAX_IMBALANCE_PERCENT,
};

fn load(member: &str, count: usize) -> Vec<ExistingTask> {
    (0..count)
        .map(|i| ExistingTask::new(format!("{member}-{i}"), "nsf", Priority::Medium, 2_000.0, member))
        .collect()
}

/// Crit 160%, Warn 120%, Edge 150%, Steady 75%, Half 50%, Full 100%, Light 30%.
fn mixed_team() -> (Roster, Vec<ExistingTask>) {
    let roster = Roster::new(vec![
        RosterMember::new("Crit", &[], 10),
        RosterMember::new("Warn", &[], 10),
        RosterMember::new("Edge", &[], 10),
        RosterMember::new("Steady", &[], 20),
        RosterMember::new("Half", &[], 10),
        RosterMember::new("Full", &[], 10),
        RosterMember::new("Light", &[], 10),
    ])
    .unwrap();
    let tasks = [("Crit", 16), ("Warn", 12), ("Edge", 15), ("Steady", 15), ("Half", 5), ("Full", 10), ("Light", 3)]
        .into_iter()
        .flat_map(|(name, n)| load(name, n))
        .collect();
    (roster, tasks)
}

#[test]
fn balance_score_worked_example() {
    assert_eq!(balance_score(&[0.0, 100.0]), 50.0);
    assert_eq!(balance_score(&[80.0, 80.0, 80.0]), 100.0, "Even team should score 100");
    assert_eq!(balance_score(&[0.0, 300.0]), 0.0, "Score is floored at 0");
}

#[test]
fn report_balance_matches_member_utilization() {
    let roster = Roster::new(vec![
        RosterMember::new("A", &[], 10),
        RosterMember::new("B", &[], 10),
    ])
    .unwrap();
    let r = report(&load("B", 10), &roster, DEFAULT_MAX_IMBALANCE_PERCENT);

    assert_eq!(r.team_summary.average_utilization, 50.0);
    assert_eq!(r.team_summary.balance_score, 50.0);
}

#[test]
fn recommendations_follow_utilization_bands() {
    let (roster, tasks) = mixed_team();
    let r = report(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);

    let kind_of = |name: &str| {
        r.recommendations
            .iter()
            .find(|rec| rec.member == name)
            .map(|rec| (rec.kind, rec.priority))
    };

    assert_eq!(kind_of("Crit"), Some((RecommendationKind::OverloadCritical, Priority::High)));
    assert_eq!(kind_of("Warn"), Some((RecommendationKind::OverloadWarning, Priority::Medium)));
    assert_eq!(
        kind_of("Edge"),
        Some((RecommendationKind::OverloadWarning, Priority::Medium)),
        "Exactly 150% is a warning, not critical"
    );
    assert_eq!(kind_of("Light"), Some((RecommendationKind::Underutilized, Priority::Low)));
    for quiet in ["Steady", "Half", "Full"] {
        assert_eq!(kind_of(quiet), None, "{quiet} is within 50–100% and needs no recommendation");
    }
}

#[test]
fn team_summary_totals() {
    let (roster, mut tasks) = mixed_team();
    tasks.extend(load("Departed", 2));
    let summary = report(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT).team_summary;

    assert_eq!(summary.member_count, 7);
    assert_eq!(summary.total_capacity, 80);
    assert_eq!(summary.total_assigned, 76);
    assert_eq!(summary.overloaded_members, 3);
    assert_eq!(summary.underutilized_members, 1);
    assert_eq!(summary.orphaned_open_tasks, 2);
}

/// Crit (160%) sheds floor(16 × 0.2) = 3 tasks to Light, the only member under 50%.
#[test]
fn report_carries_redistribution_suggestions() {
    let (roster, tasks) = mixed_team();
    let r = report(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT);

    assert_eq!(r.redistribution_suggestions.len(), 3);
    assert!(r
        .redistribution_suggestions
        .iter()
        .all(|m| m.from == "Crit" && m.to == "Light"));
    assert_eq!(r.members.len(), 7);
}

#[test]
fn report_serializes_with_snake_case_sections() {
    let (roster, tasks) = mixed_team();
    let value = serde_json::to_value(report(&tasks, &roster, DEFAULT_MAX_IMBALANCE_PERCENT)).unwrap();

    for key in ["generated_at", "team_summary", "members", "redistribution_suggestions", "recommendations"] {
        assert!(value.get(key).is_some(), "Report JSON is missing '{key}'");
    }
    assert_eq!(value["recommendations"][0]["kind"], "overload_critical");
}
