//! Specialty matcher.
//!
//! A fixed, ordered rule table decides which roster members suit a task.
//! Each rule pairs a task predicate with the specialty tag it requires;
//! a member matches when ANY rule fires for the task and the member holds
//! that rule's tag. The table is closed: specialty tags on the roster that
//! no rule names never produce a match.

use crate::{
    roster::{Roster, RosterMember},
    task::TaskDescriptor,
    types::MemberName,
};
use std::collections::BTreeSet;

pub struct SpecialtyRule {
    pub specialty: &'static str,
    pub applies: fn(&TaskDescriptor) -> bool,
}

fn type_contains(task: &TaskDescriptor, needle: &str) -> bool {
    task.task_type.to_ascii_lowercase().contains(needle)
}

pub const SPECIALTY_RULES: &[SpecialtyRule] = &[
    SpecialtyRule { specialty: "nsf",            applies: |t| type_contains(t, "nsf") },
    SpecialtyRule { specialty: "cancellation",   applies: |t| type_contains(t, "cancellation") },
    SpecialtyRule { specialty: "retention",      applies: |t| type_contains(t, "retention") },
    SpecialtyRule { specialty: "high-value",     applies: |t| t.is_high_value() },
    SpecialtyRule { specialty: "payment-issues", applies: |t| type_contains(t, "payment") },
    SpecialtyRule { specialty: "commercial",     applies: |t| type_contains(t, "commercial") },
];

/// Specialty tags the task calls for, in rule order.
pub fn required_specialties(task: &TaskDescriptor) -> Vec<&'static str> {
    SPECIALTY_RULES
        .iter()
        .filter(|rule| (rule.applies)(task))
        .map(|rule| rule.specialty)
        .collect()
}

pub fn member_matches(task: &TaskDescriptor, member: &RosterMember) -> bool {
    SPECIALTY_RULES
        .iter()
        .any(|rule| (rule.applies)(task) && member.has_specialty(rule.specialty))
}

/// Names of every roster member whose specialties suit `task`.
pub fn matching_members(task: &TaskDescriptor, roster: &Roster) -> BTreeSet<MemberName> {
    let required = required_specialties(task);
    if required.is_empty() {
        return BTreeSet::new();
    }
    roster
        .iter()
        .filter(|m| required.iter().any(|tag| m.has_specialty(tag)))
        .map(|m| m.name.clone())
        .collect()
}
