//! Retention team roster.
//!
//! The roster is load-once configuration: the engine reads it on every
//! decision but never mutates it. Member order is significant, since every
//! strategy breaks ties by roster order and round-robin walks it in sequence.

use crate::{
    error::{DeskError, DeskResult},
    types::MemberName,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A retention specialist who works lapse tasks.
/// - `specialties`: category tags such as "nsf", "cancellation", "high-value".
/// - `capacity`:    maximum concurrent open tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub name: MemberName,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub capacity: u32,
}

impl RosterMember {
    pub fn new(name: impl Into<String>, specialties: &[&str], capacity: u32) -> Self {
        Self {
            name: name.into(),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            capacity,
        }
    }

    /// Tag comparison ignores ASCII case ("NSF" and "nsf" are the same tag).
    pub fn has_specialty(&self, tag: &str) -> bool {
        self.specialties.iter().any(|s| s.eq_ignore_ascii_case(tag))
    }

    /// Capacity used as the utilization denominator.
    /// A zero capacity would divide by zero, so it counts as one slot.
    pub fn effective_capacity(&self) -> u32 {
        self.capacity.max(1)
    }
}

/// An ordered, name-unique list of roster members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RosterFile", into = "RosterFile")]
pub struct Roster {
    members: Vec<RosterMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RosterFile {
    members: Vec<RosterMember>,
}

impl TryFrom<RosterFile> for Roster {
    type Error = DeskError;

    fn try_from(file: RosterFile) -> DeskResult<Self> {
        Roster::new(file.members)
    }
}

impl From<Roster> for RosterFile {
    fn from(roster: Roster) -> Self {
        RosterFile { members: roster.members }
    }
}

impl Roster {
    /// Build a roster, rejecting duplicate names.
    /// Zero-capacity members are kept; they are logged because every open
    /// task puts them over capacity.
    pub fn new(members: Vec<RosterMember>) -> DeskResult<Self> {
        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(member.name.as_str()) {
                return Err(DeskError::DuplicateMember {
                    name: member.name.clone(),
                });
            }
            if member.capacity == 0 {
                log::warn!("roster: member '{}' has zero capacity", member.name);
            }
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RosterMember> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// First member in roster order, or `EmptyRoster`.
    pub fn first(&self) -> DeskResult<&RosterMember> {
        self.members.first().ok_or(DeskError::EmptyRoster)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a RosterMember;
    type IntoIter = std::slice::Iter<'a, RosterMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
