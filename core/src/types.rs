//! Shared primitive types used across the distribution engine.

/// A roster member's display name. Names are the identity key: tasks
/// reference their assignee by name, and every strategy returns one.
pub type MemberName = String;

/// A stable identifier for a task already in flight.
pub type TaskId = String;

/// Premium at or above which a task counts as high value.
pub const HIGH_VALUE_PREMIUM: f64 = 5_000.0;

/// Default imbalance tolerance (percentage points either side of 100%)
/// used by the redistribution engine.
pub const DEFAULT_MAX_IMBALANCE_PERCENT: f64 = 50.0;
