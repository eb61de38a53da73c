use crate::{
    error::{DeskError, DeskResult},
    roster::{Roster, RosterMember},
    strategy::StrategyKind,
    task::{ExistingTask, TaskDescriptor},
    types::DEFAULT_MAX_IMBALANCE_PERCENT,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    #[serde(default)]
    pub default_strategy: StrategyKind,
    /// Percentage points beyond 100% (over) or below 100% (under) that
    /// trigger redistribution.
    #[serde(default = "default_max_imbalance")]
    pub max_imbalance_percent: f64,
}

fn default_max_imbalance() -> f64 {
    DEFAULT_MAX_IMBALANCE_PERCENT
}

impl DistributionConfig {
    /// Reject a negative or non-finite tolerance: the over and under bands
    /// would overlap. `source` names where the value came from.
    pub fn validate(&self, source: &str) -> DeskResult<()> {
        let value = self.max_imbalance_percent;
        if !value.is_finite() || value < 0.0 {
            return Err(DeskError::Config {
                path: source.to_string(),
                reason: format!("max_imbalance_percent {value} must be a non-negative number"),
            });
        }
        Ok(())
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            default_strategy: StrategyKind::default(),
            max_imbalance_percent: DEFAULT_MAX_IMBALANCE_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TaskSnapshotFile {
    tasks: Vec<ExistingTask>,
}

#[derive(Debug, Clone, Deserialize)]
struct IncomingTasksFile {
    tasks: Vec<TaskDescriptor>,
}

#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub roster: Roster,
    pub distribution: DistributionConfig,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DeskResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| DeskError::Config {
        path: path.display().to_string(),
        reason: format!("cannot read: {e}"),
    })?;
    serde_json::from_str(&content).map_err(|e| DeskError::Config {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

impl DeskConfig {
    /// Load from the data/ directory.
    /// `roster.json` is required; `distribution.json` falls back to defaults.
    /// In tests, use DeskConfig::default_test().
    pub fn load(data_dir: impl AsRef<Path>) -> DeskResult<Self> {
        let data_dir = data_dir.as_ref();
        let roster: Roster = read_json(&data_dir.join("roster.json"))?;

        let distribution_path = data_dir.join("distribution.json");
        let distribution: DistributionConfig = if distribution_path.exists() {
            read_json(&distribution_path)?
        } else {
            log::info!(
                "config: {} not found, using default distribution settings",
                distribution_path.display()
            );
            DistributionConfig::default()
        };
        distribution.validate(&distribution_path.display().to_string())?;

        log::debug!(
            "config: loaded {} roster member(s), strategy={}",
            roster.len(),
            distribution.default_strategy
        );
        Ok(Self {
            roster,
            distribution,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let members = vec![
            RosterMember::new("Mark Vallejo", &["high-value", "commercial"], 15),
            RosterMember::new("Ana Ortiz", &["nsf", "payment-issues"], 20),
            RosterMember::new("Priya Shah", &["cancellation", "retention"], 20),
            RosterMember::new("Devon Brooks", &["nsf", "cancellation"], 10),
        ];
        Self {
            roster: Roster::new(members).expect("test roster names are unique"),
            distribution: DistributionConfig::default(),
        }
    }
}

/// Load the snapshot of tasks in flight: `{"tasks": [...]}`.
pub fn load_task_snapshot(path: impl AsRef<Path>) -> DeskResult<Vec<ExistingTask>> {
    let file: TaskSnapshotFile = read_json(path.as_ref())?;
    Ok(file.tasks)
}

/// Load a batch of tasks awaiting assignment: `{"tasks": [...]}`.
pub fn load_incoming_tasks(path: impl AsRef<Path>) -> DeskResult<Vec<TaskDescriptor>> {
    let file: IncomingTasksFile = read_json(path.as_ref())?;
    Ok(file.tasks)
}
