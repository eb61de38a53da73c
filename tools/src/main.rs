//! desk-runner: headless assignment runner for the lapse retention desk.
//!
//! Usage:
//!   desk-runner --data-dir ./data
//!   desk-runner --data-dir ./data --tasks data/tasks.json --incoming data/incoming.json
//!   desk-runner --data-dir ./data --strategy load_balanced --max-imbalance 40 --json

use anyhow::Result;
use lapse_core::{
    config::{load_incoming_tasks, load_task_snapshot, DeskConfig},
    report::WorkloadReport,
    strategy::StrategyKind,
    task::{ExistingTask, TaskDescriptor},
    Assignment, TaskDistributor,
};
use std::env;

#[derive(serde::Serialize)]
struct RunOutput {
    strategy: StrategyKind,
    assignments: Vec<Assignment>,
    report: WorkloadReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_mode = args.iter().any(|a| a == "--json");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let tasks_path = arg_value(&args, "--tasks").map(String::from)
        .unwrap_or_else(|| format!("{data_dir}/tasks.json"));
    let incoming_path = arg_value(&args, "--incoming").map(String::from)
        .unwrap_or_else(|| format!("{data_dir}/incoming.json"));

    let mut config = DeskConfig::load(data_dir)?;
    if let Some(name) = arg_value(&args, "--strategy") {
        config.distribution.default_strategy = name.parse()?;
    }
    config.distribution.max_imbalance_percent = parse_arg(
        &args,
        "--max-imbalance",
        config.distribution.max_imbalance_percent,
    );
    config.distribution.validate("--max-imbalance")?;

    if !json_mode {
        println!("Lapse Retention Desk: desk-runner");
        println!("  data_dir:   {data_dir}");
        println!("  tasks:      {tasks_path}");
        println!("  incoming:   {incoming_path}");
        println!("  strategy:   {}", config.distribution.default_strategy);
        println!("  imbalance:  {}%", config.distribution.max_imbalance_percent);
        println!();
    }

    let mut snapshot = load_task_snapshot(&tasks_path)?;
    let incoming = if std::path::Path::new(&incoming_path).exists() {
        load_incoming_tasks(&incoming_path)?
    } else {
        log::info!("no incoming batch at {incoming_path}; reporting only");
        Vec::new()
    };

    let distributor = TaskDistributor::from_config(&config);
    let assignments = assign_batch(&distributor, &incoming, &mut snapshot)?;
    let report = distributor.report(&snapshot);

    if json_mode {
        let output = RunOutput {
            strategy: distributor.default_strategy(),
            assignments,
            report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_assignments(&assignments);
        print_report(&report);
    }
    Ok(())
}

/// Assign each incoming task in order, appending it to the snapshot so the
/// next decision sees it. A failed assignment falls back to the first
/// roster member rather than leaving the task unassigned.
fn assign_batch(
    distributor: &TaskDistributor,
    incoming: &[TaskDescriptor],
    snapshot: &mut Vec<ExistingTask>,
) -> Result<Vec<Assignment>> {
    let mut assignments = Vec::with_capacity(incoming.len());
    for task in incoming {
        if let Err(e) = task.validate() {
            log::warn!("incoming task accepted with defaults: {e}");
        }
        let assignment = match distributor.assign(task, snapshot) {
            Ok(a) => a,
            Err(e) => {
                log::warn!("assignment failed ({e}); falling back to first roster member");
                Assignment {
                    task: task.clone(),
                    assignee: distributor.roster().first()?.name.clone(),
                    strategy: distributor.default_strategy(),
                }
            }
        };
        let id = format!("task-{}", uuid::Uuid::new_v4());
        snapshot.push(assignment.clone().into_existing_task(id));
        assignments.push(assignment);
    }
    Ok(assignments)
}

fn print_assignments(assignments: &[Assignment]) {
    if assignments.is_empty() {
        return;
    }
    println!("=== ASSIGNMENTS ===");
    for a in assignments {
        println!(
            "  {:<24} {:<6} ${:>10.2} → {}",
            a.task.task_type, a.task.priority, a.task.effective_premium(), a.assignee
        );
    }
    println!();
}

fn print_report(report: &WorkloadReport) {
    let summary = &report.team_summary;
    println!("=== TEAM SUMMARY ===");
    println!("  generated:      {}", format_timestamp(&report.generated_at));
    println!("  members:        {}", summary.member_count);
    println!("  assigned/cap:   {}/{}", summary.total_assigned, summary.total_capacity);
    println!("  avg util:       {:.1}%", summary.average_utilization);
    println!("  balance score:  {:.1}", summary.balance_score);
    println!("  overloaded:     {}", summary.overloaded_members);
    println!("  underutilized:  {}", summary.underutilized_members);
    if summary.orphaned_open_tasks > 0 {
        println!("  orphaned tasks: {}", summary.orphaned_open_tasks);
    }

    println!();
    println!("=== MEMBERS ===");
    for m in &report.members {
        println!(
            "  {:<18} {:>3}/{:<3} {:>6.1}% | H{} M{} L{} | avg ${:.0}",
            m.name,
            m.assigned_count,
            m.capacity,
            m.utilization_percent,
            m.priority_breakdown.high,
            m.priority_breakdown.medium,
            m.priority_breakdown.low,
            m.avg_premium
        );
    }

    if !report.redistribution_suggestions.is_empty() {
        println!();
        println!("=== PROPOSED MOVES ===");
        for r in &report.redistribution_suggestions {
            println!("  {} : {} → {} ({})", r.task_id, r.from, r.to, r.reason);
        }
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("=== RECOMMENDATIONS ===");
        for r in &report.recommendations {
            println!("  [{}] {}", r.priority, r.message);
        }
    }
}

fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
