//! Terminal rendering for the dashboard views.

use reglens_core::{
    BoardTask, CategoryBucket, DashboardStats, OrganizedSummary, ProcessResponse, Requirement,
    RequirementCluster, RiskLevel, StatusSummary, TaskBoard,
};

const MAX_LIST_ITEMS: usize = 10;
const MAX_TEXT: usize = 72;

// ── Degraded state ──

/// Fetch failures are shown but never fatal; views render whatever loaded.
pub fn print_errors(errors: &[(&'static str, String)]) {
    for (name, err) in errors {
        eprintln!("warning: could not load {name}: {err}");
    }
    if !errors.is_empty() {
        eprintln!();
    }
}

// ── Organized requirements ──

pub fn print_organized_summary(summary: &OrganizedSummary) {
    println!("Organized Requirements");
    println!("  {:<26} {}", "groups", summary.total_groups);
    println!("  {:<26} {}", "requirements", summary.total_requirements);
    println!("  {:<26} {:.3}", "average confidence", summary.average_confidence);
    if let Some(ts) = &summary.last_updated {
        println!("  {:<26} {}", "last updated", ts);
    }
    println!();
}

pub fn print_category_view(buckets: &[CategoryBucket<'_>]) {
    if buckets.is_empty() {
        println!("No requirements to show.");
        return;
    }
    for bucket in buckets {
        println!("=== {} ({}) ===", bucket.name, bucket.count());
        for req in &bucket.requirements {
            print_requirement_card(req);
        }
        println!();
    }
}

fn print_requirement_card(req: &Requirement) {
    let risk = req.risk_level();
    println!("  [{}] {}  {}", risk_tag(risk), req.id, truncate(&req.requirement, MAX_TEXT));
    print_field("actor", &req.actor);
    print_field("trigger", &req.trigger);
    print_field("deadline", req.deadline.as_deref().unwrap_or_default());
    print_field("penalty", req.penalty.as_deref().unwrap_or_default());

    let controls = &req.mapped_controls;
    if !controls.is_empty() {
        println!("      {:<22} {}", "controls", controls.len());
        for c in controls.iter().take(MAX_LIST_ITEMS) {
            println!("        {:<20} {:<24} {}", c.control_id, c.category, c.status);
        }
        if controls.len() > MAX_LIST_ITEMS {
            println!("        ... and {} more", controls.len() - MAX_LIST_ITEMS);
        }
    }
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("      {:<22} {}", label, truncate(value, MAX_TEXT));
    }
}

fn risk_tag(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::High => "HIGH",
        RiskLevel::Medium => "MED ",
        RiskLevel::Low => "LOW ",
    }
}

// ── Clusters ──

pub fn print_clusters(clusters: &[RequirementCluster]) {
    if clusters.is_empty() {
        println!("No clusters loaded.");
        return;
    }
    for cluster in clusters {
        let label = if cluster.cluster_id.is_empty() {
            &cluster.id
        } else {
            &cluster.cluster_id
        };
        println!(
            "=== {}: {} ({} requirements, avg confidence {:.2}) ===",
            label,
            cluster.policy,
            cluster.requirements.len(),
            cluster.average_confidence
        );
        for cr in cluster.requirements.iter().take(MAX_LIST_ITEMS) {
            println!(
                "  {:>5.2}  {:<12} {}",
                cr.confidence,
                cr.requirement.id,
                truncate(&cr.requirement.requirement, MAX_TEXT)
            );
        }
        if cluster.requirements.len() > MAX_LIST_ITEMS {
            println!("  ... and {} more", cluster.requirements.len() - MAX_LIST_ITEMS);
        }
        println!();
    }
}

// ── Roll-ups ──

pub fn print_stats(stats: &DashboardStats, status: &StatusSummary, severities: &[(String, usize)]) {
    println!("Compliance");
    println!("  {:<26} {:.1}", "average score", stats.average_compliance_score);
    println!("  {:<26} {}", "critical findings", stats.critical_findings_count);
    println!("  {:<26} {}", "completed tasks", stats.completed_tasks_count);
    println!("  {:<26} {}", "pending tasks", stats.pending_tasks_count);
    println!();

    println!("Requirement Risk");
    for level in RiskLevel::ALL {
        println!("  {:<26} {}", level, stats.risk_bucket_counts.get(level));
    }
    println!();

    println!("Gap Analyses");
    println!("  {:<26} {}", "To-do", status.to_do);
    println!("  {:<26} {}", "In-progress", status.in_progress);
    println!("  {:<26} {}", "Completed", status.completed);
    println!("  {:<26} {:.2}", "average score", status.average_compliance_score);
    println!();

    if !severities.is_empty() {
        println!("Findings by Severity");
        for (severity, count) in severities {
            println!("  {:<26} {}", severity, count);
        }
        println!();
    }
}

// ── Task board ──

pub fn print_board(board: &TaskBoard) {
    if board.is_empty() {
        println!("No tasks loaded.");
        return;
    }
    for (status, tasks) in board.columns() {
        println!("=== {} ({}) ===", status, tasks.len());
        for task in tasks {
            print_task(task);
        }
        println!();
    }
    if board.is_dirty() {
        println!("(local edits only; they are discarded on the next load)");
    }
}

fn print_task(task: &BoardTask) {
    println!("  {:<20} {}", task.id, truncate(&task.title, MAX_TEXT));
    if let Some(p) = &task.priority {
        println!("      {:<22} {}", "priority", p);
    }
    if let Some(a) = &task.assignee {
        println!("      {:<22} {}", "assigned to", a);
    }
    if let Some(d) = &task.due {
        println!("      {:<22} {}", "due", d);
    }
}

// ── Upload ──

pub fn print_upload(resp: &ProcessResponse) {
    let p = &resp.pipeline_results;
    println!("=== {} ===", resp.filename);
    if !resp.message.is_empty() {
        println!("{}", resp.message);
    }
    println!();
    println!("Pipeline");
    println!("  {:<26} {}", "document id", resp.document_id);
    println!("  {:<26} {:.2}s", "processing time", resp.processing_time);
    println!("  {:<26} {}", "requirements extracted", p.requirements_extracted);
    println!("  {:<26} {}", "clusters created", p.clusters_created);
    println!("  {:<26} {}", "harmonized groups", p.harmonized_groups);
    println!("  {:<26} {}", "organized groups", p.llm_organized_groups);
    println!("  {:<26} {:.2}", "final confidence", p.final_confidence);
    println!();
}

/// Shorten to at most `max` chars, ending in "..." when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
