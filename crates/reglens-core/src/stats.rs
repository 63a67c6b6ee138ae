//! Dashboard roll-ups over gap analyses and requirements.
//!
//! Every count treats missing nested lists as empty, and the average of no
//! analyses is zero.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{GapAnalysis, OrganizedGroup, Requirement};
use crate::risk::RiskLevel;

/// Severity literal counted as critical. Case-sensitive.
pub const CRITICAL_SEVERITY: &str = "critical";
pub const COMPLETED_STATUS: &str = "completed";
pub const PENDING_STATUS: &str = "pending";

/// Requirement counts per derived risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskCounts {
    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Scalar summaries shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub average_compliance_score: f64,
    pub critical_findings_count: usize,
    pub completed_tasks_count: usize,
    pub pending_tasks_count: usize,
    pub risk_bucket_counts: RiskCounts,
}

impl DashboardStats {
    pub fn compute(analyses: &[GapAnalysis], requirements: &[Requirement]) -> Self {
        Self {
            average_compliance_score: average_compliance_score(analyses),
            critical_findings_count: critical_findings_count(analyses),
            completed_tasks_count: completed_tasks_count(analyses),
            pending_tasks_count: pending_tasks_count(analyses),
            risk_bucket_counts: risk_bucket_counts(requirements),
        }
    }
}

/// Arithmetic mean of compliance scores, `0.0` when there are none.
pub fn average_compliance_score(analyses: &[GapAnalysis]) -> f64 {
    if analyses.is_empty() {
        return 0.0;
    }
    let total: f64 = analyses.iter().map(|a| a.compliance_score).sum();
    total / analyses.len() as f64
}

pub fn critical_findings_count(analyses: &[GapAnalysis]) -> usize {
    analyses
        .iter()
        .flat_map(|a| &a.findings)
        .filter(|f| f.severity == CRITICAL_SEVERITY)
        .count()
}

pub fn completed_tasks_count(analyses: &[GapAnalysis]) -> usize {
    count_tasks_with_status(analyses, COMPLETED_STATUS)
}

pub fn pending_tasks_count(analyses: &[GapAnalysis]) -> usize {
    count_tasks_with_status(analyses, PENDING_STATUS)
}

fn count_tasks_with_status(analyses: &[GapAnalysis], status: &str) -> usize {
    analyses
        .iter()
        .flat_map(|a| &a.tasks)
        .filter(|t| t.status == status)
        .count()
}

pub fn risk_bucket_counts(requirements: &[Requirement]) -> RiskCounts {
    requirements
        .iter()
        .fold(RiskCounts::default(), |mut acc, r| {
            match r.risk_level() {
                RiskLevel::High => acc.high += 1,
                RiskLevel::Medium => acc.medium += 1,
                RiskLevel::Low => acc.low += 1,
            }
            acc
        })
}

/// Finding counts per severity label, in order of first appearance.
pub fn severity_breakdown(analyses: &[GapAnalysis]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for finding in analyses.iter().flat_map(|a| &a.findings) {
        let slot = *index.entry(finding.severity.as_str()).or_insert_with(|| {
            counts.push((finding.severity.clone(), 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }
    counts
}

// ── Backend-style summaries ──

/// Gap analysis status board summary.
///
/// Stored analyses are finished runs, so all of them count as `Completed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusSummary {
    pub to_do: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total_analyses: usize,
    /// Rounded to 2 decimals.
    pub average_compliance_score: f64,
}

impl StatusSummary {
    pub fn from_analyses(analyses: &[GapAnalysis]) -> Self {
        Self {
            to_do: 0,
            in_progress: 0,
            completed: analyses.len(),
            total_analyses: analyses.len(),
            average_compliance_score: round_to(average_compliance_score(analyses), 2),
        }
    }
}

/// Summary of the organized-requirements view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganizedSummary {
    pub total_groups: usize,
    pub total_requirements: usize,
    /// Distinct group categories in order of first appearance.
    pub categories: Vec<String>,
    /// Mean group confidence, rounded to 3 decimals. `0.0` with no groups.
    pub average_confidence: f64,
    /// Latest `created_at` across groups (ISO 8601 sorts lexically).
    pub last_updated: Option<String>,
}

impl OrganizedSummary {
    pub fn from_groups(groups: &[OrganizedGroup]) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for g in groups {
            if !categories.contains(&g.category) {
                categories.push(g.category.clone());
            }
        }

        let average_confidence = if groups.is_empty() {
            0.0
        } else {
            let total: f64 = groups.iter().map(|g| g.confidence_score).sum();
            round_to(total / groups.len() as f64, 3)
        };

        Self {
            total_groups: groups.len(),
            total_requirements: groups.iter().map(|g| g.requirements.len()).sum(),
            categories,
            average_confidence,
            last_updated: groups.iter().filter_map(|g| g.created_at.clone()).max(),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
