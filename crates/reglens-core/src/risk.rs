//! Heuristic risk classification.
//!
//! Two evidence shapes feed one classifier:
//!
//! - **Text**: a requirement's free-text `penalty` and `deadline`, matched
//!   case-insensitively against fixed keywords, first match wins.
//! - **Confidence**: a stored rule's extraction confidence in `[0, 1]`,
//!   bucketed by fixed thresholds. This rule also yields a compliance status.
//!
//! Both rules are deterministic: identical input always gives the same label.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ComplianceRule, Requirement};

/// Confidence at or above this is low risk / compliant.
pub const COMPLIANT_THRESHOLD: f64 = 0.8;
/// Confidence at or above this (and below [`COMPLIANT_THRESHOLD`]) is medium risk / pending.
pub const PENDING_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse `high|medium|low`, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Compliance status implied by a stored rule's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    Pending,
    NonCompliant,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::Pending => "pending",
            Self::NonCompliant => "non-compliant",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Evidence a risk level is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskSource<'a> {
    Text {
        penalty: Option<&'a str>,
        deadline: Option<&'a str>,
    },
    Confidence(f64),
}

impl<'a> From<&'a Requirement> for RiskSource<'a> {
    fn from(req: &'a Requirement) -> Self {
        RiskSource::Text {
            penalty: req.penalty.as_deref(),
            deadline: req.deadline.as_deref(),
        }
    }
}

impl From<&ComplianceRule> for RiskSource<'_> {
    fn from(rule: &ComplianceRule) -> Self {
        RiskSource::Confidence(rule.confidence_score)
    }
}

/// Classify a risk source. Never fails; every input maps to a level.
pub fn classify(source: &RiskSource<'_>) -> RiskLevel {
    match *source {
        RiskSource::Text { penalty, deadline } => classify_text(penalty, deadline),
        RiskSource::Confidence(score) => assess_confidence(score).0,
    }
}

/// Bucket a confidence score into a risk level and compliance status.
///
/// NaN fails both comparisons and lands in the high-risk bucket.
pub fn assess_confidence(score: f64) -> (RiskLevel, ComplianceStatus) {
    if score >= COMPLIANT_THRESHOLD {
        (RiskLevel::Low, ComplianceStatus::Compliant)
    } else if score >= PENDING_THRESHOLD {
        (RiskLevel::Medium, ComplianceStatus::Pending)
    } else {
        (RiskLevel::High, ComplianceStatus::NonCompliant)
    }
}

fn classify_text(penalty: Option<&str>, deadline: Option<&str>) -> RiskLevel {
    let penalty = penalty.unwrap_or_default().to_lowercase();
    let deadline = deadline.unwrap_or_default().to_lowercase();

    if penalty.contains("criminal") || deadline.contains("immediately") {
        RiskLevel::High
    } else if penalty.contains("civil") || deadline.contains("days") {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

impl Requirement {
    /// Derived from penalty and deadline text. Not stored.
    pub fn risk_level(&self) -> RiskLevel {
        classify(&RiskSource::from(self))
    }
}

impl ComplianceRule {
    /// Risk level and compliance status from the rule's confidence score.
    pub fn assessment(&self) -> (RiskLevel, ComplianceStatus) {
        assess_confidence(self.confidence_score)
    }
}
