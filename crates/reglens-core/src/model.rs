//! Pipeline output types as the backend serves them.
//!
//! Every nested field deserializes leniently: an absent or `null` field
//! becomes its empty/zero value, and free-text fields accept numbers too.
//! A half-populated record from the backend still loads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single compliance obligation extracted from a regulatory document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    /// Regulatory policy/framework. Doubles as the category key.
    #[serde(default, deserialize_with = "text")]
    pub policy: String,
    /// Responsible party.
    #[serde(default, deserialize_with = "text")]
    pub actor: String,
    #[serde(default, deserialize_with = "text")]
    pub requirement: String,
    #[serde(default, deserialize_with = "text")]
    pub trigger: String,
    /// Free text, e.g. "10 days" or "Immediately".
    #[serde(default, deserialize_with = "lenient_text")]
    pub deadline: Option<String>,
    /// Free text, e.g. "Civil penalties up to $100,000".
    #[serde(default, deserialize_with = "lenient_text")]
    pub penalty: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mapped_controls: Vec<MappedControl>,
}

/// An organizational control a requirement is mapped onto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedControl {
    #[serde(default, deserialize_with = "text")]
    pub control_id: String,
    #[serde(default, deserialize_with = "text")]
    pub category: String,
    #[serde(default, deserialize_with = "text")]
    pub status: String,
}

/// A category of requirements produced by the backend's LLM organization step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizedGroup {
    #[serde(default, deserialize_with = "text")]
    pub group_id: String,
    #[serde(default, deserialize_with = "text")]
    pub category: String,
    #[serde(default, deserialize_with = "text")]
    pub group_description: String,
    /// In `[0, 1]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_score: f64,
    /// ISO 8601 timestamp string.
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<Requirement>,
}

/// Intermediate per-policy grouping from the clustering step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCluster {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub cluster_id: String,
    #[serde(default, deserialize_with = "text")]
    pub policy: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<ClusteredRequirement>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_confidence: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

/// A requirement as it sits inside a cluster, with its clustering confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteredRequirement {
    #[serde(flatten)]
    pub requirement: Requirement,
    #[serde(
        default,
        alias = "confidence_score",
        deserialize_with = "null_as_default"
    )]
    pub confidence: f64,
}

/// A company-level gap assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default)]
    pub company_data: Value,
    #[serde(default)]
    pub requirements_data: Value,
    #[serde(default)]
    pub analysis_results: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub findings: Vec<Finding>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<GapTask>,
    /// Conventionally 0–100; no range is enforced.
    #[serde(default, deserialize_with = "null_as_default")]
    pub compliance_score: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default, deserialize_with = "text")]
    pub category: String,
    /// Free text; only the exact value `"critical"` counts as critical.
    #[serde(default, deserialize_with = "text")]
    pub severity: String,
    /// The backend emits this as a 1–5 number for findings.
    #[serde(default, deserialize_with = "lenient_text")]
    pub priority: Option<String>,
}

/// A remediation task attached to a gap analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapTask {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    /// Free text, e.g. "pending", "completed", "In Progress".
    #[serde(default, deserialize_with = "text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub due_date: Option<String>,
}

/// A stored extraction rule. Its risk comes from `confidence_score`, not text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRule {
    #[serde(default, deserialize_with = "text")]
    pub rule_id: String,
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub rule_type: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default, deserialize_with = "text")]
    pub source_document: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_score: f64,
}

/// Counts reported by the document processing pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements_extracted: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clusters_created: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub harmonized_groups: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub llm_organized_groups: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub final_confidence: f64,
}

/// Response of a complete document upload/process run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "text")]
    pub message: String,
    #[serde(default, deserialize_with = "text")]
    pub document_id: String,
    #[serde(default, deserialize_with = "text")]
    pub filename: String,
    /// Seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_time: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pipeline_results: PipelineResults,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organized_requirements: Vec<OrganizedGroup>,
}

// ── Lenient field decoding ──

/// Treat an explicit `null` like an absent field.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Accept a string, number or bool as text; `null` becomes `None`.
fn lenient_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(d)?.unwrap_or_default())
}
