//! Flatten grouped pipeline output into a single requirement list.
//!
//! Order is group-then-within-group and is stable, so the same input always
//! produces the same list. Empty groups contribute nothing.

use std::collections::HashMap;

use crate::model::{OrganizedGroup, Requirement, RequirementCluster};

/// A requirement together with the group it came from.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub group: &'a OrganizedGroup,
    pub requirement: &'a Requirement,
}

/// Flatten organized groups into an owned requirement list.
pub fn flatten_groups(groups: &[OrganizedGroup]) -> Vec<Requirement> {
    groups
        .iter()
        .flat_map(|g| g.requirements.iter().cloned())
        .collect()
}

/// Flatten clusters, dropping the per-requirement clustering confidence.
pub fn flatten_clusters(clusters: &[RequirementCluster]) -> Vec<Requirement> {
    clusters
        .iter()
        .flat_map(|c| c.requirements.iter().map(|cr| cr.requirement.clone()))
        .collect()
}

/// Flatten while keeping a borrow of each requirement's owning group.
pub fn place(groups: &[OrganizedGroup]) -> Vec<Placed<'_>> {
    groups
        .iter()
        .flat_map(|group| {
            group
                .requirements
                .iter()
                .map(move |requirement| Placed { group, requirement })
        })
        .collect()
}

/// Rebuild groups from placed requirements, in order of first appearance.
///
/// Group metadata is copied from the owning group; the requirement list holds
/// only the requirements present in `placed`. Groups are keyed by `group_id`.
pub fn regroup(placed: &[Placed<'_>]) -> Vec<OrganizedGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<OrganizedGroup> = Vec::new();

    for p in placed {
        let slot = *index.entry(p.group.group_id.as_str()).or_insert_with(|| {
            groups.push(OrganizedGroup {
                requirements: Vec::new(),
                ..p.group.clone()
            });
            groups.len() - 1
        });
        groups[slot].requirements.push(p.requirement.clone());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClusteredRequirement;

    fn req(id: &str, policy: &str) -> Requirement {
        Requirement {
            id: id.into(),
            policy: policy.into(),
            ..Default::default()
        }
    }

    fn group(id: &str, category: &str, reqs: Vec<Requirement>) -> OrganizedGroup {
        OrganizedGroup {
            group_id: id.into(),
            category: category.into(),
            group_description: format!("{category} requirements"),
            confidence_score: 0.9,
            created_at: Some("2025-03-01T10:00:00".into()),
            requirements: reqs,
        }
    }

    fn ids(reqs: &[Requirement]) -> Vec<&str> {
        reqs.iter().map(|r| r.id.as_str()).collect()
    }

    fn scenario() -> Vec<OrganizedGroup> {
        vec![
            group(
                "group_1",
                "Cybersecurity",
                vec![req("A", "Cybersecurity"), req("B", "Cybersecurity")],
            ),
            group("group_2", "Financial", vec![req("C", "Financial")]),
        ]
    }

    #[test]
    fn group_then_within_group_order() {
        assert_eq!(ids(&flatten_groups(&scenario())), ["A", "B", "C"]);
    }

    #[test]
    fn flatten_is_complete() {
        let groups = scenario();
        let total: usize = groups.iter().map(|g| g.requirements.len()).sum();
        assert_eq!(flatten_groups(&groups).len(), total);
    }

    #[test]
    fn flatten_is_idempotent() {
        let groups = scenario();
        let first = serde_json::to_string(&flatten_groups(&groups)).unwrap();
        let second = serde_json::to_string(&flatten_groups(&groups)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn flatten_survives_regroup() {
        let groups = scenario();
        let regrouped = regroup(&place(&groups));
        assert_eq!(flatten_groups(&regrouped), flatten_groups(&groups));
        assert_eq!(regrouped, groups);
    }

    #[test]
    fn empty_group_emits_nothing() {
        let mut groups = scenario();
        groups.insert(1, group("group_empty", "Regulatory", vec![]));
        assert_eq!(ids(&flatten_groups(&groups)), ["A", "B", "C"]);
        // The empty group has no placed requirement, so regroup cannot recreate it.
        assert_eq!(regroup(&place(&groups)).len(), 2);
    }

    #[test]
    fn placed_maps_back_to_owning_group() {
        let groups = scenario();
        let placed = place(&groups);
        assert_eq!(placed[1].group.category, "Cybersecurity");
        assert_eq!(placed[2].group.category, "Financial");
        assert_eq!(placed[2].requirement.id, "C");
    }

    #[test]
    fn clusters_flatten_in_order() {
        let clusters = vec![
            RequirementCluster {
                cluster_id: "cluster_0".into(),
                requirements: vec![
                    ClusteredRequirement {
                        requirement: req("r1", "SOX"),
                        confidence: 0.9,
                    },
                    ClusteredRequirement {
                        requirement: req("r2", "SOX"),
                        confidence: 0.8,
                    },
                ],
                ..Default::default()
            },
            RequirementCluster::default(),
            RequirementCluster {
                cluster_id: "cluster_1".into(),
                requirements: vec![ClusteredRequirement {
                    requirement: req("r3", "GDPR"),
                    confidence: 0.7,
                }],
                ..Default::default()
            },
        ];
        assert_eq!(ids(&flatten_clusters(&clusters)), ["r1", "r2", "r3"]);
    }
}
