//! Group a flat requirement list into category buckets keyed by policy.

use std::collections::HashMap;

use crate::model::Requirement;

/// Bucket name for requirements with no policy.
pub const DEFAULT_CATEGORY: &str = "General Compliance";

/// Requirements sharing one category, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket<'a> {
    pub name: String,
    pub requirements: Vec<&'a Requirement>,
}

impl CategoryBucket<'_> {
    pub fn count(&self) -> usize {
        self.requirements.len()
    }
}

/// Category a requirement is filed under: its policy text as given, or
/// [`DEFAULT_CATEGORY`] when the policy is blank.
pub fn category_of(req: &Requirement) -> &str {
    if req.policy.trim().is_empty() {
        DEFAULT_CATEGORY
    } else {
        &req.policy
    }
}

/// Partition requirements by category.
///
/// Buckets appear in order of first appearance and each keeps the input's
/// relative order. Every requirement lands in exactly one bucket.
pub fn categorize(reqs: &[Requirement]) -> Vec<CategoryBucket<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<CategoryBucket<'_>> = Vec::new();

    for req in reqs {
        let name = category_of(req);
        let slot = *index.entry(name).or_insert_with(|| {
            buckets.push(CategoryBucket {
                name: name.to_string(),
                requirements: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].requirements.push(req);
    }

    buckets
}

/// `(category, count)` pairs in bucket order.
pub fn category_counts(reqs: &[Requirement]) -> Vec<(String, usize)> {
    categorize(reqs)
        .into_iter()
        .map(|b| {
            let count = b.count();
            (b.name, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten_groups;
    use crate::model::OrganizedGroup;

    fn req(id: &str, policy: &str) -> Requirement {
        Requirement {
            id: id.into(),
            policy: policy.into(),
            ..Default::default()
        }
    }

    #[test]
    fn buckets_in_first_appearance_order() {
        let reqs = vec![
            req("1", "SOX"),
            req("2", "GDPR"),
            req("3", "SOX"),
            req("4", "HIPAA"),
            req("5", "GDPR"),
        ];
        let buckets = categorize(&reqs);
        let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["SOX", "GDPR", "HIPAA"]);
        let sox: Vec<&str> = buckets[0].requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(sox, ["1", "3"]);
    }

    #[test]
    fn empty_policy_goes_to_default_bucket() {
        let reqs = vec![req("1", ""), req("2", "   "), req("3", "SOX")];
        let counts = category_counts(&reqs);
        assert_eq!(
            counts,
            vec![(DEFAULT_CATEGORY.to_string(), 2), ("SOX".to_string(), 1)]
        );
    }

    #[test]
    fn buckets_partition_the_input() {
        let reqs: Vec<Requirement> = (0..20)
            .map(|i| req(&i.to_string(), ["A", "B", "", "C"][i % 4]))
            .collect();
        let buckets = categorize(&reqs);

        let total: usize = buckets.iter().map(|b| b.count()).sum();
        assert_eq!(total, reqs.len());

        for r in &reqs {
            let hits = buckets
                .iter()
                .flat_map(|b| b.requirements.iter())
                .filter(|x| x.id == r.id)
                .count();
            assert_eq!(hits, 1, "requirement {} should appear once", r.id);
        }
    }

    #[test]
    fn scenario_reconstructs_original_groups() {
        let groups = vec![
            OrganizedGroup {
                group_id: "group_1".into(),
                category: "Cybersecurity".into(),
                requirements: vec![req("A", "Cybersecurity"), req("B", "Cybersecurity")],
                ..Default::default()
            },
            OrganizedGroup {
                group_id: "group_2".into(),
                category: "Financial".into(),
                requirements: vec![req("C", "Financial")],
                ..Default::default()
            },
        ];
        let flat = flatten_groups(&groups);
        let counts = category_counts(&flat);
        assert_eq!(
            counts,
            vec![("Cybersecurity".to_string(), 2), ("Financial".to_string(), 1)]
        );
    }

    #[test]
    fn policy_text_is_kept_verbatim() {
        let reqs = vec![req("1", "SOX "), req("2", "SOX")];
        let counts = category_counts(&reqs);
        assert_eq!(
            counts,
            vec![("SOX ".to_string(), 1), ("SOX".to_string(), 1)]
        );
    }

    #[test]
    fn empty_input_has_no_buckets() {
        assert!(categorize(&[]).is_empty());
    }
}
