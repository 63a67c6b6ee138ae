//! Search and filter over the flat requirement list.

use crate::category::category_of;
use crate::model::Requirement;
use crate::risk::RiskLevel;

/// All set criteria must match. An empty filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementFilter {
    /// Case-insensitive substring over id, policy, actor, requirement and trigger.
    pub query: Option<String>,
    /// Exact category name as produced by [`category_of`].
    pub category: Option<String>,
    pub risk: Option<RiskLevel>,
}

impl RequirementFilter {
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().is_none_or(|q| q.trim().is_empty())
            && self.category.is_none()
            && self.risk.is_none()
    }

    pub fn matches(&self, req: &Requirement) -> bool {
        if let Some(category) = &self.category
            && category_of(req) != category
        {
            return false;
        }
        if let Some(risk) = self.risk
            && req.risk_level() != risk
        {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                [
                    &req.id,
                    &req.policy,
                    &req.actor,
                    &req.requirement,
                    &req.trigger,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
            }
            _ => true,
        }
    }

    /// Matching requirements in input order.
    pub fn apply<'a>(&self, reqs: &'a [Requirement]) -> Vec<&'a Requirement> {
        reqs.iter().filter(|r| self.matches(r)).collect()
    }
}
