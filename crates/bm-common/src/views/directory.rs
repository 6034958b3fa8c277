use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{Resource, ResourceStatus};

/// Bench directory narrowing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectoryFilter {
    /// Case-insensitive substring over name, email, designation and skill names.
    pub search: Option<String>,
    pub status: Option<ResourceStatus>,
    /// Exact location.
    pub location: Option<String>,
    /// Exact skill name.
    pub skill: Option<String>,
    /// Minimum total years; resources with unknown experience never match.
    pub min_experience: Option<f64>,
}

impl DirectoryFilter {
    pub fn matches(&self, resource: &Resource) -> bool {
        self.matches_search(resource)
            && self.status.is_none_or(|status| resource.status == status)
            && self
                .location
                .as_deref()
                .is_none_or(|location| resource.location == location)
            && self
                .skill
                .as_deref()
                .is_none_or(|skill| resource.skills.iter().any(|s| s.name == skill))
            && self.min_experience.is_none_or(|min| {
                resource
                    .total_experience
                    .is_some_and(|years| years >= min)
            })
    }

    fn matches_search(&self, resource: &Resource) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let needle = term.to_lowercase();

        [&resource.name, &resource.email, &resource.designation]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
            || resource
                .skills
                .iter()
                .any(|skill| skill.name.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, resources: &'a [Resource]) -> Vec<&'a Resource> {
        resources.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// 1-based page slice. Pages past the end come back empty.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_items = items.len();

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages: total_items.div_ceil(per_page),
    }
}

/// Bench headcounts, as reported upstream or computed locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceStatistics {
    pub total: u64,
    pub atp: u64,
    pub deployed: u64,
    pub soft_blocked: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_location: BTreeMap<String, u64>,
}

impl ResourceStatistics {
    pub fn from_resources(resources: &[Resource]) -> Self {
        let count = |status| resources.iter().filter(|r| r.status == status).count() as u64;

        let mut by_status = BTreeMap::new();
        let mut by_location = BTreeMap::new();
        for resource in resources {
            *by_status.entry(resource.status.as_ref().to_string()).or_insert(0) += 1;
            if !resource.location.is_empty() {
                *by_location.entry(resource.location.clone()).or_insert(0) += 1;
            }
        }

        Self {
            total: resources.len() as u64,
            atp: count(ResourceStatus::Atp),
            deployed: count(ResourceStatus::Deployed),
            soft_blocked: count(ResourceStatus::SoftBlocked),
            by_status,
            by_location,
        }
    }

    /// Upstream figures win wherever they are non-zero (or non-empty).
    pub fn merge_upstream(self, upstream: &ResourceStatistics) -> Self {
        let pick = |remote: u64, local: u64| if remote > 0 { remote } else { local };
        let pick_map = |remote: &BTreeMap<String, u64>, local: BTreeMap<String, u64>| {
            if remote.is_empty() { local } else { remote.clone() }
        };

        Self {
            total: pick(upstream.total, self.total),
            atp: pick(upstream.atp, self.atp),
            deployed: pick(upstream.deployed, self.deployed),
            soft_blocked: pick(upstream.soft_blocked, self.soft_blocked),
            by_status: pick_map(&upstream.by_status, self.by_status),
            by_location: pick_map(&upstream.by_location, self.by_location),
        }
    }
}

/// Sorted, de-duplicated non-empty locations.
pub fn distinct_locations(resources: &[Resource]) -> Vec<String> {
    resources
        .iter()
        .filter(|r| !r.location.is_empty())
        .map(|r| r.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated skill names.
pub fn distinct_skills(resources: &[Resource]) -> Vec<String> {
    resources
        .iter()
        .flat_map(|r| r.skills.iter())
        .filter(|s| !s.name.is_empty())
        .map(|s| s.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
