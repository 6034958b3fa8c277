//! Requirements are not served by upstream; they are reconstructed from the
//! considerations recorded on resources.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::date::{day_string, timestamp_string};
use crate::model::{Priority, Requirement, RequirementStatus, Resource, Skill, SkillLevel, SkillType};

const SYNTHETIC_LIMIT: usize = 5;
const NOT_SPECIFIED: &str = "Not specified";

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Build placeholder requirements from common primary skills when no
    /// consideration names a requirement.
    pub synthesize_fallback: bool,
}

/// One requirement per distinct consideration `requirementId`, in first-seen
/// order. The first consideration seen for an id supplies its fields.
pub fn derive_requirements(
    resources: &[Resource],
    options: DeriveOptions,
    now: DateTime<Utc>,
) -> Vec<Requirement> {
    let mut seen = HashSet::new();
    let mut requirements = Vec::new();

    for resource in resources {
        for consideration in &resource.considerations {
            let Some(id) = consideration.requirement_id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };
            if !seen.insert(id.to_string()) {
                continue;
            }

            let stamp = timestamp_string(now);
            requirements.push(Requirement {
                id: id.to_string(),
                title: consideration
                    .requirement_title
                    .clone()
                    .unwrap_or_else(|| format!("Requirement {id}")),
                description: consideration
                    .requirement_description
                    .clone()
                    .unwrap_or_else(|| "Derived from resource considerations".to_string()),
                required_skills: consideration.required_skills.clone().unwrap_or_default(),
                preferred_skills: consideration.preferred_skills.clone().unwrap_or_default(),
                experience_level: consideration
                    .experience_level
                    .clone()
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                location: consideration
                    .location
                    .clone()
                    .or_else(|| Some(resource.location.clone()).filter(|l| !l.is_empty()))
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                domain: consideration
                    .domain
                    .clone()
                    .unwrap_or_else(|| "General".to_string()),
                start_date: consideration
                    .start_date
                    .clone()
                    .unwrap_or_else(|| day_string(now)),
                end_date: None,
                status: consideration.status.unwrap_or_default(),
                priority: consideration.priority.unwrap_or_default(),
                created_by: consideration
                    .created_by
                    .clone()
                    .unwrap_or_else(|| "System".to_string()),
                created_at: consideration.created_at.clone().unwrap_or_else(|| stamp.clone()),
                updated_at: consideration.updated_at.clone().unwrap_or(stamp),
                budget: None,
            });
        }
    }

    if requirements.is_empty() && options.synthesize_fallback {
        return synthesize_from_skills(resources, now);
    }

    requirements
}

/// Primary skill names with their resource counts, most common first. Ties
/// keep first-seen order.
pub fn primary_skill_counts(resources: &[Resource]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for skill in resources.iter().flat_map(Resource::primary_skills) {
        match index.get(skill.name.as_str()) {
            Some(&at) => counts[at].1 += 1,
            None => {
                index.insert(&skill.name, counts.len());
                counts.push((skill.name.clone(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn synthesize_from_skills(resources: &[Resource], now: DateTime<Utc>) -> Vec<Requirement> {
    let stamp = timestamp_string(now);

    primary_skill_counts(resources)
        .into_iter()
        .take(SYNTHETIC_LIMIT)
        .map(|(skill, count)| Requirement {
            id: format!("req-{}", slug(&skill)),
            title: format!("Senior {skill} Developer"),
            description: format!(
                "Looking for an experienced {skill} developer. {count} available resources with this skill."
            ),
            required_skills: vec![Skill {
                name: skill.clone(),
                level: SkillLevel::Advanced,
                skill_type: SkillType::Primary,
                years_of_experience: None,
            }],
            preferred_skills: Vec::new(),
            experience_level: "5+ years".to_string(),
            location: "Multiple".to_string(),
            domain: "Technology".to_string(),
            start_date: day_string(now),
            end_date: None,
            status: RequirementStatus::Open,
            priority: if count > 3 { Priority::High } else { Priority::Medium },
            created_by: "System".to_string(),
            created_at: stamp.clone(),
            updated_at: stamp.clone(),
            budget: None,
        })
        .collect()
}

fn slug(skill: &str) -> String {
    RE_WHITESPACE
        .replace_all(&skill.to_lowercase(), "-")
        .into_owned()
}

/// Case-insensitive substring search over title, description and domain.
pub fn search_requirements<'a>(requirements: &'a [Requirement], term: &str) -> Vec<&'a Requirement> {
    let needle = term.to_lowercase();
    requirements
        .iter()
        .filter(|req| {
            req.title.to_lowercase().contains(&needle)
                || req.description.to_lowercase().contains(&needle)
                || req.domain.to_lowercase().contains(&needle)
        })
        .collect()
}
