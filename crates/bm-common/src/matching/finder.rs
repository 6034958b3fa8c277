use tracing::debug;

use super::{
    prefilter::is_eligible,
    scoring::{AvailabilityGap, availability_gap_days, calculate_match_score},
    skills::skill_overlap,
    weights::{GROSS_MARGIN_SHARE, MIN_RECOMMENDED_SCORE},
};
use crate::model::{MatchRecommendation, Requirement, Resource, ResourceStatus};

const REASON_SKILL_PREVIEW: usize = 3;
const FALLBACK_REASON: &str = "Potential match based on profile";

/// Score every eligible resource against every requirement and keep the
/// pairs at or above the recommendation threshold, best first.
///
/// Ties keep encounter order (resource-major, then requirement).
pub fn find_matches(resources: &[Resource], requirements: &[Requirement]) -> Vec<MatchRecommendation> {
    let mut matches = Vec::new();
    let mut skipped = 0usize;

    for resource in resources {
        if !is_eligible(resource) {
            skipped += 1;
            continue;
        }

        for requirement in requirements {
            let score = calculate_match_score(resource, requirement);
            if score >= MIN_RECOMMENDED_SCORE {
                matches.push(build_recommendation(resource, requirement, score));
            }
        }
    }

    // Vec::sort_by is stable.
    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    debug!(
        resources = resources.len(),
        requirements = requirements.len(),
        skipped,
        recommended = matches.len(),
        "match pass complete"
    );

    matches
}

fn build_recommendation(
    resource: &Resource,
    requirement: &Requirement,
    match_score: u8,
) -> MatchRecommendation {
    let overlap = skill_overlap(&resource.skills, &requirement.required_skills);

    let recommended_upskilling = overlap
        .gaps
        .iter()
        .map(|gap| format!("Training on {gap}"))
        .collect();

    let reasons = explain(resource, requirement, &overlap.matched);

    MatchRecommendation {
        resource: resource.clone(),
        requirement: requirement.clone(),
        match_score,
        skill_matches: overlap.matched,
        skill_gaps: overlap.gaps,
        recommended_upskilling,
        gross_margin: gross_margin(resource),
        reasons,
    }
}

fn explain(resource: &Resource, requirement: &Requirement, matched: &[String]) -> Vec<String> {
    let mut reasons = Vec::new();

    if !matched.is_empty() {
        let preview = matched
            .iter()
            .take(REASON_SKILL_PREVIEW)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        reasons.push(format!(
            "Strong match on {} required skill(s): {preview}",
            matched.len()
        ));
    }

    // Exact, case-sensitive comparison; the score itself is case-insensitive.
    if resource.location == requirement.location {
        reasons.push("Location match".to_string());
    }

    if resource.status == ResourceStatus::Atp {
        reasons.push("Resource is available (ATP)".to_string());
    }

    match availability_gap_days(resource, requirement) {
        AvailabilityGap::Immediate => reasons.push("Immediate availability".to_string()),
        AvailabilityGap::BeforeStart => {
            reasons.push("Available before requirement start date".to_string())
        }
        AvailabilityGap::DaysLate(_) | AvailabilityGap::Unknown => {}
    }

    if !resource.project_experience.is_empty() {
        reasons.push(format!(
            "{} project(s) of relevant experience",
            resource.project_experience.len()
        ));
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    reasons
}

/// Estimated gross margin percentage from the billing rate.
///
/// The rate cancels out, so any usable rate yields 40. Kept as-is to stay
/// consistent with figures already reported from this formula.
fn gross_margin(resource: &Resource) -> Option<i64> {
    let rate = resource
        .billing_history
        .rate
        .filter(|rate| *rate != 0.0 && rate.is_finite())?;

    Some((rate * GROSS_MARGIN_SHARE / rate * 100.0).round() as i64)
}

/// Optional narrowing of a match list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub requirement_id: Option<String>,
    pub location: Option<String>,
}

impl MatchFilter {
    pub fn apply(&self, matches: Vec<MatchRecommendation>) -> Vec<MatchRecommendation> {
        matches
            .into_iter()
            .filter(|m| {
                self.requirement_id
                    .as_deref()
                    .is_none_or(|id| m.requirement.id == id)
            })
            .filter(|m| {
                self.location
                    .as_deref()
                    .is_none_or(|location| m.resource.location == location)
            })
            .collect()
    }
}
