use serde::Serialize;

use super::{
    location::evaluate_location,
    skills::skill_overlap,
    weights::{
        AVAILABILITY_STEPS, DEPLOYED_STATUS_POINTS, LATE_AVAILABILITY_POINTS, MATCH_WEIGHTS,
    },
};
use crate::date::{ceil_days, parse_loose};
use crate::model::{Requirement, Resource, ResourceStatus};

/// Points earned by one factor out of the points it put at stake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorScore {
    pub points: f64,
    pub max_points: f64,
}

impl FactorScore {
    fn new(points: f64, max_points: u32) -> Self {
        Self {
            points,
            max_points: f64::from(max_points),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub skills: FactorScore,
    /// `None` when either side lacks a location.
    pub location: Option<FactorScore>,
    pub availability: FactorScore,
    pub status: FactorScore,
}

impl ScoreBreakdown {
    pub fn evaluate(resource: &Resource, requirement: &Requirement) -> Self {
        Self {
            skills: score_skills(resource, requirement),
            location: score_location(resource, requirement),
            availability: score_availability(resource, requirement),
            status: score_status(resource),
        }
    }

    fn factors(&self) -> impl Iterator<Item = FactorScore> + '_ {
        [Some(self.skills), self.location, Some(self.availability), Some(self.status)]
            .into_iter()
            .flatten()
    }

    /// Points earned, summed over the applicable factors.
    pub fn raw_score(&self) -> f64 {
        self.factors().map(|factor| factor.points).sum()
    }

    /// Points at stake, summed over the applicable factors.
    pub fn applicable_points(&self) -> f64 {
        self.factors().map(|factor| factor.max_points).sum()
    }

    /// Score normalized against the applicable factors only, rounded to 0–100.
    pub fn total(&self) -> u8 {
        let factors = self.applicable_points();
        if factors <= 0.0 {
            return 0;
        }

        let normalized = (self.raw_score() / factors * 100.0).round();
        normalized.clamp(0.0, 100.0) as u8
    }
}

/// Compatibility of one resource with one requirement on a 0–100 scale.
pub fn calculate_match_score(resource: &Resource, requirement: &Requirement) -> u8 {
    ScoreBreakdown::evaluate(resource, requirement).total()
}

fn score_skills(resource: &Resource, requirement: &Requirement) -> FactorScore {
    let overlap = skill_overlap(&resource.skills, &requirement.required_skills);
    FactorScore::new(
        overlap.ratio() * f64::from(MATCH_WEIGHTS.skills),
        MATCH_WEIGHTS.skills,
    )
}

fn score_location(resource: &Resource, requirement: &Requirement) -> Option<FactorScore> {
    evaluate_location(&resource.location, &requirement.location)
        .map(|fit| FactorScore::new(fit.points(), MATCH_WEIGHTS.location))
}

fn score_availability(resource: &Resource, requirement: &Requirement) -> FactorScore {
    let points = match availability_gap_days(resource, requirement) {
        AvailabilityGap::Immediate | AvailabilityGap::BeforeStart => {
            f64::from(MATCH_WEIGHTS.availability)
        }
        AvailabilityGap::DaysLate(days) => AVAILABILITY_STEPS
            .iter()
            .find(|(limit, _)| days <= *limit)
            .map(|(_, points)| *points)
            .unwrap_or(LATE_AVAILABILITY_POINTS),
        AvailabilityGap::Unknown => LATE_AVAILABILITY_POINTS,
    };

    FactorScore::new(points, MATCH_WEIGHTS.availability)
}

fn score_status(resource: &Resource) -> FactorScore {
    let points = match resource.status {
        ResourceStatus::Atp => f64::from(MATCH_WEIGHTS.status),
        ResourceStatus::Deployed => DEPLOYED_STATUS_POINTS,
        _ => 0.0,
    };

    FactorScore::new(points, MATCH_WEIGHTS.status)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AvailabilityGap {
    /// No availability date on the resource.
    Immediate,
    /// Available on or before the requirement start.
    BeforeStart,
    /// Available this many days (rounded up) after the start.
    DaysLate(i64),
    /// A date is present but could not be read.
    Unknown,
}

pub(crate) fn availability_gap_days(resource: &Resource, requirement: &Requirement) -> AvailabilityGap {
    let Some(raw) = resource
        .availability_date
        .as_deref()
        .filter(|raw| !raw.is_empty())
    else {
        return AvailabilityGap::Immediate;
    };

    match (parse_loose(raw), parse_loose(&requirement.start_date)) {
        (Some(available), Some(start)) if available <= start => AvailabilityGap::BeforeStart,
        (Some(available), Some(start)) => AvailabilityGap::DaysLate(ceil_days(start, available)),
        _ => AvailabilityGap::Unknown,
    }
}
