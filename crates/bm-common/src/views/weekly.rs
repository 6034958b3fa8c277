use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::date::{one_week, parse_loose};
use crate::matching::find_matches;
use crate::model::{MatchRecommendation, Requirement, Resource, ResourceStatus};

const TOP_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAtpSummary {
    pub week: String,
    #[serde(rename = "totalATP")]
    pub total_atp: usize,
    #[serde(rename = "newATP")]
    pub new_atp: usize,
    pub deployed: usize,
    pub soft_blocked: usize,
    pub by_skill: BTreeMap<String, usize>,
    pub by_location: BTreeMap<String, usize>,
    pub top_recommendations: Vec<MatchRecommendation>,
}

/// End of the seven-day window: the end of `reference` when it lies in the
/// past, otherwise `now`.
fn window_end(reference: Option<NaiveDate>, now: DateTime<Utc>) -> DateTime<Utc> {
    reference
        .and_then(|day| day.succ_opt())
        .and_then(|next| next.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .filter(|end| *end < now)
        .unwrap_or(now)
}

fn within(raw: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    parse_loose(raw).is_some_and(|at| at >= start && at <= end)
}

pub fn weekly_atp_summary(
    resources: &[Resource],
    requirements: &[Requirement],
    reference: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> WeeklyAtpSummary {
    let end = window_end(reference, now);
    let start = end - one_week();

    let atp: Vec<&Resource> = resources
        .iter()
        .filter(|r| r.status == ResourceStatus::Atp)
        .collect();

    let new_atp = atp
        .iter()
        .filter(|r| within(&r.created_at, start, end))
        .count();
    let deployed = resources
        .iter()
        .filter(|r| r.status == ResourceStatus::Deployed && within(&r.updated_at, start, end))
        .count();
    let soft_blocked = resources
        .iter()
        .filter(|r| r.status == ResourceStatus::SoftBlocked)
        .count();

    let mut by_skill = BTreeMap::new();
    let mut by_location = BTreeMap::new();
    for resource in &atp {
        for skill in resource.primary_skills().filter(|s| !s.name.is_empty()) {
            *by_skill.entry(skill.name.clone()).or_insert(0) += 1;
        }
        if !resource.location.is_empty() {
            *by_location.entry(resource.location.clone()).or_insert(0) += 1;
        }
    }

    let mut top_recommendations = find_matches(resources, requirements);
    top_recommendations.truncate(TOP_RECOMMENDATIONS);

    WeeklyAtpSummary {
        week: reference
            .unwrap_or_else(|| now.date_naive())
            .format("%Y-%m-%d")
            .to_string(),
        total_atp: atp.len(),
        new_atp,
        deployed,
        soft_blocked,
        by_skill,
        by_location,
        top_recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Skill, SkillType};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, 9, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days)).to_rfc3339()
    }

    fn resource(id: &str, status: ResourceStatus, location: &str, skills: &[&str]) -> Resource {
        Resource {
            id: id.into(),
            name: id.into(),
            status,
            location: location.into(),
            skills: skills.iter().map(|s| Skill::named(*s)).collect(),
            created_at: days_ago(60),
            updated_at: days_ago(60),
            ..Resource::default()
        }
    }

    fn bench() -> Vec<Resource> {
        let mut fresh = resource("fresh", ResourceStatus::Atp, "Pune", &["React", "AWS"]);
        fresh.created_at = days_ago(2);
        fresh.skills[1].skill_type = SkillType::Secondary;

        let mut rolled_off = resource("rolled", ResourceStatus::Deployed, "Pune", &["Java"]);
        rolled_off.updated_at = days_ago(3);

        vec![
            fresh,
            resource("steady", ResourceStatus::Atp, "Delhi", &["React"]),
            resource("idle", ResourceStatus::Atp, "", &["Go"]),
            rolled_off,
            resource("old-deploy", ResourceStatus::Deployed, "Pune", &["Java"]),
            resource("held", ResourceStatus::SoftBlocked, "Pune", &["React"]),
        ]
    }

    #[test]
    fn counts_current_week() {
        let summary = weekly_atp_summary(&bench(), &[], None, now());
        assert_eq!(summary.week, "2025-10-06");
        assert_eq!(summary.total_atp, 3);
        assert_eq!(summary.new_atp, 1);
        assert_eq!(summary.deployed, 1);
        assert_eq!(summary.soft_blocked, 1);
        assert_eq!(summary.by_skill.get("React"), Some(&2));
        assert_eq!(summary.by_skill.get("AWS"), None);
        assert_eq!(summary.by_skill.get("Go"), Some(&1));
        assert_eq!(summary.by_location.get("Pune"), Some(&1));
        assert_eq!(summary.by_location.get("Delhi"), Some(&1));
        assert!(!summary.by_location.contains_key(""));
        assert!(summary.top_recommendations.is_empty());
    }

    #[test]
    fn past_week_moves_the_window() {
        let reference = NaiveDate::from_ymd_opt(2025, 9, 30);
        let summary = weekly_atp_summary(&bench(), &[], reference, now());
        assert_eq!(summary.week, "2025-09-30");
        // The window closes at 2025-10-01T00:00Z, before "fresh" was created.
        assert_eq!(summary.new_atp, 0);
        assert_eq!(summary.deployed, 0);
    }

    #[test]
    fn keeps_top_five_recommendations() {
        let resources: Vec<Resource> = (0..7)
            .map(|i| resource(&format!("r{i}"), ResourceStatus::Atp, "Pune", &["React"]))
            .collect();
        let requirement = Requirement {
            id: "q".into(),
            location: "Pune".into(),
            start_date: "2025-10-10".into(),
            required_skills: vec![Skill::named("React")],
            ..Requirement::default()
        };

        let summary = weekly_atp_summary(&resources, &[requirement], None, now());
        assert_eq!(summary.top_recommendations.len(), 5);
        assert_eq!(summary.top_recommendations[0].resource.id, "r0");
    }

    #[test]
    fn serializes_with_report_field_names() {
        let summary = weekly_atp_summary(&bench(), &[], None, now());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalATP"], 3);
        assert_eq!(json["newATP"], 1);
        assert_eq!(json["softBlocked"], 1);
        assert!(json["bySkill"].is_object());
    }
}
