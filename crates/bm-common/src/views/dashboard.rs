use chrono::{DateTime, Utc};
use serde::Serialize;

use super::directory::ResourceStatistics;
use crate::date::{day_string, parse_loose};
use crate::model::{Resource, ResourceStatus};

const RECENT_RESOURCES: usize = 5;
const MAX_ACTIVITIES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: ResourceStatus,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Deployment,
    Softblock,
    Atp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub action: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub statistics: ResourceStatistics,
    pub utilization_rate: u32,
    pub atp_percentage: u32,
    pub status_distribution: Vec<StatusSlice>,
    pub recent_activity: Vec<Activity>,
}

fn status_label(status: ResourceStatus) -> &'static str {
    match status {
        ResourceStatus::Atp => "ATP",
        ResourceStatus::Deployed => "Deployed",
        ResourceStatus::SoftBlocked => "Soft Blocked",
        ResourceStatus::Notice => "Notice",
        ResourceStatus::Leave => "Leave",
        ResourceStatus::Trainee => "Trainee",
        ResourceStatus::InterviewScheduled => "Interview Scheduled",
    }
}

/// `part` as a rounded percentage of `total`; zero when there is no total.
pub fn percentage(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Status counts in first-seen order.
pub fn status_distribution(resources: &[Resource]) -> Vec<StatusSlice> {
    let mut slices: Vec<StatusSlice> = Vec::new();
    for resource in resources {
        match slices.iter_mut().find(|s| s.status == resource.status) {
            Some(slice) => slice.count += 1,
            None => slices.push(StatusSlice {
                status: resource.status,
                label: status_label(resource.status),
                count: 1,
            }),
        }
    }
    slices
}

/// `N hour(s) ago` below a day, `N day(s) ago` after.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours().max(0);
    let (value, unit) = if hours < 24 { (hours, "hour") } else { (hours / 24, "day") };
    let plural = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{plural} ago")
}

/// Activity for the most recently updated resources. Resources without a
/// readable `updatedAt` are not ranked.
pub fn recent_activity(resources: &[Resource], now: DateTime<Utc>) -> Vec<Activity> {
    let mut ranked: Vec<(DateTime<Utc>, &Resource)> = resources
        .iter()
        .filter_map(|r| parse_loose(&r.updated_at).map(|at| (at, r)))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    ranked
        .into_iter()
        .take(RECENT_RESOURCES)
        .filter(|(_, r)| !r.name.is_empty())
        .filter_map(|(updated, resource)| activity_for(resource, relative_time(updated, now)))
        .take(MAX_ACTIVITIES)
        .collect()
}

fn activity_for(resource: &Resource, time: String) -> Option<Activity> {
    let profile_link = format!("/resource/{}", resource.display_id());

    if resource.status == ResourceStatus::Deployed {
        return Some(Activity {
            action: format!("{} deployed", resource.name),
            time,
            kind: ActivityKind::Deployment,
            link: profile_link,
        });
    }

    if let Some(latest) = resource.soft_blocks.last() {
        if latest.end_date.is_empty() {
            return None;
        }
        let until = parse_loose(&latest.end_date)
            .map(day_string)
            .unwrap_or_else(|| latest.end_date.clone());
        return Some(Activity {
            action: format!("{} soft blocked until {until}", resource.name),
            time,
            kind: ActivityKind::Softblock,
            link: "/soft-blocks".to_string(),
        });
    }

    (resource.status == ResourceStatus::Atp).then(|| Activity {
        action: format!("{} available (ATP)", resource.name),
        time,
        kind: ActivityKind::Atp,
        link: profile_link,
    })
}

/// Dashboard figures. `upstream` statistics take precedence where non-zero.
pub fn dashboard_summary(
    resources: &[Resource],
    upstream: Option<&ResourceStatistics>,
    now: DateTime<Utc>,
) -> DashboardSummary {
    let local = ResourceStatistics::from_resources(resources);
    let statistics = match upstream {
        Some(remote) => local.merge_upstream(remote),
        None => local,
    };

    DashboardSummary {
        utilization_rate: percentage(statistics.deployed, statistics.total),
        atp_percentage: percentage(statistics.atp, statistics.total),
        status_distribution: status_distribution(resources),
        recent_activity: recent_activity(resources, now),
        statistics,
    }
}
