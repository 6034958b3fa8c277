use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::date::{ceil_days, parse_loose, timestamp_string};
use crate::model::{InterviewStatus, Resource};

/// An interview recorded on a resource consideration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub resource_name: String,
    pub resource_id: String,
    pub requirement_title: String,
    pub requirement_id: String,
    pub interview_date: String,
    pub interview_status: InterviewStatus,
    pub match_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewer: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStats {
    pub total: usize,
    pub scheduled: usize,
    pub pending_feedback: usize,
    pub selected: usize,
}

impl InterviewStats {
    pub fn from_interviews(interviews: &[Interview]) -> Self {
        let count = |status| {
            interviews
                .iter()
                .filter(|i| i.interview_status == status)
                .count()
        };

        Self {
            total: interviews.len(),
            scheduled: count(InterviewStatus::Scheduled),
            pending_feedback: count(InterviewStatus::PendingFeedback),
            selected: count(InterviewStatus::Selected),
        }
    }
}

/// Every consideration carrying an interview status, in resource order.
pub fn derive_interviews(resources: &[Resource], now: DateTime<Utc>) -> Vec<Interview> {
    resources
        .iter()
        .flat_map(|resource| {
            resource
                .considerations
                .iter()
                .enumerate()
                .filter_map(move |(index, consideration)| {
                    let status = consideration.interview_status?;
                    let requirement_id = consideration
                        .requirement_id
                        .clone()
                        .unwrap_or_else(|| "unknown".to_string());
                    let local_id = consideration
                        .id
                        .clone()
                        .unwrap_or_else(|| index.to_string());

                    Some(Interview {
                        id: format!("{}-{local_id}", resource.id),
                        resource_name: resource.name.clone(),
                        resource_id: resource.display_id().to_string(),
                        requirement_title: consideration
                            .requirement_title
                            .clone()
                            .unwrap_or_else(|| format!("Requirement {requirement_id}")),
                        requirement_id,
                        interview_date: consideration
                            .interview_date
                            .clone()
                            .or_else(|| consideration.created_at.clone())
                            .unwrap_or_else(|| timestamp_string(now)),
                        interview_status: status,
                        match_score: consideration.match_score.unwrap_or(0.0),
                        feedback: consideration.feedback.clone(),
                        interviewer: consideration.interviewer.clone(),
                    })
                })
        })
        .collect()
}

/// `None` keeps everything.
pub fn filter_by_status(interviews: Vec<Interview>, status: Option<InterviewStatus>) -> Vec<Interview> {
    match status {
        None => interviews,
        Some(status) => interviews
            .into_iter()
            .filter(|i| i.interview_status == status)
            .collect(),
    }
}

/// Days until a scheduled interview that is still ahead, rounded up.
pub fn days_until(interview: &Interview, now: DateTime<Utc>) -> Option<i64> {
    if interview.interview_status != InterviewStatus::Scheduled {
        return None;
    }

    let at = parse_loose(&interview.interview_date)?;
    (at > now).then(|| ceil_days(now, at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Consideration;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn resource(considerations: Vec<Consideration>) -> Resource {
        Resource {
            id: "42".into(),
            employee_id: "XI-42".into(),
            name: "Meera".into(),
            considerations,
            ..Resource::default()
        }
    }

    fn with_status(status: InterviewStatus) -> Consideration {
        Consideration {
            interview_status: Some(status),
            ..Consideration::default()
        }
    }

    #[test]
    fn derives_only_considerations_with_status() {
        let resources = vec![resource(vec![
            Consideration {
                id: Some("c-1".into()),
                requirement_id: Some("REQ-5".into()),
                requirement_title: Some("Cloud Architect".into()),
                interview_status: Some(InterviewStatus::Scheduled),
                interview_date: Some("2025-06-12T10:00:00Z".into()),
                match_score: Some(82.0),
                interviewer: Some("Ravi".into()),
                ..Consideration::default()
            },
            Consideration::default(),
            with_status(InterviewStatus::Selected),
        ])];

        let interviews = derive_interviews(&resources, now());
        assert_eq!(interviews.len(), 2);

        let first = &interviews[0];
        assert_eq!(first.id, "42-c-1");
        assert_eq!(first.resource_id, "XI-42");
        assert_eq!(first.requirement_title, "Cloud Architect");
        assert_eq!(first.match_score, 82.0);

        let second = &interviews[1];
        assert_eq!(second.id, "42-2");
        assert_eq!(second.requirement_id, "unknown");
        assert_eq!(second.requirement_title, "Requirement unknown");
        assert_eq!(second.interview_date, "2025-06-10T12:00:00.000Z");
        assert_eq!(second.match_score, 0.0);
    }

    #[test]
    fn date_falls_back_to_created_at() {
        let resources = vec![resource(vec![Consideration {
            interview_status: Some(InterviewStatus::Pending),
            created_at: Some("2025-06-01".into()),
            ..Consideration::default()
        }])];
        assert_eq!(derive_interviews(&resources, now())[0].interview_date, "2025-06-01");
    }

    #[test]
    fn stats_and_filter() {
        let resources = vec![resource(vec![
            with_status(InterviewStatus::Scheduled),
            with_status(InterviewStatus::Scheduled),
            with_status(InterviewStatus::PendingFeedback),
            with_status(InterviewStatus::Rejected),
        ])];
        let interviews = derive_interviews(&resources, now());

        let stats = InterviewStats::from_interviews(&interviews);
        assert_eq!(
            stats,
            InterviewStats {
                total: 4,
                scheduled: 2,
                pending_feedback: 1,
                selected: 0,
            }
        );

        assert_eq!(filter_by_status(interviews.clone(), None).len(), 4);
        let rejected = filter_by_status(interviews, Some(InterviewStatus::Rejected));
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn days_until_only_for_future_scheduled() {
        let mut interview = derive_interviews(
            &[resource(vec![Consideration {
                interview_status: Some(InterviewStatus::Scheduled),
                interview_date: Some("2025-06-12T13:00:00Z".into()),
                ..Consideration::default()
            }])],
            now(),
        )
        .remove(0);

        assert_eq!(days_until(&interview, now()), Some(3));

        interview.interview_date = "2025-06-01".into();
        assert_eq!(days_until(&interview, now()), None);

        interview.interview_date = "2025-06-20".into();
        interview.interview_status = InterviewStatus::Selected;
        assert_eq!(days_until(&interview, now()), None);
    }
}
