//! Lenient forms of the nested records found inside a resource payload.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lenient;
use crate::date::{day_string, timestamp_string};
use crate::model::{
    BillingHistory, Certification, Consideration, InterviewStatus, Priority, ProjectExperience,
    RequirementStatus, ResourceStatus, Skill, SkillLevel, SkillType, SoftBlock,
};

/// Map an upstream status label to a [`ResourceStatus`]. Missing or
/// unrecognized labels mean ATP.
pub fn normalize_status(raw: Option<&str>) -> ResourceStatus {
    raw.and_then(|label| ResourceStatus::from_str(label.trim()).ok())
        .unwrap_or_default()
}

/// Interview status labels are accepted with `_` or `-` separators.
pub fn normalize_interview_status(raw: Option<&str>) -> Option<InterviewStatus> {
    let label = raw?.trim().replace('_', "-");
    InterviewStatus::from_str(&label).ok()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSkill {
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    level: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::text")]
    skill_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    years_of_experience: Option<f64>,
}

impl From<RawSkill> for Skill {
    fn from(raw: RawSkill) -> Self {
        Skill {
            name: raw.name.unwrap_or_default(),
            level: raw
                .level
                .and_then(|level| SkillLevel::from_str(&level.to_lowercase()).ok())
                .unwrap_or_default(),
            skill_type: raw
                .skill_type
                .and_then(|kind| SkillType::from_str(&kind.to_lowercase()).ok())
                .unwrap_or_default(),
            years_of_experience: raw.years_of_experience,
        }
    }
}

/// Entries without a usable name are dropped.
pub fn skills(raw: Vec<RawSkill>) -> Vec<Skill> {
    raw.into_iter()
        .filter(|skill| skill.name.as_deref().is_some_and(|name| !name.trim().is_empty()))
        .map(Skill::from)
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCertification {
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    issuer: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    issue_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    expiry_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    credential_id: Option<String>,
}

impl From<RawCertification> for Certification {
    fn from(raw: RawCertification) -> Self {
        Certification {
            name: raw.name.unwrap_or_default(),
            issuer: raw.issuer.unwrap_or_default(),
            issue_date: raw.issue_date.unwrap_or_default(),
            expiry_date: raw.expiry_date,
            credential_id: raw.credential_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    #[serde(default, deserialize_with = "lenient::text")]
    project_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    domain: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    technologies: Vec<String>,
}

impl From<RawProject> for ProjectExperience {
    fn from(raw: RawProject) -> Self {
        ProjectExperience {
            project_name: raw.project_name.unwrap_or_default(),
            domain: raw.domain.unwrap_or_default(),
            role: raw.role.unwrap_or_default(),
            start_date: raw.start_date.unwrap_or_default(),
            end_date: raw.end_date,
            technologies: raw.technologies,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBilling {
    #[serde(default, deserialize_with = "lenient::flag")]
    billable: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    last_billed_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    total_billed_hours: Option<f64>,
}

impl From<RawBilling> for BillingHistory {
    fn from(raw: RawBilling) -> Self {
        BillingHistory {
            billable: raw.billable,
            rate: raw.rate,
            currency: raw.currency,
            last_billed_date: raw.last_billed_date,
            total_billed_hours: raw.total_billed_hours,
        }
    }
}

/// A soft block either in the backend's account form (`blockedUntil`) or
/// already in application form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSoftBlock {
    #[serde(default, deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    resource_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    created_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    account_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    account_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    blocked_until: Option<String>,
}

impl RawSoftBlock {
    pub fn into_soft_block(self, employee_id: &str, now: DateTime<Utc>) -> SoftBlock {
        let Some(blocked_until) = self.blocked_until else {
            return SoftBlock {
                id: self.id.unwrap_or_default(),
                resource_id: self.resource_id.unwrap_or_default(),
                reason: self.reason.unwrap_or_default(),
                start_date: self.start_date.unwrap_or_default(),
                end_date: self.end_date.unwrap_or_default(),
                created_by: self.created_by.unwrap_or_default(),
                created_at: self.created_at.unwrap_or_default(),
                account_id: self.account_id,
                account_name: self.account_name,
            };
        };

        let id = self.id.unwrap_or_else(|| {
            let account = self.account_id.as_deref().unwrap_or("block");
            format!("{employee_id}-{account}-{blocked_until}")
        });

        SoftBlock {
            id,
            resource_id: self.resource_id.unwrap_or_else(|| employee_id.to_string()),
            reason: self
                .account_name
                .clone()
                .or(self.reason)
                .unwrap_or_else(|| "Soft Block".to_string()),
            start_date: self.start_date.unwrap_or_else(|| day_string(now)),
            end_date: blocked_until,
            created_by: self.created_by.unwrap_or_else(|| "System".to_string()),
            created_at: self.created_at.unwrap_or_else(|| timestamp_string(now)),
            account_id: self.account_id,
            account_name: self.account_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConsideration {
    #[serde(default, deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    resource_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    requirement_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    interview_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    interview_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    interviewer: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    match_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    updated_at: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    requirement_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    requirement_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_list")]
    required_skills: Option<Vec<RawSkill>>,
    #[serde(default, deserialize_with = "lenient::optional_list")]
    preferred_skills: Option<Vec<RawSkill>>,
    #[serde(default, deserialize_with = "lenient::text")]
    experience_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    domain: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    priority: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    created_by: Option<String>,
}

impl From<RawConsideration> for Consideration {
    fn from(raw: RawConsideration) -> Self {
        Consideration {
            id: raw.id,
            resource_id: raw.resource_id,
            requirement_id: raw.requirement_id,
            interview_status: normalize_interview_status(raw.interview_status.as_deref()),
            interview_date: raw.interview_date,
            feedback: raw.feedback,
            interviewer: raw.interviewer,
            match_score: raw.match_score,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            requirement_title: raw.requirement_title,
            requirement_description: raw.requirement_description,
            required_skills: raw.required_skills.map(skills),
            preferred_skills: raw.preferred_skills.map(skills),
            experience_level: raw.experience_level,
            location: raw.location,
            domain: raw.domain,
            start_date: raw.start_date,
            status: raw
                .status
                .and_then(|status| RequirementStatus::from_str(&status).ok()),
            priority: raw
                .priority
                .and_then(|priority| Priority::from_str(&priority).ok()),
            created_by: raw.created_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn status_labels_map_case_insensitively() {
        assert_eq!(normalize_status(Some("DEPLOYED")), ResourceStatus::Deployed);
        assert_eq!(normalize_status(Some("soft_blocked")), ResourceStatus::SoftBlocked);
        assert_eq!(
            normalize_status(Some("INTERVIEW_SCHEDULED")),
            ResourceStatus::InterviewScheduled
        );
        assert_eq!(normalize_status(Some("Notice")), ResourceStatus::Notice);
        assert_eq!(normalize_status(Some("BENCHED")), ResourceStatus::Atp);
        assert_eq!(normalize_status(None), ResourceStatus::Atp);
    }

    #[test]
    fn interview_status_accepts_both_separators() {
        assert_eq!(
            normalize_interview_status(Some("PENDING_FEEDBACK")),
            Some(InterviewStatus::PendingFeedback)
        );
        assert_eq!(
            normalize_interview_status(Some("scheduled")),
            Some(InterviewStatus::Scheduled)
        );
        assert_eq!(normalize_interview_status(Some("on-hold")), None);
    }

    #[test]
    fn skill_defaults_level_and_type() {
        let raw: RawSkill = serde_json::from_value(json!({"name": "Rust"})).unwrap();
        let skill = Skill::from(raw);
        assert_eq!(skill.level, SkillLevel::Intermediate);
        assert_eq!(skill.skill_type, SkillType::Primary);

        let raw: RawSkill = serde_json::from_value(
            json!({"name": "Go", "level": "EXPERT", "type": "SECONDARY", "yearsOfExperience": 4}),
        )
        .unwrap();
        let skill = Skill::from(raw);
        assert_eq!(skill.level, SkillLevel::Expert);
        assert_eq!(skill.skill_type, SkillType::Secondary);
        assert_eq!(skill.years_of_experience, Some(4.0));
    }

    #[test]
    fn account_block_is_converted() {
        let raw: RawSoftBlock = serde_json::from_value(json!({
            "accountId": 7,
            "accountName": "Acme",
            "blockedUntil": "2025-04-01"
        }))
        .unwrap();

        let block = raw.into_soft_block("XI-9", now());
        assert_eq!(block.id, "XI-9-7-2025-04-01");
        assert_eq!(block.resource_id, "XI-9");
        assert_eq!(block.reason, "Acme");
        assert_eq!(block.start_date, "2025-03-01");
        assert_eq!(block.end_date, "2025-04-01");
        assert_eq!(block.created_by, "System");
        assert_eq!(block.created_at, "2025-03-01T08:00:00.000Z");
        assert_eq!(block.account_id.as_deref(), Some("7"));
    }

    #[test]
    fn account_block_without_account_uses_placeholder() {
        let raw: RawSoftBlock =
            serde_json::from_value(json!({"blockedUntil": "2025-04-01", "reason": "Hold"})).unwrap();
        let block = raw.into_soft_block("XI-9", now());
        assert_eq!(block.id, "XI-9-block-2025-04-01");
        assert_eq!(block.reason, "Hold");
    }

    #[test]
    fn application_block_is_kept() {
        let raw: RawSoftBlock = serde_json::from_value(json!({
            "id": "sb-1",
            "resourceId": "r-1",
            "reason": "Client interview",
            "startDate": "2025-02-01",
            "endDate": "2025-02-20",
            "createdBy": "mgr",
            "createdAt": "2025-02-01T00:00:00Z"
        }))
        .unwrap();
        let block = raw.into_soft_block("XI-9", now());
        assert_eq!(block.id, "sb-1");
        assert_eq!(block.resource_id, "r-1");
        assert_eq!(block.end_date, "2025-02-20");
        assert_eq!(block.created_by, "mgr");
    }

    #[test]
    fn consideration_drops_unknown_interview_status() {
        let raw: RawConsideration = serde_json::from_value(json!({
            "id": 3,
            "requirementId": "REQ-1",
            "interviewStatus": "ghosted",
            "matchScore": "88",
            "requiredSkills": [{"name": "Java"}],
            "priority": "HIGH"
        }))
        .unwrap();
        let consideration = Consideration::from(raw);
        assert_eq!(consideration.id.as_deref(), Some("3"));
        assert_eq!(consideration.interview_status, None);
        assert_eq!(consideration.match_score, Some(88.0));
        assert_eq!(consideration.priority, Some(Priority::High));
        assert_eq!(
            consideration.required_skills.map(|s| s.len()),
            Some(1)
        );
    }
}
