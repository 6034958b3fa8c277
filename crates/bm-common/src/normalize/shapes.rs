//! One serde adapter per known upstream resource layout.
//!
//! Each adapter only knows its own field names; everything funnels through
//! [`ResourceFields`] so defaults are applied in one place.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::lenient;
use super::records::{
    RawBilling, RawCertification, RawConsideration, RawProject, RawSkill, RawSoftBlock,
    normalize_status, skills,
};
use crate::date::timestamp_string;
use crate::model::{BillingHistory, Resource};

const DEFAULT_CURRENCY: &str = "INR";

/// Canonical field set every adapter produces.
#[derive(Debug, Default)]
pub(super) struct ResourceFields {
    pub id: Option<String>,
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub availability_date: Option<String>,
    pub release_date: Option<String>,
    pub total_experience: Option<f64>,
    pub skills: Vec<RawSkill>,
    pub certifications: Vec<RawCertification>,
    pub project_experience: Vec<RawProject>,
    pub billing_history: Option<RawBilling>,
    pub ctc: Option<f64>,
    pub ctc_currency: Option<String>,
    pub soft_blocks: Vec<RawSoftBlock>,
    pub considerations: Vec<RawConsideration>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ResourceFields {
    pub fn into_resource(self, now: DateTime<Utc>) -> Resource {
        let employee_id = self
            .employee_id
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_default();
        let id = self.id.unwrap_or_else(|| employee_id.clone());

        let soft_blocks = self
            .soft_blocks
            .into_iter()
            .map(|block| block.into_soft_block(&employee_id, now))
            .collect();

        Resource {
            id,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            designation: self.designation.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            status: normalize_status(self.status.as_deref()),
            availability_date: self.availability_date,
            release_date: self.release_date,
            total_experience: self.total_experience,
            skills: skills(self.skills),
            certifications: self.certifications.into_iter().map(Into::into).collect(),
            project_experience: self.project_experience.into_iter().map(Into::into).collect(),
            billing_history: self
                .billing_history
                .map(BillingHistory::from)
                .unwrap_or_default(),
            ctc: self.ctc,
            ctc_currency: Some(
                self.ctc_currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            soft_blocks,
            considerations: self.considerations.into_iter().map(Into::into).collect(),
            created_at: self
                .created_at
                .unwrap_or_else(|| timestamp_string(now)),
            updated_at: self
                .updated_at
                .unwrap_or_else(|| timestamp_string(now)),
            employee_id,
        }
    }
}

/// Backend DTO layout, also what this service emits.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CurrentRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    employee_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    designation: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    availability_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    total_experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    skills: Vec<RawSkill>,
    #[serde(default, deserialize_with = "lenient::list")]
    certifications: Vec<RawCertification>,
    #[serde(default, deserialize_with = "lenient::list")]
    project_experience: Vec<RawProject>,
    #[serde(default)]
    billing_history: Option<RawBilling>,
    #[serde(default, deserialize_with = "lenient::number")]
    ctc: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    ctc_currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    soft_blocks: Vec<RawSoftBlock>,
    #[serde(default, deserialize_with = "lenient::list")]
    considerations: Vec<RawConsideration>,
    #[serde(default, deserialize_with = "lenient::text")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    updated_at: Option<String>,
}

impl From<CurrentRecord> for ResourceFields {
    fn from(r: CurrentRecord) -> Self {
        ResourceFields {
            id: r.id,
            employee_id: r.employee_id,
            name: r.name,
            email: r.email,
            designation: r.designation,
            location: r.location,
            status: r.status,
            availability_date: r.availability_date,
            release_date: r.release_date,
            total_experience: r.total_experience,
            skills: r.skills,
            certifications: r.certifications,
            project_experience: r.project_experience,
            billing_history: r.billing_history,
            ctc: r.ctc,
            ctc_currency: r.ctc_currency,
            soft_blocks: r.soft_blocks,
            considerations: r.considerations,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Older HR export layout (`fullName`, `empId`, `skillSet`, `blocks`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LegacyHrRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    emp_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    employee_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    email_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    available_from: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    released_date: Option<String>,
    /// Years as a number, or a project list in some exports.
    #[serde(default)]
    experience: Option<Value>,
    #[serde(default, deserialize_with = "lenient::list")]
    skill_set: Vec<RawSkill>,
    #[serde(default, deserialize_with = "lenient::list")]
    certificate: Vec<RawCertification>,
    #[serde(default, deserialize_with = "lenient::optional_list")]
    projects: Option<Vec<RawProject>>,
    #[serde(default, deserialize_with = "lenient::number")]
    salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    blocks: Vec<RawSoftBlock>,
    #[serde(default, deserialize_with = "lenient::list")]
    consideration: Vec<RawConsideration>,
    #[serde(default, deserialize_with = "lenient::text")]
    created_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    updated_date: Option<String>,
}

impl From<LegacyHrRecord> for ResourceFields {
    fn from(r: LegacyHrRecord) -> Self {
        let (total_experience, experience_projects): (Option<f64>, Vec<RawProject>) =
            match r.experience {
                Some(Value::Array(items)) => (
                    None,
                    items
                        .into_iter()
                        .filter_map(|item| serde_json::from_value(item).ok())
                        .collect(),
                ),
                Some(Value::Number(years)) => (years.as_f64(), Vec::new()),
                Some(Value::String(years)) => (years.trim().parse().ok(), Vec::new()),
                _ => (None, Vec::new()),
            };

        ResourceFields {
            id: r.id,
            employee_id: r.emp_id,
            name: r.full_name.or(r.employee_name),
            email: r.email_address,
            designation: r.role.or(r.title),
            location: r.city,
            status: r.status,
            availability_date: r.available_from,
            release_date: r.released_date,
            total_experience,
            skills: r.skill_set,
            certifications: r.certificate,
            project_experience: r.projects.unwrap_or(experience_projects),
            billing_history: None,
            ctc: r.salary,
            ctc_currency: r.currency,
            soft_blocks: r.blocks,
            considerations: r.consideration,
            created_at: r.created_date,
            updated_at: r.updated_date,
        }
    }
}

/// Employee directory layout (`resourceName`, `employeeCode`,
/// `technicalSkills`, `blockedDates`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DirectoryRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    employee_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    resource_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    email_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    position: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    base_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    office_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    availability: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    available_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    release_from: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    years_of_experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    technical_skills: Vec<RawSkill>,
    #[serde(default, deserialize_with = "lenient::list")]
    certs: Vec<RawCertification>,
    #[serde(default, deserialize_with = "lenient::number")]
    compensation: Option<f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    blocked_dates: Vec<RawSoftBlock>,
    #[serde(default, deserialize_with = "lenient::list")]
    matches: Vec<RawConsideration>,
    #[serde(default, deserialize_with = "lenient::text")]
    created: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    updated: Option<String>,
}

impl From<DirectoryRecord> for ResourceFields {
    fn from(r: DirectoryRecord) -> Self {
        ResourceFields {
            id: r.id,
            employee_id: r.employee_code,
            name: r.resource_name,
            email: r.email_id,
            designation: r.position,
            location: r.base_location.or(r.office_location),
            status: r.status,
            availability_date: r.availability.or(r.available_date),
            release_date: r.release_from,
            total_experience: r.years_of_experience,
            skills: r.technical_skills,
            certifications: r.certs,
            project_experience: Vec::new(),
            billing_history: None,
            ctc: r.compensation,
            ctc_currency: None,
            soft_blocks: r.blocked_dates,
            considerations: r.matches,
            created_at: r.created,
            updated_at: r.updated,
        }
    }
}
