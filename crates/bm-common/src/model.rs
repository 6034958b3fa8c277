use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Lifecycle status of a bench resource.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ResourceStatus {
    /// Available to position.
    #[default]
    #[serde(rename = "ATP")]
    #[strum(serialize = "ATP")]
    Atp,
    #[serde(rename = "deployed")]
    #[strum(serialize = "deployed")]
    Deployed,
    #[serde(rename = "soft-blocked")]
    #[strum(to_string = "soft-blocked", serialize = "soft_blocked")]
    SoftBlocked,
    #[serde(rename = "notice")]
    #[strum(serialize = "notice")]
    Notice,
    #[serde(rename = "leave")]
    #[strum(serialize = "leave")]
    Leave,
    #[serde(rename = "trainee")]
    #[strum(serialize = "trainee")]
    Trainee,
    #[serde(rename = "interview-scheduled")]
    #[strum(to_string = "interview-scheduled", serialize = "interview_scheduled")]
    InterviewScheduled,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SkillType {
    #[default]
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default, rename = "type")]
    pub skill_type: SkillType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<f64>,
}

impl Skill {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectExperience {
    pub project_name: String,
    pub domain: String,
    pub role: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingHistory {
    pub billable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_billed_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_billed_hours: Option<f64>,
}

/// Time-boxed reservation of a resource against an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoftBlock {
    pub id: String,
    pub resource_id: String,
    pub reason: String,
    pub start_date: String,
    pub end_date: String,
    pub created_by: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum InterviewStatus {
    Pending,
    Scheduled,
    Selected,
    Rejected,
    PendingFeedback,
}

/// A recorded evaluation of a resource against a requirement.
///
/// Upstream embeds requirement details on considerations since there is no
/// requirement endpoint; those fields are carried verbatim when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Consideration {
    pub id: Option<String>,
    pub resource_id: Option<String>,
    pub requirement_id: Option<String>,
    pub interview_status: Option<InterviewStatus>,
    pub interview_date: Option<String>,
    pub feedback: Option<String>,
    pub interviewer: Option<String>,
    pub match_score: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,

    pub requirement_title: Option<String>,
    pub requirement_description: Option<String>,
    pub required_skills: Option<Vec<Skill>>,
    pub preferred_skills: Option<Vec<Skill>>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub domain: Option<String>,
    pub start_date: Option<String>,
    pub status: Option<RequirementStatus>,
    pub priority: Option<Priority>,
    pub created_by: Option<String>,
}

/// A person available for staffing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub designation: String,
    /// Empty when upstream has no location.
    pub location: String,
    pub status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_experience: Option<f64>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub project_experience: Vec<ProjectExperience>,
    #[serde(default)]
    pub billing_history: BillingHistory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctc_currency: Option<String>,
    #[serde(default)]
    pub soft_blocks: Vec<SoftBlock>,
    #[serde(default)]
    pub considerations: Vec<Consideration>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource {
    /// Identifier used for links and soft-block calls.
    pub fn display_id(&self) -> &str {
        if self.employee_id.is_empty() {
            &self.id
        } else {
            &self.employee_id
        }
    }

    pub fn primary_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills
            .iter()
            .filter(|skill| skill.skill_type == SkillType::Primary)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RequirementStatus {
    #[default]
    Open,
    Filled,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// An open staffing need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<Skill>,
    #[serde(default)]
    pub preferred_skills: Vec<Skill>,
    pub experience_level: String,
    /// Empty when no location is known.
    pub location: String,
    pub domain: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub status: RequirementStatus,
    pub priority: Priority,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

/// Output of scoring one resource against one requirement. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecommendation {
    pub resource: Resource,
    pub requirement: Requirement,
    pub match_score: u8,
    pub skill_gaps: Vec<String>,
    pub skill_matches: Vec<String>,
    pub recommended_upskilling: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_margin: Option<i64>,
    pub reasons: Vec<String>,
}
