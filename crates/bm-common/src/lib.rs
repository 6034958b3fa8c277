pub mod client;
pub mod date;
pub mod logging;
pub mod matching;
pub mod model;
pub mod normalize;
pub mod views;

pub use model::{
    BillingHistory, Certification, Consideration, InterviewStatus, MatchRecommendation, Priority,
    ProjectExperience, Requirement, RequirementStatus, Resource, ResourceStatus, Skill, SkillLevel,
    SkillType, SoftBlock,
};
