use crate::model::Skill;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillOverlap {
    /// Lowercased required-skill names found on the resource, in requirement order.
    pub matched: Vec<String>,
    /// Lowercased required-skill names the resource lacks, in requirement order.
    pub gaps: Vec<String>,
}

impl SkillOverlap {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.gaps.len()
    }

    /// Share of required skills covered. Zero when nothing is required.
    pub fn ratio(&self) -> f64 {
        let total = self.required_count();
        if total == 0 {
            0.0
        } else {
            self.matched.len() as f64 / total as f64
        }
    }
}

/// Trimmed, lowercased names. Blank names are skipped; an empty string
/// would otherwise be contained in every other name.
pub fn lowercase_names(skills: &[Skill]) -> Vec<String> {
    skills
        .iter()
        .map(|skill| skill.name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Loose name test: either lowercased name contains the other.
///
/// Tolerates naming variants ("react" vs "react.js") at the cost of false
/// positives ("java" vs "javascript").
pub fn loosely_matches(resource_skill: &str, required_skill: &str) -> bool {
    resource_skill.contains(required_skill) || required_skill.contains(resource_skill)
}

pub fn skill_overlap(resource_skills: &[Skill], required_skills: &[Skill]) -> SkillOverlap {
    let held = lowercase_names(resource_skills);

    let (matched, gaps): (Vec<String>, Vec<String>) = lowercase_names(required_skills)
        .into_iter()
        .partition(|required| held.iter().any(|rs| loosely_matches(rs, required)));

    SkillOverlap { matched, gaps }
}
