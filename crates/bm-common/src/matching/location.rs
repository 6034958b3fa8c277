use super::weights::{MATCH_WEIGHTS, PARTIAL_LOCATION_POINTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFit {
    Exact,
    Contained,
    Unrelated,
}

impl LocationFit {
    pub fn points(self) -> f64 {
        match self {
            LocationFit::Exact => f64::from(MATCH_WEIGHTS.location),
            LocationFit::Contained => PARTIAL_LOCATION_POINTS,
            LocationFit::Unrelated => 0.0,
        }
    }
}

/// Compare two locations case-insensitively.
///
/// Returns `None` when either side is empty; the factor is then left out of
/// the score entirely.
pub fn evaluate_location(resource_location: &str, requirement_location: &str) -> Option<LocationFit> {
    if resource_location.is_empty() || requirement_location.is_empty() {
        return None;
    }

    let resource = resource_location.to_lowercase();
    let requirement = requirement_location.to_lowercase();

    let fit = if resource == requirement {
        LocationFit::Exact
    } else if resource.contains(&requirement) || requirement.contains(&resource) {
        LocationFit::Contained
    } else {
        LocationFit::Unrelated
    };

    Some(fit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ignores_case() {
        assert_eq!(evaluate_location("Pune", "pune"), Some(LocationFit::Exact));
        assert_eq!(LocationFit::Exact.points(), 20.0);
    }

    #[test]
    fn containment_scores_partially() {
        let fit = evaluate_location("Bangalore", "Bangalore North");
        assert_eq!(fit, Some(LocationFit::Contained));
        assert_eq!(fit.map(LocationFit::points), Some(10.0));
    }

    #[test]
    fn unrelated_locations_score_zero() {
        assert_eq!(evaluate_location("Pune", "Chennai"), Some(LocationFit::Unrelated));
        assert_eq!(LocationFit::Unrelated.points(), 0.0);
    }

    #[test]
    fn missing_location_skips_factor() {
        assert_eq!(evaluate_location("", "Pune"), None);
        assert_eq!(evaluate_location("Pune", ""), None);
    }
}
