/// Points each factor contributes to the 100-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub skills: u32,
    pub location: u32,
    pub availability: u32,
    pub status: u32,
}

impl Weights {
    pub const fn sum(&self) -> u32 {
        self.skills + self.location + self.availability + self.status
    }
}

pub const MATCH_WEIGHTS: Weights = Weights {
    skills: 40,
    location: 20,
    availability: 20,
    status: 20,
};

/// Pairs scoring below this are never recommended.
pub const MIN_RECOMMENDED_SCORE: u8 = 50;

/// Location points when one location string contains the other.
pub const PARTIAL_LOCATION_POINTS: f64 = 10.0;

/// Availability points by days between requirement start and resource availability.
pub const AVAILABILITY_STEPS: [(i64, f64); 2] = [(30, 15.0), (60, 10.0)];
pub const LATE_AVAILABILITY_POINTS: f64 = 5.0;

pub const DEPLOYED_STATUS_POINTS: f64 = 5.0;

/// Share of the billing rate assumed as gross profit.
pub const GROSS_MARGIN_SHARE: f64 = 0.4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_hundred() {
        assert_eq!(MATCH_WEIGHTS.sum(), 100);
    }
}
