pub mod finder;
pub mod location;
pub mod prefilter;
pub mod scoring;
pub mod skills;
pub mod weights;

pub use finder::find_matches;
pub use scoring::{ScoreBreakdown, calculate_match_score};
