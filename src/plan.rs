//! Content planning: trend selection, skeleton anchoring, and the validated plan.

pub mod brand;
pub mod builder;
pub mod planner;
pub mod trend;

pub use builder::{validate, ContentPlan, ContentPlanBuilder, HASHTAG_COUNT};
pub use planner::ContentPlanner;
pub use trend::{candidate_domains, load_candidates, TrendCandidate};
