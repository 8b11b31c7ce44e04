pub mod engine;
pub mod factors;
pub mod types;

pub use engine::ScoreEngine;
pub use factors::{base_points, is_breaking_in, side_factors};
pub use types::{SideFactors, SidePoints};
