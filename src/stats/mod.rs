pub mod index;
pub mod series;
pub mod statistics;
pub mod translator;

pub use index::{LeagueIndex, PlayerIndex, StatIndex};
pub use series::{SeriesName, SeriesValue};
pub use statistics::EntityStatistics;
pub use translator::{IndexTranslator, Translation};
