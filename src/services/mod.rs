pub mod generate;
pub mod import;
pub mod report;

pub use generate::generate_sample_csv;
pub use import::CsvImporter;
pub use report::{print_match_list, print_standings, StatsReporter};
