/// Batch harness for asciiart.
///
/// Runs the codec over named (input, expected output) pairs, compares the
/// results line by line and writes JSON reports.

pub mod compare;
pub mod report;
pub mod scenario;
pub mod vectors;

pub use compare::{Comparison, compare_texts};
pub use report::{Report, Totals, write_report};
pub use scenario::{Scenario, ScenarioRunner, load_scenarios, run_scenarios};
pub use vectors::{DecodeCheck, check_all, check_decode};
