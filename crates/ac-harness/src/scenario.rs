use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compare::{Comparison, compare_texts};
use crate::report::Report;

/// One named test case: codec arguments, input file, expected output file.
///
/// # Example
/// ```
/// use ac_harness::scenario::Scenario;
/// let s: Scenario = serde_json::from_str(
///     r#"{"args": "decode --tolerance 1", "in": "in.txt", "out": "out.txt"}"#,
/// ).unwrap();
/// assert_eq!(s.args, "decode --tolerance 1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Scenario {
    /// Whitespace-separated codec arguments.
    pub args: String,
    /// File fed to the codec.
    #[serde(rename = "in")]
    pub input: PathBuf,
    /// File holding the expected output.
    #[serde(rename = "out")]
    pub output: PathBuf,
}

/// Executes the codec for the harness.
///
/// Implemented by the binary, which owns argument parsing.
pub trait ScenarioRunner {
    /// Run the codec configured by `args` from `input` to `output`.
    ///
    /// # Errors
    /// Any failure that prevents producing the output.
    fn run(&self, args: &[String], input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()>;
}

/// Load a JSON scenario file: an object mapping alias → scenario.
///
/// Relative `in`/`out` paths are resolved against the scenario file directory.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_scenarios(path: &Path) -> Result<BTreeMap<String, Scenario>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let mut scenarios: BTreeMap<String, Scenario> = serde_json::from_str(&content)
        .with_context(|| format!("Fichier de scénarios invalide : {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for scenario in scenarios.values_mut() {
        scenario.input = base.join(&scenario.input);
        scenario.output = base.join(&scenario.output);
    }
    log::debug!("{} scénario(s) chargé(s) depuis {}", scenarios.len(), path.display());
    Ok(scenarios)
}

/// Run a single scenario and compare its output with the expected file.
///
/// # Errors
/// Returns an error if a file cannot be read, the runner fails, or the
/// output is not UTF-8.
pub fn run_scenario<R: ScenarioRunner + ?Sized>(runner: &R, scenario: &Scenario) -> Result<Comparison> {
    let args: Vec<String> = scenario.args.split_whitespace().map(String::from).collect();
    let file = File::open(&scenario.input)
        .with_context(|| format!("Impossible de lire {}", scenario.input.display()))?;
    let mut input = BufReader::new(file);
    let mut output = Vec::new();
    runner.run(&args, &mut input, &mut output)?;

    let out = String::from_utf8(output).context("Sortie non UTF-8")?;
    let expected = std::fs::read_to_string(&scenario.output)
        .with_context(|| format!("Impossible de lire {}", scenario.output.display()))?;
    Ok(compare_texts(&out, &expected))
}

/// Run every scenario in alias order.
///
/// A scenario whose run fails is recorded as failed with its error; the
/// batch goes on.
pub fn run_scenarios<R: ScenarioRunner + ?Sized>(
    runner: &R,
    scenarios: &BTreeMap<String, Scenario>,
) -> Report {
    let mut report = Report::default();
    for (alias, scenario) in scenarios {
        let comparison = match run_scenario(runner, scenario) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Scénario {alias} : {e:#}");
                Comparison::failed(format!("{e:#}"))
            }
        };
        log::info!(
            "[{}] {alias}",
            if comparison.passed() { "PASS" } else { "FAIL" }
        );
        report.record(alias, comparison);
    }
    report
}
