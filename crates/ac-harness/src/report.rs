use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compare::Comparison;

/// Pass/fail bookkeeping across scenarios.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Totals {
    /// Aliases of failed scenarios, in run order.
    pub fail: Vec<String>,
    /// Number of failed scenarios.
    pub fail_count: usize,
    /// Aliases of passed scenarios, in run order.
    pub pass: Vec<String>,
    /// Number of passed scenarios.
    pub pass_count: usize,
}

/// Result of a scenario batch, serialisable as the JSON report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Report {
    /// Comparison per scenario alias.
    pub scenarios: BTreeMap<String, Comparison>,
    /// Pass/fail totals.
    pub totals: Totals,
}

impl Report {
    /// Record one scenario outcome.
    pub fn record(&mut self, alias: &str, comparison: Comparison) {
        if comparison.passed() {
            self.totals.pass.push(alias.to_string());
            self.totals.pass_count += 1;
        } else {
            self.totals.fail.push(alias.to_string());
            self.totals.fail_count += 1;
        }
        self.scenarios.insert(alias.to_string(), comparison);
    }

    /// True when every scenario passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.totals.fail_count == 0
    }

    /// One-line summary, `passed: N, failed: M`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "passed: {}, failed: {}",
            self.totals.pass_count, self.totals.fail_count
        )
    }
}

/// Write the report as indented JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Impossible de créer {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Écriture du rapport {} impossible", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    log::info!("Rapport écrit dans {}", path.display());
    Ok(())
}
