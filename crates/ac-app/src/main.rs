use std::io::{self, BufWriter};
use std::process::ExitCode;

use ac_core::config::CodecConfig;
use ac_harness::{load_scenarios, run_scenarios, write_report};
use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod pipeline;

use cli::{Command, TestArgs};
use pipeline::CliRunner;

fn main() -> Result<ExitCode> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let config = cli.resolve_config()?;

    // 4. Lancer le mode demandé
    match &cli.command {
        Command::Encode(args) => {
            let charset = pipeline::charset_for(config, args)?;
            let stdout = BufWriter::new(io::stdout().lock());
            pipeline::encode(&charset, io::stdin().lock(), stdout)?;
        }
        Command::Decode(args) => {
            let charset = pipeline::charset_for(config, args)?;
            let stdout = BufWriter::new(io::stdout().lock());
            pipeline::decode(&charset, io::stdin().lock(), stdout)?;
        }
        Command::Test(args) => return run_tests(args, config),
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the scenario file and print the PASS/FAIL summary.
fn run_tests(args: &TestArgs, config: CodecConfig) -> Result<ExitCode> {
    let scenarios = load_scenarios(&args.tests_file)?;
    let report = run_scenarios(&CliRunner::new(config), &scenarios);

    if args.verbose > 0 {
        for (alias, comparison) in &report.scenarios {
            let status = if comparison.passed() { "PASS" } else { "FAIL" };
            println!("[{status}] {alias}");
        }
        println!();
    }
    println!("{}", report.summary());

    if let Some(ref path) = args.report_file {
        write_report(path, &report)?;
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
