use std::path::{Path, PathBuf};

use ac_core::config::{CodecConfig, load_config};
use clap::{ArgAction, Args, Parser, Subcommand};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "asciiart.toml";

/// asciiart — Text <--> ASCII art conversion pipe (stdin --> stdout).
#[derive(Parser, Debug)]
#[command(name = "asciiart", version, about, long_about = None)]
pub struct Cli {
    /// Mode de conversion.
    #[command(subcommand)]
    pub command: Command,

    /// Fichier de configuration TOML. Défaut : ./asciiart.toml s'il existe.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// text --> ascii-art
    Encode(CodecArgs),
    /// ascii-art --> text
    Decode(CodecArgs),
    /// Run the scenarios of a JSON test file.
    Test(TestArgs),
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct CodecArgs {
    /// Selects file CS as the ascii-art charset.
    #[arg(long, value_name = "CS")]
    pub charset: Option<PathBuf>,

    /// Conversion will tolerate errors of up to distance T.
    #[arg(long, value_name = "T")]
    pub tolerance: Option<usize>,

    /// Will not print the ILLEGAL suffix in case of errors.
    #[arg(long, default_value_t = false)]
    pub no_illegal: bool,

    /// Will use C to indicate an unrecognized ascii-art block.
    #[arg(long, alias = "invalid_char", value_name = "C")]
    pub invalid_char: Option<char>,
}

impl CodecArgs {
    /// Apply the flags that were given.
    pub fn apply(&self, config: &mut CodecConfig) {
        if let Some(ref path) = self.charset {
            config.charset = Some(path.clone());
        }
        if let Some(t) = self.tolerance {
            config.tolerance = t;
        }
        if self.no_illegal {
            config.mark_illegal = false;
        }
        if let Some(c) = self.invalid_char {
            config.invalid_char = c;
        }
    }
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Test scenarios file.
    #[arg(short = 't', long = "tests", default_value = "test_scenarios.json")]
    pub tests_file: PathBuf,

    /// Verbose output.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output results to report file.
    #[arg(short = 'r', long = "report")]
    pub report_file: Option<PathBuf>,
}

impl Cli {
    /// Resolve the configuration: `--config` must exist, the default file is
    /// optional.
    ///
    /// # Errors
    /// Returns an error if the selected file cannot be read or parsed.
    pub fn resolve_config(&self) -> anyhow::Result<CodecConfig> {
        match self.config.as_deref() {
            Some(path) => load_config(path),
            None if Path::new(DEFAULT_CONFIG).exists() => load_config(Path::new(DEFAULT_CONFIG)),
            None => {
                log::debug!("Pas de {DEFAULT_CONFIG}, utilisation des défauts.");
                Ok(CodecConfig::default())
            }
        }
    }
}
