use std::borrow::Cow;
use std::io::{self, BufRead, Write};

use ac_core::Charset;
use ac_core::config::{CodecConfig, load_config};
use ac_harness::ScenarioRunner;
use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::{Cli, CodecArgs, Command};

/// Encode every text line of `input` into `output`.
///
/// Returns the number of lines encoded.
///
/// # Errors
/// Stops at the first unencodable character or I/O failure.
pub fn encode<R: BufRead, W: Write>(charset: &Charset, input: R, mut output: W) -> Result<usize> {
    let mut read_error = None;
    let lines = input
        .lines()
        .map_while(|line| line.map_err(|e| read_error = Some(e)).ok());

    let mut count = 0;
    for (lineno, art) in charset.encode_stream(lines).enumerate() {
        let art = art.with_context(|| format!("Ligne {} non encodable", lineno + 1))?;
        output.write_all(art.as_bytes())?;
        count += 1;
    }
    if let Some(e) = read_error {
        return Err(e).context("Lecture de l'entrée interrompue");
    }
    output.flush()?;
    log::info!("{count} ligne(s) encodée(s)");
    Ok(count)
}

/// Decode the art of `input` into text lines on `output`.
///
/// Returns the number of lines decoded. A trailing partial group is dropped.
/// Bytes that are not UTF-8 become `U+FFFD` cells and resolve like any other
/// unknown block.
///
/// # Errors
/// Only on I/O failure; damaged art never fails.
pub fn decode<R: BufRead, W: Write>(charset: &Charset, input: R, mut output: W) -> Result<usize> {
    let mut read_error = None;
    let lines = lossy_lines(input, &mut read_error);

    let (count, dropped) = {
        let mut stream = charset.decode_stream(lines);
        let mut count = 0;
        for text in stream.by_ref() {
            output.write_all(text.as_bytes())?;
            count += 1;
        }
        (count, stream.pending())
    };

    if let Some(e) = read_error {
        return Err(e).context("Lecture de l'entrée interrompue");
    }
    if dropped > 0 {
        log::warn!("{dropped} ligne(s) finale(s) ignorée(s) : groupe incomplet");
    }
    output.flush()?;
    log::info!("{count} ligne(s) décodée(s)");
    Ok(count)
}

/// Raw lines of `input`, decoded as lossy UTF-8. Stops at the first read
/// error, which is left in `read_error`.
fn lossy_lines<'e, R: BufRead + 'e>(
    mut input: R,
    read_error: &'e mut Option<io::Error>,
) -> impl Iterator<Item = String> + 'e {
    let mut buf = Vec::new();
    std::iter::from_fn(move || {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if matches!(line, Cow::Owned(_)) {
                    log::debug!("Octets non UTF-8 remplacés par U+FFFD");
                }
                Some(line.into_owned())
            }
            Err(e) => {
                *read_error = Some(e);
                None
            }
        }
    })
}

/// Build the charset for one encode/decode invocation.
///
/// # Errors
/// Returns an error if the charset cannot be loaded.
pub fn charset_for(mut config: CodecConfig, args: &CodecArgs) -> Result<Charset> {
    args.apply(&mut config);
    config.load_charset()
}

/// Runs scenarios through the same argument parsing as the command line.
#[derive(Debug, Default)]
pub struct CliRunner {
    base: CodecConfig,
}

impl CliRunner {
    /// Runner whose scenarios start from `base` unless they pass `--config`.
    #[must_use]
    pub fn new(base: CodecConfig) -> Self {
        Self { base }
    }
}

impl ScenarioRunner for CliRunner {
    fn run(&self, args: &[String], input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()> {
        let cli = Cli::try_parse_from(std::iter::once("asciiart").chain(args.iter().map(String::as_str)))
            .with_context(|| format!("Arguments de scénario invalides : {}", args.join(" ")))?;
        let config = match cli.config.as_deref() {
            Some(path) => load_config(path)?,
            None => self.base.clone(),
        };

        match &cli.command {
            Command::Encode(codec) => {
                encode(&charset_for(config, codec)?, input, output)?;
            }
            Command::Decode(codec) => {
                decode(&charset_for(config, codec)?, input, output)?;
            }
            Command::Test(_) => anyhow::bail!("Un scénario ne peut pas lancer 'test'"),
        }
        Ok(())
    }
}
