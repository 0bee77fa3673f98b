use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use ac_core::Charset;
use anyhow::{Context, Result};

/// Decoded line that did not match its expected line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// 0-based decoded line index.
    pub index: usize,
    /// Decoder output, newline stripped.
    pub got: String,
    /// Expected line.
    pub expected: String,
}

/// Tally of a direct decode check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeCheck {
    /// Matching lines.
    pub good: usize,
    /// Differing lines.
    pub bad: usize,
    /// Every differing line, in order.
    pub mismatches: Vec<Mismatch>,
}

impl DecodeCheck {
    fn merge(&mut self, other: Self) {
        self.good += other.good;
        self.bad += other.bad;
        self.mismatches.extend(other.mismatches);
    }
}

/// Decode `art` with `charset` and compare each line with `expected`.
///
/// Expected lines beyond the decoded output are not counted.
///
/// # Errors
/// Returns an error on I/O failure, or when the decoder produces more lines
/// than `expected` holds.
pub fn check_decode<A: BufRead, E: BufRead>(charset: &Charset, art: A, expected: E) -> Result<DecodeCheck> {
    let expected: Vec<String> = expected.lines().collect::<io::Result<_>>()?;

    let mut read_error = None;
    let lines = art
        .lines()
        .map_while(|line| line.map_err(|e| read_error = Some(e)).ok());
    let results: Vec<String> = charset
        .decode_stream(lines)
        .map(|mut s| {
            s.pop();
            s
        })
        .collect();
    if let Some(e) = read_error {
        return Err(e.into());
    }

    if results.len() > expected.len() {
        anyhow::bail!(
            "Plus de résultats que prévu ({} produits, {} attendus)",
            results.len(),
            expected.len()
        );
    }

    let mut check = DecodeCheck::default();
    for (index, (got, exp)) in results.into_iter().zip(&expected).enumerate() {
        if got == *exp {
            check.good += 1;
        } else {
            log::warn!("[{index:03}]: {got:?} vs {exp:?}");
            check.bad += 1;
            check.mismatches.push(Mismatch {
                index,
                got,
                expected: exp.clone(),
            });
        }
    }
    Ok(check)
}

/// Run [`check_decode`] over (art file, expected file) pairs and sum the
/// results.
///
/// # Errors
/// The first failing pair's error, with its paths.
pub fn check_all(charset: &Charset, vectors: &[(PathBuf, PathBuf)]) -> Result<DecodeCheck> {
    let mut total = DecodeCheck::default();
    for (art, expected) in vectors {
        let check = check_decode(charset, open(art)?, open(expected)?)
            .with_context(|| format!("Vecteur {} invalide", art.display()))?;
        total.merge(check);
    }
    Ok(total)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
    Ok(BufReader::new(file))
}
