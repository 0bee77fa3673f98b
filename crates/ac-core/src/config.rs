use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{Charset, CodecOptions, DEFAULT_ILLEGAL_SUFFIX, DEFAULT_INVALID_CHAR};

/// Codec settings, loadable from TOML and overridable from the CLI.
///
/// # Example
/// ```
/// use ac_core::config::CodecConfig;
/// let config = CodecConfig::default();
/// assert_eq!(config.tolerance, 0);
/// assert!(config.charset.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Charset file. `None` = built-in decimal charset.
    pub charset: Option<PathBuf>,
    /// Largest accepted block distance on decode.
    pub tolerance: usize,
    /// Append `illegal_suffix` to lines with unresolved blocks.
    pub mark_illegal: bool,
    /// Marker appended to illegal lines.
    pub illegal_suffix: String,
    /// Stand-in for unresolved blocks.
    pub invalid_char: char,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            charset: None,
            tolerance: 0,
            mark_illegal: true,
            illegal_suffix: DEFAULT_ILLEGAL_SUFFIX.to_string(),
            invalid_char: DEFAULT_INVALID_CHAR,
        }
    }
}

impl CodecConfig {
    /// Decode policy described by this configuration.
    #[must_use]
    pub fn options(&self) -> CodecOptions {
        CodecOptions {
            tolerance: self.tolerance,
            illegal_suffix: self.mark_illegal.then(|| self.illegal_suffix.clone()),
            invalid_char: self.invalid_char,
        }
    }

    /// Build the configured charset.
    ///
    /// # Errors
    /// Returns an error if the charset file cannot be read or is invalid.
    pub fn load_charset(&self) -> Result<Charset> {
        match &self.charset {
            Some(path) => Charset::from_path(path, self.options())
                .with_context(|| format!("Charset invalide : {}", path.display())),
            None => Charset::decimal(self.options()).context("Charset décimal intégré invalide"),
        }
    }
}

/// Structure TOML intermédiaire, tous les champs optionnels.
#[derive(Deserialize)]
struct ConfigFile {
    codec: Option<CodecSection>,
}

#[derive(Deserialize)]
struct CodecSection {
    charset: Option<PathBuf>,
    tolerance: Option<usize>,
    mark_illegal: Option<bool>,
    illegal_suffix: Option<String>,
    invalid_char: Option<char>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// A relative `charset` path is resolved against the config file directory.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ac_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("asciiart.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<CodecConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let mut config = parse_config(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    if let Some(charset) = config.charset.as_mut()
        && charset.is_relative()
        && let Some(dir) = path.parent()
    {
        *charset = dir.join(&*charset);
    }
    Ok(config)
}

/// Parse TOML text over the defaults. Paths are kept as written.
///
/// # Errors
/// Returns an error on invalid TOML or mistyped fields.
pub fn parse_config(content: &str) -> Result<CodecConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = CodecConfig::default();

    if let Some(c) = file.codec {
        if let Some(v) = c.charset {
            config.charset = Some(v);
        }
        if let Some(v) = c.tolerance {
            config.tolerance = v;
        }
        if let Some(v) = c.mark_illegal {
            config.mark_illegal = v;
        }
        if let Some(v) = c.illegal_suffix {
            config.illegal_suffix = v;
        }
        if let Some(v) = c.invalid_char {
            config.invalid_char = v;
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), CodecConfig::default());
    }

    #[test]
    fn sample_config_matches_defaults() {
        let sample = include_str!("../../../demos/asciiart.toml");
        assert_eq!(parse_config(sample).unwrap(), CodecConfig::default());
    }

    #[test]
    fn partial_section_overrides_fields() {
        let config = parse_config("[codec]\ntolerance = 2\ninvalid_char = \"#\"\n").unwrap();
        assert_eq!(config.tolerance, 2);
        assert_eq!(config.invalid_char, '#');
        assert!(config.mark_illegal);
    }

    #[test]
    fn disabled_marker_drops_suffix() {
        let config = parse_config("[codec]\nmark_illegal = false\n").unwrap();
        assert_eq!(config.options().illegal_suffix, None);
    }

    #[test]
    fn rejects_multi_char_invalid_char() {
        assert!(parse_config("[codec]\ninvalid_char = \"??\"\n").is_err());
    }

    #[test]
    fn relative_charset_follows_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asciiart.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[codec]\ncharset = \"digits.charset\"").unwrap();
        std::fs::write(dir.path().join("digits.charset"), "1\n1\nAB\n01\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.charset, Some(dir.path().join("digits.charset")));
        let charset = config.load_charset().unwrap();
        assert_eq!(charset.len(), 2);
    }

    #[test]
    fn default_config_loads_decimal() {
        let charset = CodecConfig::default().load_charset().unwrap();
        assert_eq!(charset.block_height(), 4);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/asciiart.toml")).is_err());
    }
}
