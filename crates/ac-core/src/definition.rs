use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{DefinitionError, LayoutError};

/// Built-in seven-segment digits charset, 3×4 blocks, `0123456789`.
///
/// Its fourth drawing row is blank and stored as an empty line.
pub const DECIMAL_CHARSET: &str = include_str!("../charsets/decimal.charset");

/// Raw content of a charset file, before validation of the drawing.
///
/// File layout, one field per line:
/// 1. block width
/// 2. block height
/// 3. representative characters, in drawing order
/// 4. exactly `block_height` drawing lines
///
/// # Example
/// ```
/// use ac_core::definition::CharsetDefinition;
/// let def = CharsetDefinition::parse("1\n1\nAB\n01\n").unwrap();
/// assert_eq!(def.block_width, 1);
/// assert_eq!(def.chars, vec!['A', 'B']);
/// assert_eq!(def.drawing, vec!["01".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharsetDefinition {
    /// Glyph width in characters.
    pub block_width: usize,
    /// Glyph height in characters.
    pub block_height: usize,
    /// Representative characters, one per drawn block.
    pub chars: Vec<char>,
    /// The `block_height` drawing lines.
    pub drawing: Vec<String>,
}

impl CharsetDefinition {
    /// Read a definition from any buffered source.
    ///
    /// Line terminators are stripped, nothing else: spaces in the characters
    /// line and the drawing are significant. The last drawing line may be
    /// missing at end of input and is then read as an empty line.
    ///
    /// # Errors
    /// Returns an error on I/O failure, a missing header line, a
    /// non-numeric or zero dimension, or when more than the last drawing
    /// line is missing.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DefinitionError> {
        let mut lines = reader.lines();

        let block_width = parse_dimension(&header(&mut lines, 0)?, 0)?;
        let block_height = parse_dimension(&header(&mut lines, 1)?, 1)?;
        if block_width == 0 || block_height == 0 {
            return Err(DefinitionError::ZeroDimension {
                width: block_width,
                height: block_height,
            });
        }
        let chars = header(&mut lines, 2)?.chars().collect();

        let mut drawing = Vec::new();
        for line in lines.by_ref().take(block_height) {
            drawing.push(line?);
        }
        // Seule la dernière ligne, vide et sans fin de ligne, peut manquer.
        if drawing.len() + 1 == block_height {
            drawing.push(String::new());
        } else if drawing.len() < block_height {
            return Err(LayoutError::LineCount {
                found: drawing.len(),
                expected: block_height,
            }
            .into());
        }

        Ok(Self {
            block_width,
            block_height,
            chars,
            drawing,
        })
    }

    /// Parse a definition held in memory.
    ///
    /// # Errors
    /// See [`CharsetDefinition::from_reader`].
    pub fn parse(text: &str) -> Result<Self, DefinitionError> {
        Self::from_reader(text.as_bytes())
    }

    /// Read a definition file.
    ///
    /// # Errors
    /// Returns [`DefinitionError::Io`] if the file cannot be opened, then see
    /// [`CharsetDefinition::from_reader`].
    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The built-in decimal charset.
    ///
    /// # Errors
    /// Never fails in practice; the embedded file is covered by tests.
    pub fn decimal() -> Result<Self, DefinitionError> {
        Self::parse(DECIMAL_CHARSET)
    }
}

fn header<I>(lines: &mut I, line: usize) -> Result<String, DefinitionError>
where
    I: Iterator<Item = io::Result<String>>,
{
    match lines.next() {
        Some(text) => Ok(text?),
        None => Err(DefinitionError::MissingHeader { line }),
    }
}

fn parse_dimension(text: &str, line: usize) -> Result<usize, DefinitionError> {
    text.trim()
        .parse()
        .map_err(|_| DefinitionError::InvalidNumber {
            line,
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn decimal_charset_is_well_formed() {
        let def = CharsetDefinition::decimal().unwrap();
        assert_eq!((def.block_width, def.block_height), (3, 4));
        assert_eq!(def.chars.len(), 10);
        assert_eq!(def.drawing.len(), 4);
        assert!(def.drawing[3].is_empty());
    }

    #[test]
    fn keeps_spaces_and_strips_crlf() {
        let def = CharsetDefinition::parse("1\r\n1\r\n a\r\n_b\r\n").unwrap();
        assert_eq!(def.chars, vec![' ', 'a']);
        assert_eq!(def.drawing, vec!["_b".to_string()]);
    }

    #[test]
    fn missing_drawing_lines_are_empty() {
        let def = CharsetDefinition::parse("1\n3\nAB\n01\n23").unwrap();
        assert_eq!(def.drawing, vec!["01", "23", ""]);
    }

    #[test]
    fn only_the_last_drawing_line_may_be_missing() {
        let err = CharsetDefinition::parse("1\n4\nAB\n01\n23").unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::Layout(LayoutError::LineCount { found: 2, expected: 4 })
        ));
    }

    #[test]
    fn huge_height_is_an_error_not_an_allocation() {
        let err = CharsetDefinition::parse("1\n18446744073709551615\nA\n0\n").unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::Layout(LayoutError::LineCount { found: 1, .. })
        ));
        let err = CharsetDefinition::parse("1\n1000000000\nA\n0\n").unwrap_err();
        assert!(matches!(err, DefinitionError::Layout(_)));
    }

    #[test]
    fn missing_header_is_reported() {
        let err = CharsetDefinition::parse("3\n4\n").unwrap_err();
        assert!(matches!(err, DefinitionError::MissingHeader { line: 2 }));
    }

    #[test]
    fn bad_dimension_is_reported() {
        let err = CharsetDefinition::parse("three\n4\n0\n").unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidNumber { line: 0, .. }));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = CharsetDefinition::parse("0\n4\n0\n").unwrap_err();
        assert!(matches!(err, DefinitionError::ZeroDimension { width: 0, .. }));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1\n1\nAB\n01\n").unwrap();
        let def = CharsetDefinition::from_path(file.path()).unwrap();
        assert_eq!(def.chars, vec!['A', 'B']);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CharsetDefinition::from_path(Path::new("/nonexistent/x.charset")).unwrap_err();
        assert!(matches!(err, DefinitionError::Io(_)));
    }
}
