//! Line-level encode/decode over a [`Charset`], plus the lazy streams.

use crate::block::{Block, split_columns, split_columns_lenient};
use crate::charset::{Charset, CodecOptions, Resolution};
use crate::error::EncodeError;

/// One decoded group before the illegal marker is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedLine {
    /// Decoded characters, `invalid_char` for unresolved blocks.
    pub text: String,
    /// At least one block was unresolved, or the group geometry was broken.
    pub illegal: bool,
    /// Blocks resolved through the tolerance fallback.
    pub fuzzy: usize,
    /// The group failed the strict width rules and was cut leniently.
    pub malformed: bool,
}

impl DecodedLine {
    /// Final output line: text, suffix when illegal, newline.
    #[must_use]
    pub fn render(&self, options: &CodecOptions) -> String {
        let suffix = match (&options.illegal_suffix, self.illegal) {
            (Some(suffix), true) => suffix.as_str(),
            _ => "",
        };
        let mut out = String::with_capacity(self.text.len() + suffix.len() + 1);
        out.push_str(&self.text);
        out.push_str(suffix);
        out.push('\n');
        out
    }
}

impl Charset {
    /// Render one text line as `block_height` newline-terminated art lines.
    ///
    /// # Errors
    /// [`EncodeError::UnknownCharacter`] on the first character without a
    /// glyph; nothing is produced in that case.
    ///
    /// # Example
    /// ```
    /// use ac_core::charset::{Charset, CodecOptions};
    /// let charset = Charset::parse("1\n1\nAB\n01\n", CodecOptions::default()).unwrap();
    /// assert_eq!(charset.encode_line("AB").unwrap(), "01\n");
    /// ```
    pub fn encode_line(&self, line: &str) -> Result<String, EncodeError> {
        let glyphs = line
            .chars()
            .enumerate()
            .map(|(column, ch)| self.glyph(ch).ok_or_else(|| EncodeError::unknown(ch, column)))
            .collect::<Result<Vec<&Block>, _>>()?;

        let width = self.block_width();
        let height = self.block_height();
        let mut out = String::with_capacity((glyphs.len() * width + 1) * height);
        for row in 0..height {
            for glyph in &glyphs {
                out.extend(glyph.row(row, width));
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Encode a whole text, line by line, splitting on `\n`.
    ///
    /// A trailing newline yields a final empty line, encoded as
    /// `block_height` empty art lines.
    ///
    /// # Errors
    /// The first [`EncodeError`] met.
    pub fn encode_text(&self, text: &str) -> Result<String, EncodeError> {
        let mut out = String::new();
        for line in text.split('\n') {
            out.push_str(&self.encode_line(line)?);
        }
        Ok(out)
    }

    /// Lazily encode a sequence of text lines, one art block per line.
    ///
    /// A single trailing `\n` (or `\r\n`) is stripped from each input line.
    ///
    /// # Example
    /// ```
    /// use ac_core::charset::{Charset, CodecOptions};
    /// let charset = Charset::parse("1\n1\nAB\n01\n", CodecOptions::default()).unwrap();
    /// let out: Vec<_> = charset.encode_stream(["AB\n", "BA"]).collect();
    /// assert_eq!(out, vec![Ok("01\n".to_string()), Ok("10\n".to_string())]);
    /// ```
    pub fn encode_stream<I, S>(&self, lines: I) -> EncodeStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        EncodeStream {
            charset: self,
            lines: lines.into_iter(),
        }
    }

    /// Decode one group of `block_height` art lines into a text line ending
    /// with `\n`. Never fails.
    ///
    /// Unresolved blocks become `invalid_char` and the line gets the illegal
    /// suffix, when one is configured.
    ///
    /// # Example
    /// ```
    /// use ac_core::charset::{Charset, CodecOptions};
    /// let charset = Charset::parse("1\n1\nAB\n01\n", CodecOptions::default()).unwrap();
    /// assert_eq!(charset.decode_group(&["01"]), "AB\n");
    /// assert_eq!(charset.decode_group(&["21"]), "?B ILLEGAL\n");
    /// ```
    #[must_use]
    pub fn decode_group<S: AsRef<str>>(&self, lines: &[S]) -> String {
        self.decode_line_report(lines).render(self.options())
    }

    /// Decode one group and report how each block was resolved.
    #[must_use]
    pub fn decode_line_report<S: AsRef<str>>(&self, lines: &[S]) -> DecodedLine {
        let width = self.block_width();
        let height = self.block_height();
        let (blocks, malformed) = match split_columns(lines, width, height) {
            Ok(blocks) => (blocks, false),
            Err(e) => {
                log::warn!("Groupe mal formé ({e}), découpage approximatif");
                (split_columns_lenient(lines, width, height), true)
            }
        };

        let invalid = self.options().invalid_char;
        let mut decoded = DecodedLine {
            text: String::with_capacity(blocks.len()),
            illegal: malformed,
            fuzzy: 0,
            malformed,
        };
        for (column, block) in blocks.iter().enumerate() {
            let resolution = self.resolve(block);
            match resolution {
                Resolution::Exact(_) => {}
                Resolution::Fuzzy { ch, distance } => {
                    log::debug!("Bloc {column} : {ch:?} retenu à distance {distance}");
                    decoded.fuzzy += 1;
                }
                Resolution::Unresolved => {
                    log::trace!("Bloc {column} non reconnu");
                    decoded.illegal = true;
                }
            }
            decoded.text.push(resolution.char_or(invalid));
        }
        decoded
    }

    /// Lazily decode art lines, one text line per complete group.
    ///
    /// Only one group is buffered at a time. Trailing lines that do not fill
    /// a whole group produce nothing. A trailing `\n` or `\r\n` is stripped
    /// from each line, so CRLF art decodes like LF art.
    ///
    /// # Example
    /// ```
    /// use ac_core::charset::{Charset, CodecOptions};
    /// let charset = Charset::parse("1\n2\nAB\n01\n10\n", CodecOptions::default()).unwrap();
    /// let out: Vec<_> = charset.decode_stream(["01", "10", "01"]).collect();
    /// assert_eq!(out, vec!["AB\n".to_string()]);
    /// ```
    pub fn decode_stream<I, S>(&self, lines: I) -> DecodeStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        DecodeStream {
            charset: self,
            lines: lines.into_iter(),
            group: Vec::with_capacity(self.block_height()),
            exhausted: false,
        }
    }

    /// Decode a whole art text held in memory.
    #[must_use]
    pub fn decode_text(&self, art: &str) -> String {
        self.decode_stream(art.lines()).collect()
    }
}

/// Iterator returned by [`Charset::encode_stream`].
#[derive(Debug)]
pub struct EncodeStream<'a, I> {
    charset: &'a Charset,
    lines: I,
}

impl<I, S> Iterator for EncodeStream<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<String, EncodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(self.charset.encode_line(strip_newline(line.as_ref())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

/// Iterator returned by [`Charset::decode_stream`].
#[derive(Debug)]
pub struct DecodeStream<'a, I> {
    charset: &'a Charset,
    lines: I,
    group: Vec<String>,
    exhausted: bool,
}

impl<I> DecodeStream<'_, I> {
    /// Lines buffered toward the next group. Once the input is exhausted this
    /// is the size of the dropped partial group.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.group.len()
    }
}

impl<I, S> Iterator for DecodeStream<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        for line in self.lines.by_ref() {
            self.group.push(strip_newline(line.as_ref()).to_string());
            if self.group.len() == self.charset.block_height() {
                let out = self.charset.decode_group(self.group.as_slice());
                self.group.clear();
                return Some(out);
            }
        }
        self.exhausted = true;
        if !self.group.is_empty() {
            log::debug!(
                "{} ligne(s) finale(s) ignorée(s) : groupe incomplet",
                self.group.len()
            );
        }
        None
    }
}

fn strip_newline(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AB: &str = "1\n1\nAB\n01\n";

    fn charset(text: &str, options: CodecOptions) -> Charset {
        Charset::parse(text, options).unwrap()
    }

    fn tolerant(tolerance: usize) -> CodecOptions {
        CodecOptions {
            tolerance,
            ..CodecOptions::default()
        }
    }

    #[test]
    fn encodes_single_row_charset() {
        let cs = charset(AB, CodecOptions::default());
        assert_eq!(cs.encode_line("AB").unwrap(), "01\n");
        assert_eq!(cs.encode_line("").unwrap(), "\n");
    }

    #[test]
    fn encodes_rows_side_by_side() {
        let cs = Charset::decimal(CodecOptions::default()).unwrap();
        assert_eq!(
            cs.encode_line("12").unwrap(),
            "    _ \n  | _|\n  ||_ \n      \n"
        );
    }

    #[test]
    fn unknown_character_fails_whole_line() {
        let cs = charset(AB, CodecOptions::default());
        let err = cs.encode_line("ABC").unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnknownCharacter {
                ch: 'C',
                code_point: 67,
                column: 2
            }
        );
    }

    #[test]
    fn encode_text_keeps_trailing_empty_line() {
        let cs = charset(AB, CodecOptions::default());
        assert_eq!(cs.encode_text("AB\nB\n").unwrap(), "01\n1\n\n");
    }

    #[test]
    fn encode_stream_stops_being_useful_at_first_error() {
        let cs = charset(AB, CodecOptions::default());
        let mut stream = cs.encode_stream(["A\r\n", "x", "B"]);
        assert_eq!(stream.next(), Some(Ok("0\n".to_string())));
        assert!(matches!(
            stream.next(),
            Some(Err(EncodeError::UnknownCharacter { ch: 'x', .. }))
        ));
        assert_eq!(stream.next(), Some(Ok("1\n".to_string())));
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn decimal_round_trip() {
        let cs = Charset::decimal(CodecOptions::default()).unwrap();
        for line in ["0123456789", "", "9876543210", "000", "4"] {
            let art = cs.encode_line(line).unwrap();
            assert_eq!(cs.decode_text(&art), format!("{line}\n"));
        }
    }

    #[test]
    fn multi_line_round_trip_through_streams() {
        let cs = Charset::decimal(CodecOptions::default()).unwrap();
        let text = ["490067715", "123456789", "000000051"];
        let art: String = cs.encode_stream(text).map(Result::unwrap).collect();
        let decoded: Vec<String> = cs.decode_stream(art.lines()).collect();
        assert_eq!(decoded, vec!["490067715\n", "123456789\n", "000000051\n"]);
    }

    #[test]
    fn unknown_block_marks_line_at_zero_tolerance() {
        let cs = charset(AB, CodecOptions::default());
        assert_eq!(cs.decode_group(&["21"]), "?B ILLEGAL\n");
        let report = cs.decode_line_report(&["21"]);
        assert!(report.illegal);
        assert_eq!(report.text, "?B");
    }

    #[test]
    fn no_suffix_when_disabled() {
        let options = CodecOptions {
            illegal_suffix: None,
            invalid_char: '#',
            ..CodecOptions::default()
        };
        let cs = charset(AB, options);
        assert_eq!(cs.decode_group(&["21"]), "#B\n");
    }

    #[test]
    fn one_flipped_cell_in_decimal_art() {
        let cs = Charset::decimal(CodecOptions::default()).unwrap();
        assert_eq!(cs.decode_group(&[" _ ", "| |", "|_|", ""]), "0\n");
        // "0" sans son coin bas droit.
        let damaged = [" _ ", "| |", "|_ ", ""];
        assert_eq!(cs.decode_group(&damaged), "? ILLEGAL\n");
    }

    #[test]
    fn tolerance_recovers_damaged_block() {
        let cs = Charset::decimal(tolerant(1)).unwrap();
        let damaged = [" _ ", "| |", "|_ ", ""];
        let report = cs.decode_line_report(&damaged);
        assert_eq!(report.text, "0");
        assert_eq!(report.fuzzy, 1);
        assert!(!report.illegal);
        assert_eq!(cs.decode_group(&damaged), "0\n");
    }

    #[test]
    fn decimal_tie_prefers_lower_digit() {
        let cs = Charset::decimal(tolerant(1)).unwrap();
        // A 1 de "4" comme de "9".
        assert_eq!(cs.decode_group(&[" _ ", "|_|", "  |", ""]), "4\n");
    }

    #[test]
    fn equidistant_block_uses_glyph_order() {
        let cs = charset("2\n1\nABC\naabbab\n", tolerant(1));
        assert_eq!(cs.decode_group(&["ba"]), "A\n");
    }

    #[test]
    fn too_far_for_tolerance_is_invalid() {
        let cs = charset("2\n1\nAB\naabb\n", tolerant(1));
        assert_eq!(cs.decode_group(&["xyaa"]), "?A ILLEGAL\n");
    }

    #[test]
    fn short_last_group_line_is_padded() {
        let cs = Charset::decimal(CodecOptions::default()).unwrap();
        assert_eq!(cs.decode_group(&["    _ ", "  | _|", "  ||_ ", ""]), "12\n");
    }

    #[test]
    fn partial_trailing_group_is_dropped() {
        let cs = charset("1\n2\nAB\n01\n10\n", CodecOptions::default());
        let mut stream = cs.decode_stream(["01", "10", "10", "01", "01"]);
        assert_eq!(stream.next(), Some("AB\n".to_string()));
        assert_eq!(stream.next(), Some("BA\n".to_string()));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.pending(), 1);
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn malformed_group_still_decodes() {
        let cs = charset("1\n2\nAB\n01\n10\n", CodecOptions::default());
        let report = cs.decode_line_report(&["01", "101"]);
        assert!(report.malformed);
        assert!(report.illegal);
        assert_eq!(report.text, "AB?");
        assert_eq!(cs.decode_group(&["01", "101"]), "AB? ILLEGAL\n");
    }

    #[test]
    fn decode_stream_strips_line_endings() {
        let cs = charset(AB, CodecOptions::default());
        let out: String = cs.decode_stream(["01\r\n", "10\n"]).collect();
        assert_eq!(out, "AB\nBA\n");
    }

    #[test]
    fn shared_between_threads() {
        let cs = Charset::decimal(tolerant(1)).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let cs = &cs;
                    s.spawn(move || {
                        let line = format!("{i}{i}{i}");
                        let art = cs.encode_line(&line).unwrap();
                        cs.decode_text(&art)
                    })
                })
                .collect();
            for (i, h) in handles.into_iter().enumerate() {
                assert_eq!(h.join().unwrap(), format!("{i}{i}{i}\n"));
            }
        });
    }
}
