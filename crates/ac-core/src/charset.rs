use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::io::BufRead;
use std::path::Path;

use crate::block::{Block, split_columns};
use crate::definition::CharsetDefinition;
use crate::distance::{BlockDistance, Hamming};
use crate::error::DefinitionError;

/// Character emitted for a block that resolves to nothing.
pub const DEFAULT_INVALID_CHAR: char = '?';

/// Marker appended to a decoded line holding an unresolved block.
pub const DEFAULT_ILLEGAL_SUFFIX: &str = " ILLEGAL";

/// Decode policy attached to a charset.
///
/// # Example
/// ```
/// use ac_core::charset::CodecOptions;
/// let options = CodecOptions::default();
/// assert_eq!(options.tolerance, 0);
/// assert_eq!(options.invalid_char, '?');
/// assert_eq!(options.illegal_suffix.as_deref(), Some(" ILLEGAL"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// Largest block distance still accepted as a fuzzy match. 0 = exact only.
    pub tolerance: usize,
    /// Appended verbatim to a decoded line with an unresolved block.
    pub illegal_suffix: Option<String>,
    /// Stands in for an unresolved block.
    pub invalid_char: char,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            tolerance: 0,
            illegal_suffix: Some(DEFAULT_ILLEGAL_SUFFIX.to_string()),
            invalid_char: DEFAULT_INVALID_CHAR,
        }
    }
}

/// Outcome of looking up an observed block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The block is a known glyph.
    Exact(char),
    /// Nearest glyph within tolerance.
    Fuzzy {
        /// Matched character.
        ch: char,
        /// Distance to its glyph.
        distance: usize,
    },
    /// Nothing within tolerance.
    Unresolved,
}

impl Resolution {
    /// The resolved character, or `invalid` when unresolved.
    #[must_use]
    pub fn char_or(self, invalid: char) -> char {
        match self {
            Self::Exact(ch) | Self::Fuzzy { ch, .. } => ch,
            Self::Unresolved => invalid,
        }
    }
}

/// A validated block-glyph charset: forward and reverse lookup tables plus
/// the decode policy.
///
/// Immutable after construction; share it freely between threads.
///
/// # Example
/// ```
/// use ac_core::charset::{Charset, CodecOptions};
/// use ac_core::block::Block;
///
/// let charset = Charset::parse("1\n1\nAB\n01\n", CodecOptions::default()).unwrap();
/// assert_eq!(charset.glyph('B'), Some(&Block::from("1")));
/// assert_eq!(charset.lookup(&Block::from("0")), Some('A'));
/// ```
pub struct Charset {
    block_width: usize,
    block_height: usize,
    /// Glyph table in first-occurrence order of each character.
    glyphs: Vec<(char, Block)>,
    index: HashMap<char, usize>,
    reverse: HashMap<Block, char>,
    options: CodecOptions,
    distance: Box<dyn BlockDistance>,
}

impl Charset {
    /// Validate a definition and build the lookup tables.
    ///
    /// A character listed twice keeps its first position in the glyph table
    /// and takes the later drawing.
    ///
    /// # Errors
    /// [`DefinitionError::Layout`] on a malformed drawing,
    /// [`DefinitionError::CountMismatch`] when blocks and characters disagree,
    /// [`DefinitionError::Collision`] when two characters share a drawing.
    pub fn new(definition: CharsetDefinition, options: CodecOptions) -> Result<Self, DefinitionError> {
        let CharsetDefinition {
            block_width,
            block_height,
            chars,
            drawing,
        } = definition;
        if block_width == 0 || block_height == 0 {
            return Err(DefinitionError::ZeroDimension {
                width: block_width,
                height: block_height,
            });
        }

        let blocks = split_columns(drawing.as_slice(), block_width, block_height)?;
        if blocks.len() != chars.len() {
            return Err(DefinitionError::CountMismatch {
                chars: chars.len(),
                blocks: blocks.len(),
            });
        }

        let mut glyphs: Vec<(char, Block)> = Vec::with_capacity(chars.len());
        let mut index: HashMap<char, usize> = HashMap::with_capacity(chars.len());
        for (ch, block) in chars.into_iter().zip(blocks) {
            if let Some(&slot) = index.get(&ch) {
                log::debug!("Caractère {ch:?} redéfini, le dernier dessin l'emporte");
                glyphs[slot].1 = block;
            } else {
                index.insert(ch, glyphs.len());
                glyphs.push((ch, block));
            }
        }

        let mut reverse = HashMap::with_capacity(glyphs.len());
        for (ch, block) in &glyphs {
            match reverse.entry(block.clone()) {
                Entry::Occupied(e) => {
                    return Err(DefinitionError::Collision {
                        first: *e.get(),
                        second: *ch,
                    });
                }
                Entry::Vacant(e) => {
                    e.insert(*ch);
                }
            }
        }

        log::info!(
            "Charset chargé : {} glyphes {}×{}, tolérance {}",
            glyphs.len(),
            block_width,
            block_height,
            options.tolerance
        );

        Ok(Self {
            block_width,
            block_height,
            glyphs,
            index,
            reverse,
            options,
            distance: Box::new(Hamming),
        })
    }

    /// Read and build a charset from a definition source.
    ///
    /// # Errors
    /// Any [`DefinitionError`], including I/O failures.
    pub fn from_reader<R: BufRead>(reader: R, options: CodecOptions) -> Result<Self, DefinitionError> {
        Self::new(CharsetDefinition::from_reader(reader)?, options)
    }

    /// Build a charset from definition text.
    ///
    /// # Errors
    /// Any [`DefinitionError`].
    pub fn parse(text: &str, options: CodecOptions) -> Result<Self, DefinitionError> {
        Self::new(CharsetDefinition::parse(text)?, options)
    }

    /// Load a charset file.
    ///
    /// # Errors
    /// Any [`DefinitionError`], including a missing file.
    pub fn from_path(path: &Path, options: CodecOptions) -> Result<Self, DefinitionError> {
        Self::new(CharsetDefinition::from_path(path)?, options)
    }

    /// The built-in seven-segment digits charset.
    ///
    /// # Errors
    /// Never fails in practice; the embedded definition is covered by tests.
    pub fn decimal(options: CodecOptions) -> Result<Self, DefinitionError> {
        Self::new(CharsetDefinition::decimal()?, options)
    }

    /// Replace the metric used by the fuzzy fallback (default [`Hamming`]).
    #[must_use]
    pub fn with_distance(mut self, distance: Box<dyn BlockDistance>) -> Self {
        self.distance = distance;
        self
    }

    /// Glyph width in characters.
    #[must_use]
    pub fn block_width(&self) -> usize {
        self.block_width
    }

    /// Glyph height in characters, i.e. art lines per text line.
    #[must_use]
    pub fn block_height(&self) -> usize {
        self.block_height
    }

    /// Number of distinct characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True when the charset defines no character.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Decode policy.
    #[must_use]
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Characters in glyph-table order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.glyphs.iter().map(|(ch, _)| *ch)
    }

    /// `(character, block)` pairs in glyph-table order.
    pub fn glyphs(&self) -> impl Iterator<Item = (char, &Block)> + '_ {
        self.glyphs.iter().map(|(ch, block)| (*ch, block))
    }

    /// Block drawn for `ch`.
    #[must_use]
    pub fn glyph(&self, ch: char) -> Option<&Block> {
        self.index.get(&ch).map(|&slot| &self.glyphs[slot].1)
    }

    /// Character whose glyph is exactly `block`.
    #[must_use]
    pub fn lookup(&self, block: &Block) -> Option<char> {
        self.reverse.get(block).copied()
    }

    /// All glyphs within tolerance of `block`, nearest first.
    ///
    /// Equal distances keep glyph-table order.
    #[must_use]
    pub fn candidates(&self, block: &Block) -> Vec<(char, usize)> {
        let mut found: Vec<(char, usize)> = self
            .glyphs
            .iter()
            .map(|(ch, glyph)| (*ch, self.distance.distance(glyph, block)))
            .filter(|&(_, d)| d <= self.options.tolerance)
            .collect();
        found.sort_by_key(|&(_, d)| d);
        found
    }

    /// Nearest glyph within tolerance; the earliest glyph wins a tie.
    #[must_use]
    pub fn nearest(&self, block: &Block) -> Option<(char, usize)> {
        self.glyphs
            .iter()
            .map(|(ch, glyph)| (*ch, self.distance.distance(glyph, block)))
            .filter(|&(_, d)| d <= self.options.tolerance)
            .min_by_key(|&(_, d)| d)
    }

    /// Resolve an observed block: exact lookup first, then the fuzzy fallback
    /// when the tolerance allows it.
    ///
    /// # Example
    /// ```
    /// use ac_core::charset::{Charset, CodecOptions, Resolution};
    /// use ac_core::block::Block;
    ///
    /// let options = CodecOptions { tolerance: 1, ..CodecOptions::default() };
    /// let charset = Charset::parse("2\n1\nAB\naabb\n", options).unwrap();
    /// assert_eq!(charset.resolve(&Block::from("aa")), Resolution::Exact('A'));
    /// assert_eq!(charset.resolve(&Block::from("xb")), Resolution::Fuzzy { ch: 'B', distance: 1 });
    /// assert_eq!(charset.resolve(&Block::from("xy")), Resolution::Unresolved);
    /// ```
    #[must_use]
    pub fn resolve(&self, block: &Block) -> Resolution {
        if let Some(ch) = self.lookup(block) {
            return Resolution::Exact(ch);
        }
        if self.options.tolerance == 0 {
            return Resolution::Unresolved;
        }
        match self.nearest(block) {
            Some((ch, distance)) => Resolution::Fuzzy { ch, distance },
            None => Resolution::Unresolved,
        }
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Charset")
            .field("block_width", &self.block_width)
            .field("block_height", &self.block_height)
            .field("chars", &self.chars().collect::<String>())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
