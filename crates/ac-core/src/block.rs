use crate::error::LayoutError;

/// One glyph: a `height × width` grid of characters stored row-major.
///
/// Equality and hashing are structural, so a `Block` can key the reverse
/// lookup table directly.
///
/// # Example
/// ```
/// use ac_core::block::Block;
/// let block = Block::from(" _ | ||_|");
/// assert_eq!(block.len(), 9);
/// assert_eq!(block.row(1, 3), &['|', ' ', '|']);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    cells: Box<[char]>,
}

impl Block {
    /// Build a block from its row-major cells.
    #[must_use]
    pub fn from_cells(cells: Vec<char>) -> Self {
        Self {
            cells: cells.into_boxed_slice(),
        }
    }

    /// Number of cells (`width * height`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for the zero-cell block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major cells.
    #[must_use]
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Row `index` of a block `width` cells wide.
    ///
    /// # Panics
    /// Panics if the row lies outside the block.
    #[must_use]
    pub fn row(&self, index: usize, width: usize) -> &[char] {
        &self.cells[index * width..(index + 1) * width]
    }

    /// Render the block alone, one newline-terminated line per row.
    ///
    /// # Example
    /// ```
    /// use ac_core::block::Block;
    /// let block = Block::from("abcd");
    /// assert_eq!(block.to_art(2), "ab\ncd\n");
    /// ```
    #[must_use]
    pub fn to_art(&self, width: usize) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.cells.len() / width.max(1));
        for row in self.cells.chunks(width.max(1)) {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

impl From<&str> for Block {
    fn from(s: &str) -> Self {
        Self::from_cells(s.chars().collect())
    }
}

/// Cut `height` art lines into consecutive `width`-wide column blocks.
///
/// Every line must be a multiple of `width` long and as long as line 0.
/// The last line alone may be shorter; it is padded with spaces.
///
/// # Errors
/// [`LayoutError::LineCount`] when `lines.len() != height`,
/// [`LayoutError::MalformedWidth`] or [`LayoutError::VariantWidth`] with the
/// 0-based offending line otherwise.
///
/// # Panics
/// Panics if `width` is zero.
///
/// # Example
/// ```
/// use ac_core::block::{Block, split_columns};
/// let blocks = split_columns(&["ab", "c"], 1, 2).unwrap();
/// assert_eq!(blocks, vec![Block::from("ac"), Block::from("b ")]);
/// ```
pub fn split_columns<S: AsRef<str>>(
    lines: &[S],
    width: usize,
    height: usize,
) -> Result<Vec<Block>, LayoutError> {
    assert!(width > 0, "block width must be positive");
    if lines.len() != height {
        return Err(LayoutError::LineCount {
            found: lines.len(),
            expected: height,
        });
    }

    let mut rows: Vec<Vec<char>> = lines.iter().map(|l| l.as_ref().chars().collect()).collect();
    let mut expected = None;
    for (line, row) in rows.iter_mut().enumerate() {
        let len = row.len();
        if !len.is_multiple_of(width) {
            return Err(LayoutError::MalformedWidth { line, len, width });
        }
        let expected = *expected.get_or_insert(len);
        if len != expected {
            // Dernière ligne plus courte : complétée par des blancs.
            if line + 1 == height && len < expected {
                row.resize(expected, ' ');
            } else {
                return Err(LayoutError::VariantWidth {
                    line,
                    len,
                    expected,
                });
            }
        }
    }

    Ok(transpose(&rows, width))
}

/// Best-effort variant of [`split_columns`] that never fails.
///
/// Missing lines count as empty, extra lines are ignored and every line is
/// space-padded to the longest one rounded up to a multiple of `width`.
///
/// # Panics
/// Panics if `width` is zero.
#[must_use]
pub fn split_columns_lenient<S: AsRef<str>>(lines: &[S], width: usize, height: usize) -> Vec<Block> {
    assert!(width > 0, "block width must be positive");
    let mut rows: Vec<Vec<char>> = lines
        .iter()
        .take(height)
        .map(|l| l.as_ref().chars().collect())
        .collect();
    rows.resize_with(height, Vec::new);

    let longest = rows.iter().map(Vec::len).max().unwrap_or(0);
    let target = longest.div_ceil(width) * width;
    for row in &mut rows {
        row.resize(target, ' ');
    }
    transpose(&rows, width)
}

/// Concatenate block `i` of every row into glyph `i`.
///
/// All rows must already share the same length.
fn transpose(rows: &[Vec<char>], width: usize) -> Vec<Block> {
    let count = rows.first().map_or(0, |r| r.len() / width);
    (0..count)
        .map(|i| {
            let start = i * width;
            Block::from_cells(
                rows.iter()
                    .flat_map(|r| r[start..start + width].iter().copied())
                    .collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposes_columns_into_blocks() {
        let blocks = split_columns(&[" _  _ ", "| | _|"], 3, 2).unwrap();
        assert_eq!(blocks, vec![Block::from(" _ | |"), Block::from(" _  _|")]);
    }

    #[test]
    fn pads_short_last_line() {
        let blocks = split_columns(&["|_|  |", ""], 3, 2).unwrap();
        assert_eq!(blocks, vec![Block::from("|_|   "), Block::from("  |   ")]);
    }

    #[test]
    fn rejects_width_not_multiple() {
        let err = split_columns(&["abc", "abcd"], 3, 2).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MalformedWidth {
                line: 1,
                len: 4,
                width: 3
            }
        );
    }

    #[test]
    fn rejects_short_middle_line() {
        let err = split_columns(&["abcdef", "abc", "abcdef"], 3, 3).unwrap_err();
        assert_eq!(
            err,
            LayoutError::VariantWidth {
                line: 1,
                len: 3,
                expected: 6
            }
        );
    }

    #[test]
    fn rejects_long_last_line() {
        let err = split_columns(&["abc", "abcdef"], 3, 2).unwrap_err();
        assert!(matches!(err, LayoutError::VariantWidth { line: 1, .. }));
    }

    #[test]
    fn rejects_wrong_line_count() {
        let err = split_columns(&["ab"], 1, 2).unwrap_err();
        assert_eq!(
            err,
            LayoutError::LineCount {
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn empty_lines_give_no_blocks() {
        assert!(split_columns(&["", ""], 3, 2).unwrap().is_empty());
    }

    #[test]
    fn lenient_split_pads_everything() {
        let blocks = split_columns_lenient(&["abcd", "ef"], 3, 3);
        assert_eq!(
            blocks,
            vec![Block::from("abcef    "), Block::from("d        ")]
        );
    }

    #[test]
    fn rows_render_back_to_art() {
        let block = Block::from(" _ |_|");
        assert_eq!(block.row(0, 3), &[' ', '_', ' ']);
        assert_eq!(block.to_art(3), " _ \n|_|\n");
    }
}
