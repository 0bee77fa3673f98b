use thiserror::Error;

/// Geometry errors raised while cutting a group of art lines into blocks.
///
/// Line numbers are 0-based within the group.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The group does not hold exactly `block_height` lines.
    #[error("Hauteur de ligne invalide : {found} lignes, {expected} attendues")]
    LineCount {
        /// Lines received.
        found: usize,
        /// Lines expected (the block height).
        expected: usize,
    },

    /// A line length is not a multiple of the block width.
    #[error("[{line:03}] Largeur invalide ({len} n'est pas un multiple de {width})")]
    MalformedWidth {
        /// Offending line.
        line: usize,
        /// Its length in characters.
        len: usize,
        /// Block width.
        width: usize,
    },

    /// A line does not describe the same number of blocks as the first one.
    #[error("[{line:03}] Largeur variable ({len} caractères, {expected} attendus)")]
    VariantWidth {
        /// Offending line.
        line: usize,
        /// Its length in characters.
        len: usize,
        /// Length of line 0.
        expected: usize,
    },
}

/// Errors raised while building a [`crate::Charset`].
///
/// Construction is atomic: on any of these no charset exists.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The definition source could not be read.
    #[error("Lecture du charset impossible : {0}")]
    Io(#[from] std::io::Error),

    /// One of the three header lines is missing.
    #[error("[{line:03}] Ligne d'en-tête manquante")]
    MissingHeader {
        /// 0-based line of the definition file.
        line: usize,
    },

    /// A dimension line is not a non-negative integer.
    #[error("[{line:03}] Dimension invalide : {value:?}")]
    InvalidNumber {
        /// 0-based line of the definition file.
        line: usize,
        /// Raw text found.
        value: String,
    },

    /// Width or height is zero.
    #[error("Dimensions invalides : {width}×{height}")]
    ZeroDimension {
        /// Block width.
        width: usize,
        /// Block height.
        height: usize,
    },

    /// The drawing lines are malformed.
    #[error("Dessin du charset invalide : {0}")]
    Layout(#[from] LayoutError),

    /// Drawing blocks and representative characters disagree in number.
    #[error("Charset invalide : {blocks} dessins pour {chars} caractères")]
    CountMismatch {
        /// Representative characters.
        chars: usize,
        /// Blocks cut from the drawing.
        blocks: usize,
    },

    /// Two characters share the same drawing.
    #[error("Charset invalide : collision entre les dessins de {first:?} et {second:?}")]
    Collision {
        /// Character registered first.
        first: char,
        /// Character that reused its block.
        second: char,
    },
}

/// Errors raised while encoding text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The character has no glyph in the charset.
    #[error("Caractère invalide : {ch:?} (ascii {code_point}) en colonne {column}")]
    UnknownCharacter {
        /// The character.
        ch: char,
        /// Its Unicode scalar value.
        code_point: u32,
        /// 0-based character index within the line.
        column: usize,
    },
}

impl EncodeError {
    pub(crate) fn unknown(ch: char, column: usize) -> Self {
        Self::UnknownCharacter {
            ch,
            code_point: u32::from(ch),
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_error_reports_line_number() {
        let err = LayoutError::MalformedWidth {
            line: 2,
            len: 7,
            width: 3,
        };
        assert!(err.to_string().starts_with("[002]"));
    }

    #[test]
    fn unknown_character_carries_code_point() {
        let err = EncodeError::unknown('A', 4);
        assert_eq!(
            err,
            EncodeError::UnknownCharacter {
                ch: 'A',
                code_point: 65,
                column: 4
            }
        );
        assert!(err.to_string().contains("65"));
    }
}
