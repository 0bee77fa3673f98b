/// Charset engine for asciiart.
///
/// Loads block-glyph charset definitions, encodes text lines into stacked
/// glyph blocks and decodes glyph art back into text with a
/// nearest-match fallback for damaged blocks.

pub mod block;
pub mod charset;
pub mod codec;
pub mod config;
pub mod definition;
pub mod distance;
pub mod error;

pub use block::Block;
pub use charset::{Charset, CodecOptions, Resolution};
pub use codec::{DecodeStream, DecodedLine, EncodeStream};
pub use config::CodecConfig;
pub use definition::CharsetDefinition;
pub use distance::{BlockDistance, Hamming};
pub use error::{DefinitionError, EncodeError, LayoutError};
