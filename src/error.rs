//! Errors reported by the container codec.

use thiserror::Error;

/// Errors that can occur while loading, building, or storing a font.
#[derive(Debug, Error)]
pub enum Error {
    /// The file does not start with the `RIFF` magic bytes.
    #[error("not a RIFF file: bad magic")]
    NotRiff,

    /// The RIFF form tag is not `CeFo`.
    #[error("not a Celones Font: bad form tag")]
    NotCelonesFont,

    /// The byte stream ended in the middle of the named structure.
    #[error("truncated data while reading {0}")]
    Truncated(&'static str),

    /// A value does not fit the bit width of its on-disk field.
    #[error("{field} {value:#x} exceeds field limit {limit:#x}")]
    RangeOverflow {
        /// Name of the on-disk field.
        field: &'static str,
        /// The value that was rejected.
        value: u32,
        /// Largest value the field can hold.
        limit: u32,
    },

    /// A sparse block with no occupied slots cannot be stored.
    #[error("sparse block {0:#05x} has no entries")]
    EmptyBlock(u16),

    /// Two glyphs claim the same slot of the same block.
    #[error("duplicate slot {slot:#x} in block {prefix:#05x}")]
    DuplicateSlot {
        /// Prefix of the affected block.
        prefix: u16,
        /// The slot claimed twice.
        slot: u8,
    },

    /// An underlying file read or write failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
