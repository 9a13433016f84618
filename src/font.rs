//! The font container: an index of glyph blocks plus the bitmap store.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use crate::block::{Block, FullBlock, SparseBlock};
use crate::chunk::{self, Chunks};
use crate::error::Error;

/// An in-memory Celones Font.
///
/// The container pairs an index of [`Block`]s, keyed by block prefix,
/// with a single byte buffer holding every glyph bitmap back to back.
/// Lookup is infallible: a codepoint with no glyph, or one whose block
/// points outside the bitmap store, resolves to the empty bitmap.
///
/// Blocks are kept and serialized in ascending prefix order, so storing
/// the same container twice produces identical bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CelonesFont {
    blocks: BTreeMap<u16, Block>,
    bitmap: Vec<u8>,
}

impl CelonesFont {
    /// Creates an empty font with no blocks and no bitmap data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and decodes a font file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or any decoding
    /// error described on [`Self::from_bytes`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Decodes a font from its container bytes.
    ///
    /// Unrecognized chunks are skipped and absent chunks are treated as
    /// empty, so a bare `RIFF`/`CeFo` shell decodes to an empty font.
    /// When two blocks claim the same prefix, the later one wins, with
    /// sparse headers processed after full records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRiff`] or [`Error::NotCelonesFont`] on a bad
    /// magic or form tag, and [`Error::Truncated`] if the chunk stream
    /// ends early, a block chunk has a ragged length, or a sparse block
    /// points outside the entry side array.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let chunks = chunk::split(data)?;

        if chunks.fblk.len() % FullBlock::SIZE != 0 {
            return Err(Error::Truncated("full block records"));
        }
        if chunks.sblk.len() % SparseBlock::SIZE != 0 {
            return Err(Error::Truncated("sparse block headers"));
        }

        let mut blocks = BTreeMap::new();
        for rec in chunks.fblk.chunks_exact(FullBlock::SIZE) {
            let block = FullBlock::decode(rec)?;
            blocks.insert(block.prefix, Block::Full(block));
        }
        for header in chunks.sblk.chunks_exact(SparseBlock::SIZE) {
            let block = SparseBlock::decode(header, chunks.sgly)?;
            blocks.insert(block.prefix, Block::Sparse(block));
        }

        debug!(
            "loaded {} blocks, {} bitmap bytes",
            blocks.len(),
            chunks.bmp.len()
        );

        Ok(CelonesFont {
            blocks,
            bitmap: chunks.bmp.to_vec(),
        })
    }

    /// Encodes the font and writes it to a file.
    ///
    /// # Errors
    ///
    /// Returns any encoding error described on [`Self::to_bytes`], or an
    /// I/O error if the file cannot be written.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let data = self.to_bytes()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Encodes the font into container bytes.
    ///
    /// Blocks are written in ascending prefix order and sparse entries
    /// are packed into the side array in that same order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOverflow`] if any block field outgrows its
    /// bit width, [`Error::EmptyBlock`] for a sparse block with no
    /// entries, and [`Error::DuplicateSlot`] if a sparse block lists a
    /// slot twice.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut fblk = Vec::new();
        let mut sblk = Vec::new();
        let mut sgly: Vec<u8> = Vec::new();

        for block in self.blocks.values() {
            match block {
                Block::Full(full) => fblk.extend_from_slice(&full.encode()?),
                Block::Sparse(sparse) => {
                    let (header, entries) = sparse.encode(sgly.len() as u32)?;
                    sblk.extend_from_slice(&header);
                    sgly.extend_from_slice(&entries);
                }
            }
        }

        Ok(chunk::join(&Chunks {
            fblk: &fblk,
            sblk: &sblk,
            sgly: &sgly,
            bmp: &self.bitmap,
        }))
    }

    /// Looks up the bitmap of one codepoint.
    ///
    /// Returns the empty slice if the codepoint's block is absent, its
    /// slot has no entry, or the block's range points outside the
    /// bitmap store.
    #[must_use]
    pub fn get(&self, codepoint: u16) -> &[u8] {
        let prefix = codepoint >> 4;
        let slot = (codepoint & 0xF) as u8;

        let Some(block) = self.blocks.get(&prefix) else {
            return &[];
        };
        let Some((start, len)) = block.glyph_range(slot) else {
            return &[];
        };

        self.bitmap.get(start..start + len).unwrap_or(&[])
    }

    /// Concatenates the glyphs of `text`, one zero column between
    /// consecutive characters.
    ///
    /// Characters with no glyph, including anything above U+FFFF,
    /// contribute an empty bitmap but still get their separator.
    #[must_use]
    pub fn render(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            if i > 0 {
                out.push(0);
            }
            let glyph = match u16::try_from(u32::from(ch)) {
                Ok(codepoint) => self.get(codepoint),
                Err(_) => &[],
            };
            out.extend_from_slice(glyph);
        }
        out
    }

    /// Inserts a block, replacing any existing block with the same
    /// prefix.
    pub fn insert_block(&mut self, block: impl Into<Block>) {
        let block = block.into();
        self.blocks.insert(block.prefix(), block);
    }

    /// Replaces the bitmap store.
    pub fn set_bitmap(&mut self, bitmap: Vec<u8>) {
        self.bitmap = bitmap;
    }

    /// The raw bitmap store.
    #[must_use]
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Iterates the index blocks in ascending prefix order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.values()
    }

    /// Iterates `(codepoint, bitmap)` pairs in index order.
    ///
    /// Full blocks yield all 16 slots, empty ones included; sparse
    /// blocks yield their entries in stored order. Ranges that point
    /// outside the bitmap store yield the empty bitmap.
    pub fn glyphs(&self) -> impl Iterator<Item = (u16, &[u8])> + '_ {
        self.blocks.values().flat_map(|block| {
            let base = block.prefix() << 4;
            let mut glyphs = Vec::new();
            match block {
                Block::Full(full) => {
                    let mut start = full.offset as usize;
                    for (slot, &width) in full.widths.iter().enumerate() {
                        let len = usize::from(width);
                        let bitmap = self.bitmap.get(start..start + len).unwrap_or(&[]);
                        glyphs.push((base | slot as u16, bitmap));
                        start += len;
                    }
                }
                Block::Sparse(sparse) => {
                    let mut start = sparse.offset as usize;
                    for &(slot, width) in &sparse.entries {
                        let len = usize::from(width);
                        let bitmap = self.bitmap.get(start..start + len).unwrap_or(&[]);
                        glyphs.push((base | u16::from(slot), bitmap));
                        start += len;
                    }
                }
            }
            glyphs
        })
    }
}
