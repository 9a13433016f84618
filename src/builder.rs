//! Assembling a font container from loose glyphs.

use std::collections::BTreeMap;

use crate::block::{FullBlock, SparseBlock};
use crate::error::Error;
use crate::font::CelonesFont;

/// Accumulates `codepoint -> bitmap` pairs and lays them out as a
/// [`CelonesFont`].
///
/// Glyphs are laid out in ascending codepoint order and grouped by
/// block prefix; a group occupying all 16 slots becomes a full block,
/// any other group a sparse block. Block offsets follow the global
/// concatenation order, so the resulting container is independent of
/// insertion order.
#[derive(Debug, Default)]
pub struct FontBuilder {
    glyphs: BTreeMap<u16, Vec<u8>>,
}

impl FontBuilder {
    /// Creates a builder with no glyphs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one glyph, one byte per bitmap column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOverflow`] for a bitmap wider than 15
    /// columns and [`Error::DuplicateSlot`] if the codepoint was
    /// already added.
    pub fn insert(&mut self, codepoint: u16, bitmap: Vec<u8>) -> Result<(), Error> {
        if bitmap.len() > 0xF {
            return Err(Error::RangeOverflow {
                field: "glyph width",
                value: bitmap.len() as u32,
                limit: 0xF,
            });
        }
        if self.glyphs.contains_key(&codepoint) {
            return Err(Error::DuplicateSlot {
                prefix: codepoint >> 4,
                slot: (codepoint & 0xF) as u8,
            });
        }

        self.glyphs.insert(codepoint, bitmap);
        Ok(())
    }

    /// Lays out the accumulated glyphs as a font container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOverflow`] if a block's bitmap offset
    /// outgrows its on-disk field, which happens when too much bitmap
    /// data precedes the block.
    pub fn build(self) -> Result<CelonesFont, Error> {
        let mut bitmap = Vec::new();
        let mut groups: BTreeMap<u16, (u32, Vec<(u8, u8)>)> = BTreeMap::new();

        for (codepoint, glyph) in self.glyphs {
            let prefix = codepoint >> 4;
            let slot = (codepoint & 0xF) as u8;
            let width = glyph.len() as u8;

            let (_, entries) = groups
                .entry(prefix)
                .or_insert_with(|| (bitmap.len() as u32, Vec::new()));
            entries.push((slot, width));
            bitmap.extend_from_slice(&glyph);
        }

        let mut font = CelonesFont::new();
        for (prefix, (offset, entries)) in groups {
            if entries.len() == 16 {
                if offset > 0xF_FFFF {
                    return Err(Error::RangeOverflow {
                        field: "bitmap offset",
                        value: offset,
                        limit: 0xF_FFFF,
                    });
                }
                let mut widths = [0u8; 16];
                for (slot, width) in entries {
                    widths[usize::from(slot)] = width;
                }
                font.insert_block(FullBlock {
                    prefix,
                    offset,
                    widths,
                });
            } else {
                if offset > 0xFFFF {
                    return Err(Error::RangeOverflow {
                        field: "bitmap offset",
                        value: offset,
                        limit: 0xFFFF,
                    });
                }
                font.insert_block(SparseBlock {
                    prefix,
                    offset,
                    entries,
                });
            }
        }

        font.set_bitmap(bitmap);
        Ok(font)
    }
}
