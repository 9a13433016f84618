//! Index block records: the two on-disk encodings of a 16-slot glyph group.

use crate::error::Error;

/// Densely packed index record covering all 16 slots of its prefix.
///
/// On disk this is a 12-byte record: a little-endian `u32` holding the
/// block prefix in the low 12 bits and the bitmap offset in the high 20
/// bits, followed by a little-endian `u64` of sixteen packed 4-bit glyph
/// widths, where width `i` sits at bits `4*i..4*i+4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullBlock {
    /// High 12 bits of the codepoints this block covers.
    pub prefix: u16,
    /// Byte offset of slot 0's bitmap in the bitmap store.
    pub offset: u32,
    /// Column width of each slot's bitmap; zero means an empty glyph.
    pub widths: [u8; 16],
}

impl FullBlock {
    /// Encoded size of one record in bytes.
    pub const SIZE: usize = 12;

    /// Decodes one record from the front of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if fewer than [`Self::SIZE`] bytes
    /// are available.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Self::SIZE {
            return Err(Error::Truncated("full block record"));
        }

        let packed = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let packed_widths = u64::from_le_bytes([
            bytes[4], bytes[5], bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11],
        ]);

        let mut widths = [0u8; 16];
        for (i, width) in widths.iter_mut().enumerate() {
            *width = ((packed_widths >> (4 * i)) & 0xF) as u8;
        }

        Ok(FullBlock {
            prefix: (packed & 0xFFF) as u16,
            offset: packed >> 12,
            widths,
        })
    }

    /// Encodes the record into its 12-byte on-disk form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOverflow`] if the prefix, offset, or any
    /// width does not fit its bit field.
    pub fn encode(&self) -> Result<[u8; Self::SIZE], Error> {
        if self.prefix > 0xFFF {
            return Err(Error::RangeOverflow {
                field: "block prefix",
                value: u32::from(self.prefix),
                limit: 0xFFF,
            });
        }
        if self.offset > 0xF_FFFF {
            return Err(Error::RangeOverflow {
                field: "bitmap offset",
                value: self.offset,
                limit: 0xF_FFFF,
            });
        }

        let mut packed_widths = 0u64;
        for (i, &width) in self.widths.iter().enumerate() {
            if width > 0xF {
                return Err(Error::RangeOverflow {
                    field: "glyph width",
                    value: u32::from(width),
                    limit: 0xF,
                });
            }
            packed_widths |= u64::from(width) << (4 * i);
        }

        let mut rec = [0u8; Self::SIZE];
        rec[..4].copy_from_slice(&((self.offset << 12) | u32::from(self.prefix)).to_le_bytes());
        rec[4..].copy_from_slice(&packed_widths.to_le_bytes());
        Ok(rec)
    }
}

/// Index record listing only the occupied slots of its prefix.
///
/// On disk this is a 6-byte header of three little-endian `u16`s: the
/// entry count in the high 4 bits of the first word and the block prefix
/// in its low 12 bits, then the bitmap offset, then the byte offset of
/// this block's entries in the shared `sgly` side array. Each side-array
/// entry is one byte holding the slot in its high nibble and the glyph
/// width in its low nibble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseBlock {
    /// High 12 bits of the codepoints this block covers.
    pub prefix: u16,
    /// Byte offset of the first entry's bitmap in the bitmap store.
    pub offset: u32,
    /// Occupied `(slot, width)` pairs in side-array order.
    pub entries: Vec<(u8, u8)>,
}

impl SparseBlock {
    /// Encoded size of the header in bytes, not counting side-array entries.
    pub const SIZE: usize = 6;

    /// Decodes one header from the front of `bytes`, resolving its entries
    /// against the shared `sgly` side array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if the header is short or the entry
    /// range falls outside `sgly`.
    pub fn decode(bytes: &[u8], sgly: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Self::SIZE {
            return Err(Error::Truncated("sparse block header"));
        }

        let packed = u16::from_le_bytes([bytes[0], bytes[1]]);
        let offset = u16::from_le_bytes([bytes[2], bytes[3]]);
        let sgly_offset = u16::from_le_bytes([bytes[4], bytes[5]]);

        let count = usize::from(packed >> 12);
        let start = usize::from(sgly_offset);
        let Some(raw) = sgly.get(start..start + count) else {
            return Err(Error::Truncated("sparse glyph entries"));
        };

        Ok(SparseBlock {
            prefix: packed & 0xFFF,
            offset: u32::from(offset),
            entries: raw.iter().map(|&b| (b >> 4, b & 0xF)).collect(),
        })
    }

    /// Encodes the header and side-array entries, placing the entries at
    /// byte offset `sgly_offset` of the shared side array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBlock`] for a block with no entries,
    /// [`Error::DuplicateSlot`] if two entries claim the same slot, and
    /// [`Error::RangeOverflow`] if any field does not fit its bit width.
    pub fn encode(&self, sgly_offset: u32) -> Result<([u8; Self::SIZE], Vec<u8>), Error> {
        if self.entries.is_empty() {
            return Err(Error::EmptyBlock(self.prefix));
        }
        if self.entries.len() > 15 {
            return Err(Error::RangeOverflow {
                field: "entry count",
                value: self.entries.len() as u32,
                limit: 15,
            });
        }
        if self.prefix > 0xFFF {
            return Err(Error::RangeOverflow {
                field: "block prefix",
                value: u32::from(self.prefix),
                limit: 0xFFF,
            });
        }
        if self.offset > 0xFFFF {
            return Err(Error::RangeOverflow {
                field: "bitmap offset",
                value: self.offset,
                limit: 0xFFFF,
            });
        }
        if sgly_offset > 0xFFFF {
            return Err(Error::RangeOverflow {
                field: "entry array offset",
                value: sgly_offset,
                limit: 0xFFFF,
            });
        }

        let mut seen = 0u16;
        let mut raw = Vec::with_capacity(self.entries.len());
        for &(slot, width) in &self.entries {
            if slot > 0xF {
                return Err(Error::RangeOverflow {
                    field: "glyph slot",
                    value: u32::from(slot),
                    limit: 0xF,
                });
            }
            if width > 0xF {
                return Err(Error::RangeOverflow {
                    field: "glyph width",
                    value: u32::from(width),
                    limit: 0xF,
                });
            }
            if seen & (1 << slot) != 0 {
                return Err(Error::DuplicateSlot {
                    prefix: self.prefix,
                    slot,
                });
            }
            seen |= 1 << slot;
            raw.push((slot << 4) | width);
        }

        let count = self.entries.len() as u16;
        let mut header = [0u8; Self::SIZE];
        header[..2].copy_from_slice(&((count << 12) | self.prefix).to_le_bytes());
        header[2..4].copy_from_slice(&(self.offset as u16).to_le_bytes());
        header[4..].copy_from_slice(&(sgly_offset as u16).to_le_bytes());
        Ok((header, raw))
    }
}

/// Either encoding of an index block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Dense record covering all 16 slots.
    Full(FullBlock),
    /// Header plus side-array entries for the occupied slots only.
    Sparse(SparseBlock),
}

impl Block {
    /// The block prefix, i.e. the high 12 bits of the covered codepoints.
    #[must_use]
    pub fn prefix(&self) -> u16 {
        match self {
            Block::Full(full) => full.prefix,
            Block::Sparse(sparse) => sparse.prefix,
        }
    }

    /// Resolves a slot to the `(start, len)` byte range of its bitmap.
    ///
    /// Only the low four bits of `slot` are significant. Returns `None`
    /// for a slot with no entry; a present slot of width zero resolves
    /// to an empty range.
    #[must_use]
    pub fn glyph_range(&self, slot: u8) -> Option<(usize, usize)> {
        let slot = slot & 0xF;
        match self {
            Block::Full(full) => {
                let skipped: usize = full.widths[..usize::from(slot)]
                    .iter()
                    .map(|&w| usize::from(w))
                    .sum();
                let len = usize::from(full.widths[usize::from(slot)]);
                Some((full.offset as usize + skipped, len))
            }
            Block::Sparse(sparse) => {
                let mut start = sparse.offset as usize;
                for &(entry_slot, width) in &sparse.entries {
                    if entry_slot == slot {
                        return Some((start, usize::from(width)));
                    }
                    start += usize::from(width);
                }
                None
            }
        }
    }
}

impl From<FullBlock> for Block {
    fn from(block: FullBlock) -> Self {
        Block::Full(block)
    }
}

impl From<SparseBlock> for Block {
    fn from(block: SparseBlock) -> Self {
        Block::Sparse(block)
    }
}
