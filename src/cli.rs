//! Shared glue for the command line tools: inventory reports and the
//! preview sheet rasterizer.

use std::fmt::Write;

use serde::Serialize;

use crate::block::Block;
use crate::font::CelonesFont;

/// One row of a [`FontReport`], describing a single index block.
#[derive(Debug, Serialize)]
pub struct BlockReport {
    /// The block prefix.
    pub prefix: u16,
    /// `"full"` or `"sparse"`.
    pub kind: &'static str,
    /// Populated slots out of 16: nonzero-width slots of a full block,
    /// listed entries of a sparse one.
    pub slots: usize,
    /// Bitmap bytes the block references.
    pub bytes: usize,
}

/// Inventory of a font's index blocks, plus store-wide totals.
#[derive(Debug, Serialize)]
pub struct FontReport {
    /// Populated glyph slots across the reported blocks.
    pub glyphs: usize,
    /// Bitmap bytes the reported blocks reference.
    pub glyph_bytes: usize,
    /// Total size of the bitmap store, including unreferenced bytes.
    pub bitmap_bytes: usize,
    /// Per-block rows in ascending prefix order.
    pub blocks: Vec<BlockReport>,
}

impl FontReport {
    /// Reports on every block of the font.
    #[must_use]
    pub fn new(font: &CelonesFont) -> Self {
        Self::for_range(font, 0, 0xFFFF)
    }

    /// Reports on the blocks whose codepoints intersect
    /// `first..=last`. Store-wide totals are unaffected by the filter.
    #[must_use]
    pub fn for_range(font: &CelonesFont, first: u16, last: u16) -> Self {
        let mut blocks = Vec::new();
        for block in font.blocks() {
            let lo = block.prefix() << 4;
            let hi = lo | 0xF;
            if hi < first || lo > last {
                continue;
            }

            let (kind, slots, bytes) = match block {
                Block::Full(full) => (
                    "full",
                    full.widths.iter().filter(|&&w| w != 0).count(),
                    full.widths.iter().map(|&w| usize::from(w)).sum(),
                ),
                Block::Sparse(sparse) => (
                    "sparse",
                    sparse.entries.len(),
                    sparse.entries.iter().map(|&(_, w)| usize::from(w)).sum(),
                ),
            };
            blocks.push(BlockReport {
                prefix: block.prefix(),
                kind,
                slots,
                bytes,
            });
        }

        FontReport {
            glyphs: blocks.iter().map(|b| b.slots).sum(),
            glyph_bytes: blocks.iter().map(|b| b.bytes).sum(),
            bitmap_bytes: font.bitmap().len(),
            blocks,
        }
    }

    /// Formats the report as aligned text, one block per line, with a
    /// closing totals line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let _ = writeln!(
                out,
                "{}  {:6}  {:2}/16  {:5.1}%  {:5}",
                block_label(block.prefix),
                block.kind,
                block.slots,
                coverage(block.slots),
                block.bytes,
            );
        }
        let _ = writeln!(
            out,
            "{} blocks, {} glyphs, {} of {} bitmap bytes referenced",
            self.blocks.len(),
            self.glyphs,
            self.glyph_bytes,
            self.bitmap_bytes,
        );
        out
    }

    /// Formats the report as a Markdown table.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "| {:14} | {:6} | {:>19} | {:>5} |", "Block", "Kind", "Coverage", "Bytes");
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            "-".repeat(14),
            "-".repeat(6),
            "-".repeat(19),
            "-".repeat(5),
        );
        for block in &self.blocks {
            let cov = format!("{:.1}% ({}/16)", coverage(block.slots), block.slots);
            let _ = writeln!(
                out,
                "| {:14} | {:6} | {cov:>19} | {:>5} |",
                block_label(block.prefix),
                block.kind,
                block.bytes,
            );
        }
        out
    }
}

fn block_label(prefix: u16) -> String {
    let lo = u32::from(prefix) << 4;
    format!("U+{lo:04X}..U+{:04X}", lo | 0xF)
}

fn coverage(slots: usize) -> f64 {
    100.0 * slots as f64 / 16.0
}

/// Expands a rendered column stream into a grayscale image, ink black
/// on white, `scale` pixels per bitmap pixel.
///
/// Bit `y` of a column byte is row `y` of the glyph, top down. An empty
/// stream yields a single blank column.
#[must_use]
pub fn render_sheet(columns: &[u8], scale: u32) -> image::GrayImage {
    let scale = scale.max(1);
    let width = columns.len().max(1) as u32 * scale;
    let mut sheet = image::ImageBuffer::new(width, 8 * scale);
    sheet.fill(0xFF);

    for (x, &column) in columns.iter().enumerate() {
        for y in 0..8u32 {
            if column >> y & 1 == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    *sheet.get_pixel_mut(x as u32 * scale + sx, y * scale + sy) =
                        image::Luma([0x00; 1]);
                }
            }
        }
    }

    sheet
}
