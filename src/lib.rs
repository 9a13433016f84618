//! De-/serialization, lookup, and assembly for Celones Font (`.cefo`)
//! bitmap font containers.
//!
//! A container is a RIFF file carrying an index of glyph blocks and one
//! shared bitmap store. Each block covers the 16 codepoints that share a
//! 12-bit prefix, either as a dense record of all 16 slot widths or as a
//! sparse list of the occupied slots. Glyph bitmaps are stored one byte
//! per column, eight rows tall, with the least significant bit on top.
//!
//! # Usage
//! ## Assembling a font
//! ```
//! # fn test() -> Result<(), cefo::Error> {
//! use cefo::FontBuilder;
//!
//! let mut builder = FontBuilder::new();
//! // one byte per bitmap column, up to 15 columns per glyph
//! builder.insert(0x41, vec![0x7C, 0x12, 0x11, 0x12, 0x7C])?;
//! builder.insert(0x42, vec![0x7F, 0x49, 0x49, 0x49, 0x36])?;
//!
//! let font = builder.build()?;
//! let bytes = font.to_bytes()?;
//! # Ok(())
//! # }
//! # test().unwrap();
//! ```
//!
//! ## Reading one back
//! ```
//! # fn test() -> Result<(), cefo::Error> {
//! # let mut builder = cefo::FontBuilder::new();
//! # builder.insert(0x41, vec![0x7C, 0x12, 0x11, 0x12, 0x7C])?;
//! # let bytes = builder.build()?.to_bytes()?;
//! let font = cefo::CelonesFont::from_bytes(&bytes)?;
//!
//! assert_eq!(font.get(0x41), &[0x7C, 0x12, 0x11, 0x12, 0x7C]);
//! assert_eq!(font.get(0x5A), &[]); // no glyph: the empty bitmap
//!
//! // one zero column between consecutive characters
//! let line = font.render("AA");
//! assert_eq!(line.len(), 11);
//! # Ok(())
//! # }
//! # test().unwrap();
//! ```

#![cfg_attr(docs_rs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

mod block;
mod builder;
mod chunk;
mod error;
mod font;

pub use block::{Block, FullBlock, SparseBlock};
pub use builder::FontBuilder;
pub use error::Error;
pub use font::CelonesFont;

#[cfg(feature = "bin")]
mod cli;

#[cfg(feature = "bin")]
#[cfg_attr(docs_rs, doc(cfg(feature = "bin")))]
pub use cli::{render_sheet, BlockReport, FontReport};
