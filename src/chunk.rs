//! RIFF chunk layer: splits a container file into tagged payloads and back.

use log::debug;

use crate::error::Error;

const RIFF_MAGIC: [u8; 4] = *b"RIFF";
const FORM_TAG: [u8; 4] = *b"CeFo";

const TAG_FBLK: [u8; 4] = *b"fblk";
const TAG_SBLK: [u8; 4] = *b"sblk";
const TAG_SGLY: [u8; 4] = *b"sgly";
const TAG_BMP: [u8; 4] = *b"bmp ";

/// The recognized chunk payloads of one container, borrowed from the
/// input buffer. A chunk that is absent from the file is an empty slice.
#[derive(Debug, Default)]
pub struct Chunks<'a> {
    /// Full block records, 12 bytes each.
    pub fblk: &'a [u8],
    /// Sparse block headers, 6 bytes each.
    pub sblk: &'a [u8],
    /// Shared sparse entry side array, 1 byte per entry.
    pub sgly: &'a [u8],
    /// Bitmap store.
    pub bmp: &'a [u8],
}

/// Splits a container file into its recognized chunks.
///
/// Chunks with unrecognized tags are skipped; of duplicate recognized
/// tags the later chunk wins. Bytes past the declared total size are
/// ignored.
pub fn split(data: &[u8]) -> Result<Chunks<'_>, Error> {
    let header = data.get(..8).ok_or(Error::Truncated("RIFF header"))?;
    if header[..4] != RIFF_MAGIC {
        return Err(Error::NotRiff);
    }
    let total = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    if total < 4 {
        return Err(Error::Truncated("form tag"));
    }

    let form = data.get(8..12).ok_or(Error::Truncated("form tag"))?;
    if form != FORM_TAG {
        return Err(Error::NotCelonesFont);
    }

    // the size field counts the form tag plus all chunks
    let end = 8 + total;
    let mut pos = 12;
    let mut chunks = Chunks::default();

    while pos < end {
        let header = data
            .get(pos..pos + 8)
            .ok_or(Error::Truncated("chunk header"))?;
        let tag = [header[0], header[1], header[2], header[3]];
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let payload = data
            .get(pos + 8..pos + 8 + len)
            .ok_or(Error::Truncated("chunk payload"))?;

        match tag {
            TAG_FBLK => chunks.fblk = payload,
            TAG_SBLK => chunks.sblk = payload,
            TAG_SGLY => chunks.sgly = payload,
            TAG_BMP => chunks.bmp = payload,
            _ => debug!(
                "skipping unknown chunk '{}' ({len} bytes)",
                String::from_utf8_lossy(&tag)
            ),
        }

        pos += 8 + len;
    }

    Ok(chunks)
}

/// Assembles the chunks into a container file.
///
/// Chunks are written in fixed order. The bitmap payload is zero-padded
/// to an even length, and the padding byte is counted in the chunk's
/// length field.
pub fn join(chunks: &Chunks<'_>) -> Vec<u8> {
    let bmp_len = chunks.bmp.len() + chunks.bmp.len() % 2;
    let total =
        4 + 4 * 8 + chunks.fblk.len() + chunks.sblk.len() + chunks.sgly.len() + bmp_len;

    let mut out = Vec::with_capacity(8 + total);
    out.extend_from_slice(&RIFF_MAGIC);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&FORM_TAG);
    push_chunk(&mut out, TAG_FBLK, chunks.fblk, false);
    push_chunk(&mut out, TAG_SBLK, chunks.sblk, false);
    push_chunk(&mut out, TAG_SGLY, chunks.sgly, false);
    push_chunk(&mut out, TAG_BMP, chunks.bmp, true);
    out
}

fn push_chunk(out: &mut Vec<u8>, tag: [u8; 4], payload: &[u8], pad: bool) {
    let padded = payload.len() + usize::from(pad && payload.len() % 2 == 1);
    out.extend_from_slice(&tag);
    out.extend_from_slice(&(padded as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if padded > payload.len() {
        out.push(0);
    }
}
