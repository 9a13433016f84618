use std::collections::BTreeMap;

use cefo::{CelonesFont, FontBuilder, FullBlock};
use proptest::prelude::*;

fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn container(chunks: &[Vec<u8>]) -> Vec<u8> {
    let total = 4 + chunks.iter().map(Vec::len).sum::<usize>();
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(b"CeFo");
    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

fn counting_bitmap(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// 96 printable ASCII glyphs with per-codepoint widths, six full blocks.
fn ascii_font() -> CelonesFont {
    let mut builder = FontBuilder::new();
    for codepoint in 0x20..0x80u16 {
        let width = 1 + usize::from(codepoint % 5);
        builder.insert(codepoint, vec![codepoint as u8; width]).unwrap();
    }
    builder.build().unwrap()
}

#[test]
fn full_block_reference_container() {
    // prefix 0x041, bitmap offset 0x100, all 16 widths = 8
    let fblk = vec![
        0x41, 0x00, 0x10, 0x00, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88,
    ];
    let bitmap = counting_bitmap(0x100 + 16 * 8);
    let data = container(&[chunk(b"fblk", &fblk), chunk(b"bmp ", &bitmap)]);

    let font = CelonesFont::from_bytes(&data).unwrap();
    assert_eq!(font.get(0x0410), &bitmap[0x100..0x108]);
    assert_eq!(font.get(0x0415), &bitmap[0x128..0x130]);
    assert_eq!(font.get(0x041F), &bitmap[0x178..0x180]);
    assert_eq!(font.get(0x0420), &[]);
}

#[test]
fn sparse_block_reference_container() {
    // prefix 0x07A, two entries: slot 3 width 2, slot 5 width 4
    let sblk = vec![0x7A, 0x20, 0x50, 0x00, 0x00, 0x00];
    let sgly = vec![0x32, 0x54];
    let bitmap = counting_bitmap(0x56);
    let data = container(&[
        chunk(b"sblk", &sblk),
        chunk(b"sgly", &sgly),
        chunk(b"bmp ", &bitmap),
    ]);

    let font = CelonesFont::from_bytes(&data).unwrap();
    assert_eq!(font.get(0x07A3), &bitmap[0x50..0x52]);
    assert_eq!(font.get(0x07A5), &bitmap[0x52..0x56]);
    assert_eq!(font.get(0x07A4), &[]);
    assert_eq!(font.get(0x07B3), &[]);
}

#[test]
fn stored_layout_is_canonical() {
    let bitmap = counting_bitmap(0x180);
    let mut font = CelonesFont::new();
    font.insert_block(FullBlock {
        prefix: 0x041,
        offset: 0x100,
        widths: [8; 16],
    });
    font.set_bitmap(bitmap.clone());

    // fixed chunk order, empty chunks written out, size field covering all
    let expected = container(&[
        chunk(
            b"fblk",
            &[0x41, 0x00, 0x10, 0x00, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88],
        ),
        chunk(b"sblk", &[]),
        chunk(b"sgly", &[]),
        chunk(b"bmp ", &bitmap),
    ]);
    assert_eq!(font.to_bytes().unwrap(), expected);
}

#[test]
fn unknown_chunks_and_order_are_tolerated() {
    let sblk = vec![0x7A, 0x20, 0x50, 0x00, 0x00, 0x00];
    let sgly = vec![0x32, 0x54];
    let bitmap = counting_bitmap(0x56);

    let data = container(&[
        chunk(b"meta", b"made by nobody in particular"),
        chunk(b"bmp ", &bitmap),
        chunk(b"sgly", &sgly),
        chunk(b"LIST", &[0; 12]),
        chunk(b"sblk", &sblk),
    ]);

    let font = CelonesFont::from_bytes(&data).unwrap();
    assert_eq!(font.get(0x07A5), &bitmap[0x52..0x56]);
}

#[test]
fn ascii_font_end_to_end() {
    let font = ascii_font();

    let bytes = font.to_bytes().unwrap();
    let reloaded = CelonesFont::from_bytes(&bytes).unwrap();
    assert_eq!(reloaded, font);

    // 'H' is 0x48 = 72, width 1 + 72 % 5 = 3
    assert_eq!(reloaded.get(0x48), &[0x48; 3]);
    assert_eq!(reloaded.glyphs().count(), 96);

    let line = reloaded.render("Hi");
    let mut expected = vec![0x48; 3];
    expected.push(0);
    expected.extend_from_slice(&[0x69; 1 + 0x69 % 5]);
    assert_eq!(line, expected);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn built_font_survives_container_round_trip(
        glyphs in prop::collection::btree_map(
            any::<u16>(),
            prop::collection::vec(any::<u8>(), 0..=15),
            0..64,
        ),
    ) {
        let mut builder = FontBuilder::new();
        for (&codepoint, bitmap) in &glyphs {
            builder.insert(codepoint, bitmap.clone()).unwrap();
        }
        let font = builder.build().unwrap();

        for (&codepoint, bitmap) in &glyphs {
            prop_assert_eq!(font.get(codepoint), &bitmap[..]);
        }

        let bytes = font.to_bytes().unwrap();
        let reloaded = CelonesFont::from_bytes(&bytes).unwrap();
        for (&codepoint, bitmap) in &glyphs {
            prop_assert_eq!(reloaded.get(codepoint), &bitmap[..]);
        }

        // storing the reloaded font reproduces the file byte for byte
        prop_assert_eq!(reloaded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn lookup_misses_stay_empty(
        glyphs in prop::collection::btree_map(
            any::<u16>(),
            prop::collection::vec(any::<u8>(), 1..=15),
            0..32,
        ),
        probes in prop::collection::vec(any::<u16>(), 32),
    ) {
        let mut builder = FontBuilder::new();
        for (&codepoint, bitmap) in &glyphs {
            builder.insert(codepoint, bitmap.clone()).unwrap();
        }
        let font = builder.build().unwrap();

        for codepoint in probes {
            let glyph = font.get(codepoint);
            match glyphs.get(&codepoint) {
                Some(bitmap) => prop_assert_eq!(glyph, &bitmap[..]),
                None => prop_assert!(glyph.is_empty()),
            }
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic_the_loader(
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        // errors are fine, panics are not
        let _ = CelonesFont::from_bytes(&data);
    }

    #[test]
    fn render_joins_exact_widths(text in "[ -\u{7f}]{0,40}") {
        let font = ascii_font();

        let rendered_len = font.render(&text).len();
        let glyph_total: usize = text
            .chars()
            .map(|ch| font.get(ch as u16).len())
            .sum();
        let separators = text.chars().count().saturating_sub(1);
        prop_assert_eq!(rendered_len, glyph_total + separators);
    }

    #[test]
    fn glyph_stream_agrees_with_lookup(
        glyphs in prop::collection::btree_map(
            any::<u16>(),
            prop::collection::vec(any::<u8>(), 1..=15),
            1..48,
        ),
    ) {
        let mut builder = FontBuilder::new();
        for (&codepoint, bitmap) in &glyphs {
            builder.insert(codepoint, bitmap.clone()).unwrap();
        }
        let font = builder.build().unwrap();

        let mut seen = BTreeMap::new();
        for (codepoint, bitmap) in font.glyphs() {
            prop_assert_eq!(bitmap, font.get(codepoint));
            seen.insert(codepoint, bitmap.to_vec());
        }

        // every inserted glyph comes back out of the stream
        for (&codepoint, bitmap) in &glyphs {
            prop_assert_eq!(seen.get(&codepoint), Some(bitmap));
        }
    }
}
