use clap::Parser;

use cefo::{render_sheet, CelonesFont};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the font file to render with
    font_path: String,
    /// Text to render
    text: String,
    /// Path to where the output image should be written
    img_path: String,
    /// Number of image pixels per bitmap pixel
    #[arg(short, long, default_value_t = 4)]
    scale: u32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let font = CelonesFont::load(&args.font_path).expect("Failed to read font file");

    if args.text.is_empty() {
        eprintln!("Nothing to render: empty text");
        return;
    }

    for ch in args.text.chars() {
        let missing = match u16::try_from(u32::from(ch)) {
            Ok(codepoint) => font.get(codepoint).is_empty(),
            Err(_) => true,
        };
        if missing && !ch.is_whitespace() {
            eprintln!("No glyph for non-whitespace character {:x}", u32::from(ch));
        }
    }

    let columns = font.render(&args.text);
    let sheet = render_sheet(&columns, args.scale);
    sheet.save(args.img_path).expect("Failed to write output image");

    println!("Ok.");
}
