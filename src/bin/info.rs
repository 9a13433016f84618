use clap::Parser;

use cefo::{CelonesFont, FontReport};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the font file to inspect
    font_path: String,
    /// Restrict the report to a codepoint range written in hex, as in 20-7f
    #[arg(short, long)]
    range: Option<String>,
    /// Output a Markdown table
    #[arg(long)]
    md: bool,
    /// Output machine-readable JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let font = CelonesFont::load(&args.font_path).expect("Failed to read font file");

    let report = match args.range {
        None => FontReport::new(&font),
        Some(ref spec) => {
            let mut piece_iter = spec.split('-');
            let (Some(fst), Some(snd), None) =
                (piece_iter.next(), piece_iter.next(), piece_iter.next())
            else {
                print_range_help(spec);
                return;
            };

            let (Ok(first), Ok(last)) = (u16::from_str_radix(fst, 16), u16::from_str_radix(snd, 16))
            else {
                print_range_help(spec);
                return;
            };

            FontReport::for_range(&font, first, last)
        }
    };

    if args.json {
        let serialized =
            serde_json::to_string_pretty(&report).expect("Failed to serialize report");
        println!("{serialized}");
    } else if args.md {
        print!("{}", report.to_markdown());
    } else {
        print!("{}", report.to_text());
    }
}

fn print_range_help(spec: &str) {
    eprintln!("Error parsing codepoint range: {spec}");
    eprintln!("! Valid ranges are written as:");
    eprintln!("    [MIN_INCLUSIVE]-[MAX_INCLUSIVE]");
    eprintln!("Both codepoints in hex, with no prefix, i.e. as in 20-7f");
}
