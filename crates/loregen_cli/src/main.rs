use std::error::Error;
use std::io::{Read as _, Write as _};

use clap::Parser;
use clio::{Input, Output};
use ipsumbot_model::WordDictionary;
use loregen;

/// CLI for parsing free text into a word dictionary
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File containing raw text to parse
    #[clap(long, short, value_parser, default_value = "-")]
    input: Input,

    /// File to write the dictionary JSON
    #[clap(long, short, value_parser, default_value = "-")]
    output: Output,

    /// Indent the JSON output
    #[clap(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = Args::parse();
    let mut text = String::new();
    args.input.read_to_string(&mut text)?;

    let dictionary: WordDictionary = loregen::build(&text);
    if args.pretty {
        serde_json::to_writer_pretty(&mut args.output, &dictionary)?;
    } else {
        serde_json::to_writer(&mut args.output, &dictionary)?;
    }
    writeln!(args.output)?;
    Ok(())
}
