//! protowire - Inspect raw Protocol Buffer payloads
//!
//! Decodes binary protobuf data without a schema and prints it in text
//! format, with every field shown by number.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use protowire_core::binary::DEFAULT_DEPTH_LIMIT;
use protowire_core::text::DEFAULT_UNKNOWN_DEPTH_CAP;
use protowire_core::wire::varint::{self, MAX_VARINT_LEN};
use protowire_core::{
    DecodeOptions, EmptyMessage, Message, MessageExt, NamedMessage, TextEncodeOptions,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, Level};
use tracing_subscriber::EnvFilter;

/// Inspect raw Protocol Buffer payloads
#[derive(Parser, Debug)]
#[command(name = "protowire")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a binary payload and print it as text format
    Decode(DecodeArgs),
    /// Show the varint encoding of an integer
    Varint(VarintArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Input file (reads stdin when omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// How the input is written
    #[arg(long, value_enum, default_value = "binary")]
    input: InputFormat,

    /// Maximum nesting of groups and messages while decoding
    #[arg(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    depth_limit: usize,

    /// Levels of length-delimited fields to try printing as nested messages
    #[arg(long, default_value_t = DEFAULT_UNKNOWN_DEPTH_CAP)]
    unknown_depth: usize,
}

#[derive(Args, Debug)]
struct VarintArgs {
    /// Integer to encode (may be negative)
    value: String,

    /// Apply the zigzag transform first (sint32/sint64 encoding)
    #[arg(long)]
    zigzag: bool,
}

/// Input encoding for `decode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Raw bytes
    Binary,
    /// Hex digits; whitespace is ignored
    Hex,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Decode(args) => {
            let data = read_input(args.file.as_deref())?;
            let text = decode_payload(&data, &args)?;
            print!("{}", text);
        }
        Command::Varint(args) => {
            let bytes = encode_varint(&args.value, args.zigzag)?;
            println!("{}", to_hex(&bytes));
        }
    }
    Ok(())
}

/// Read the whole input from a file or stdin
fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            if !path.is_file() {
                bail!("Input path is not a file: {}", path.display());
            }
            trace!("Reading {}", path.display());
            fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

/// Decode `data` schema-less and render it as text
fn decode_payload(data: &[u8], args: &DecodeArgs) -> Result<String> {
    let bytes = match args.input {
        InputFormat::Binary => data.to_vec(),
        InputFormat::Hex => {
            let text = std::str::from_utf8(data).context("Hex input is not valid UTF-8")?;
            let digits: String = text.split_whitespace().collect();
            hex::decode(digits).context("Invalid hex input")?
        }
    };
    debug!("Decoding {} bytes", bytes.len());

    let options = DecodeOptions::new().depth_limit(args.depth_limit);
    let message = EmptyMessage::decode_with_options(&bytes, &options)
        .context("Input is not a valid protobuf payload")?;
    info!(
        "Decoded {} top-level field(s)",
        message.unknown_fields().iter().count()
    );

    let text_options = TextEncodeOptions::new().unknown_depth_cap(args.unknown_depth);
    message
        .to_text_with(&text_options)
        .context("Failed to render text format")
}

/// Encode a decimal integer as a varint
fn encode_varint(value: &str, zigzag: bool) -> Result<Vec<u8>> {
    let raw = if zigzag {
        let n: i64 = value
            .parse()
            .with_context(|| format!("Not a 64-bit signed integer: {}", value))?;
        varint::zigzag_encode64(n)
    } else if value.starts_with('-') {
        // Negative int32/int64 values are sign-extended to 64 bits.
        let n: i64 = value
            .parse()
            .with_context(|| format!("Not a 64-bit signed integer: {}", value))?;
        n as u64
    } else {
        value
            .parse()
            .with_context(|| format!("Not a 64-bit unsigned integer: {}", value))?
    };
    let mut out = [0u8; MAX_VARINT_LEN];
    let len = varint::encode_to_slice(raw, &mut out);
    Ok(out[..len].to_vec())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
