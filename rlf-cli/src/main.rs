//! RLF Log Reader CLI Application
//!
//! Command-line front end for the rlf-decoder library. The library only
//! ever sees a byte buffer; everything about files, arguments, and output
//! lives here:
//! - Reads a .RLF file into memory and runs the decoder over it
//! - Prints a per-type summary table and sensor series statistics
//! - Emits a machine-readable JSON report on request
//! - Loads decoder options from a TOML config file

use anyhow::{bail, Context, Result};
use clap::Parser;
use rlf_decoder::{decode, DecoderConfig};
use std::path::PathBuf;

mod report;

/// RLF Log Reader - decode REMUS-100 AUV mission logs
#[derive(Parser, Debug)]
#[command(name = "rlf-cli")]
#[command(about = "Decode and summarize REMUS .RLF mission log files", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the .RLF mission log to decode
    #[arg(value_name = "FILE")]
    log: Option<PathBuf>,

    /// Emit a JSON report instead of the text summary
    #[arg(long)]
    json: bool,

    /// Skip per-type decoding; report raw frame groups only
    #[arg(long)]
    no_decode: bool,

    /// Discard raw payload bytes after decoding (lower memory on large logs)
    #[arg(long)]
    drop_raw: bool,

    /// Reference record type for positional timestamps (e.g. 0x044e)
    #[arg(long, value_name = "CODE")]
    reference: Option<String>,

    /// Path to a decoder configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("RLF Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", rlf_decoder::VERSION);

    let Some(log_path) = args.log.as_ref() else {
        println!("RLF Log Reader - no input specified");
        println!("\nQuick Start:");
        println!("  rlf-cli mission.rlf");
        println!("  rlf-cli mission.rlf --json");
        println!("  rlf-cli mission.rlf --config decode.toml -v");
        println!("\nUse --help for more options");
        return Ok(());
    };

    let config = build_config(&args)?;

    let data = std::fs::read(log_path)
        .with_context(|| format!("failed to read log file {:?}", log_path))?;
    log::info!("read {:?}: {:.1} MB", log_path, data.len() as f64 / 1e6);

    let dataset = decode(&data, &config);

    if args.json {
        let report = report::build(log_path, data.len(), &dataset);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print(log_path, data.len(), &dataset);
    }

    Ok(())
}

/// Assemble the decoder configuration from file and flags
///
/// Flags override whatever the config file set.
fn build_config(args: &Args) -> Result<DecoderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("loading decoder config from {:?}", path);
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {:?}", path))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config file {:?}", path))?
        }
        None => DecoderConfig::new(),
    };

    if args.no_decode {
        config.decode_records = false;
    }
    if args.drop_raw {
        config.keep_raw_payloads = false;
    }
    if let Some(reference) = &args.reference {
        config.reference_type = parse_type_code(reference)?;
    }
    Ok(config)
}

/// Parse a record type code given as hex (0x044e) or decimal (1102)
fn parse_type_code(s: &str) -> Result<u16> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    match parsed {
        Ok(code) => Ok(code),
        Err(_) => bail!("invalid record type code: {}", s),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_code() {
        assert_eq!(parse_type_code("0x044e").unwrap(), 0x044E);
        assert_eq!(parse_type_code("0X044E").unwrap(), 0x044E);
        assert_eq!(parse_type_code("1102").unwrap(), 1102);
        assert!(parse_type_code("navigation").is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let config: DecoderConfig =
            toml::from_str("keep_raw_payloads = false\nreference_type = 1053\n").unwrap();
        assert!(config.decode_records);
        assert!(!config.keep_raw_payloads);
        assert_eq!(config.reference_type, 1053);
    }
}
