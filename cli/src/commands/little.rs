//! Little-OPC counter-mode streaming.

use anyhow::{Context, Result};
use clap::Args;
use little_opc::LittleOpc;
use std::fs;
use std::path::PathBuf;

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Arguments for the `little` subcommand.
#[derive(Args)]
pub struct LittleArgs {
    /// Input file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// 64-bit key as hex (up to 16 hex digits)
    #[arg(short, long, value_name = "HEX")]
    pub key: String,

    /// 64-bit counter-mode nonce
    #[arg(short, long, default_value_t = 0)]
    pub nonce: u64,
}

// =============================================================================
// COMMAND
// =============================================================================

pub fn run_little(args: &LittleArgs) -> Result<()> {
    let key = u64::from_str_radix(args.key.trim_start_matches("0x"), 16)
        .context("key is not a valid 64-bit hex value")?;

    let data = fs::read(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    let cipher = LittleOpc::new(key);
    let output = cipher.process_stream(&data, args.nonce);

    fs::write(&args.output, output)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    Ok(())
}
