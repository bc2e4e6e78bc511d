//! Main-cipher file encryption and decryption.

use anyhow::{bail, Context, Result};
use clap::Args;
use opc::{Opc, OpcConfig};
use std::fs;
use std::path::PathBuf;

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Shared arguments for `encrypt` / `decrypt`.
#[derive(Args)]
pub struct CipherArgs {
    /// Input file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Master key as hex; length must be a multiple of the key block
    /// (32 bytes / 64 hex digits by default)
    #[arg(short, long, value_name = "HEX")]
    pub key: String,

    /// Initial vector as hex; length must be a multiple of the data block
    /// (16 bytes). Defaults to one all-zero block.
    #[arg(long, value_name = "HEX")]
    pub iv: Option<String>,

    /// LFSR seed (non-zero)
    #[arg(long, default_value_t = 1)]
    pub lfsr_seed: u64,

    /// NLFSR seed (non-zero)
    #[arg(long, default_value_t = 1)]
    pub nlfsr_seed: u64,

    /// Double-pendulum seed (at least 10_000_000_000)
    #[arg(long, default_value_t = 0xB7E1_5162_8AED_2A6A)]
    pub sdp_seed: u64,
}

/// Which direction to run.
#[derive(Clone, Copy)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

// =============================================================================
// COMMAND
// =============================================================================

pub fn run_crypt(args: &CipherArgs, mode: Mode) -> Result<()> {
    let keys = hex::decode(&args.key).context("key is not valid hex")?;
    let initial_vector = match &args.iv {
        Some(iv) => hex::decode(iv).context("iv is not valid hex")?,
        None => vec![0u8; 16],
    };

    let data = fs::read(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    if data.is_empty() {
        bail!("input file is empty");
    }

    let config = OpcConfig::minimal(initial_vector, args.lfsr_seed, args.nlfsr_seed, args.sdp_seed);
    let mut cipher = Opc::new(config).map_err(|error| anyhow::anyhow!("{error}"))?;

    let result = match mode {
        Mode::Encrypt => cipher.encrypt(&data, &keys),
        Mode::Decrypt => cipher.decrypt(&data, &keys),
    };
    let output = result.map_err(|error| anyhow::anyhow!("{error}"))?;

    fs::write(&args.output, output)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    Ok(())
}
