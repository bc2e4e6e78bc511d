//! OPC CLI
//!
//! File encryption tool for the OPC cipher family.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{run_crypt, run_little, CipherArgs, LittleArgs, Mode};

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "opc")]
#[command(about = "Experimental OPC cipher family tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file with the main cipher (pads non-aligned input)
    Encrypt(CipherArgs),
    /// Decrypt a file with the main cipher
    Decrypt(CipherArgs),
    /// Counter-mode stream with the reduced Little-OPC cipher
    /// (the same invocation encrypts and decrypts)
    Little(LittleArgs),
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt(args) => run_crypt(&args, Mode::Encrypt),
        Commands::Decrypt(args) => run_crypt(&args, Mode::Decrypt),
        Commands::Little(args) => run_little(&args),
    }
}
