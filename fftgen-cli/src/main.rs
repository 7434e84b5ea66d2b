use std::path::PathBuf;

use clap::{Parser, Subcommand};
#[cfg(not(test))]
use fftgen_cli::*;

#[derive(Parser)]
#[command(author, version, about = "VHDL generation helpers for fftgen cores")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit a partial twiddle ROM module
    #[command(name = "twiddle-rom")]
    TwiddleRom {
        /// Number of table entries (power of two, at least 2)
        size: usize,
        /// Twiddle word widths to generate ROM variants for
        #[arg(required = true)]
        widths: Vec<u32>,
        /// Scale by 2^(w-1)-1 so words fit in w bits
        #[arg(long)]
        reduced_bits: bool,
        /// Size of the full transform; defaults to 4 * size * size
        #[arg(long)]
        modulus: Option<usize>,
        /// Write to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[cfg(not(test))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    match cli.command {
        Commands::TwiddleRom {
            size,
            widths,
            reduced_bits,
            modulus,
            output,
        } => {
            let opts = TwiddleRomOptions {
                size,
                widths,
                reduced_bits,
                modulus,
            };
            let text = twiddle_rom_vhdl(&opts)?;
            write_output(&text, output.as_deref())
        }
    }
}
