use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use fftgen::TwiddleRom;
use log::LevelFilter;

/// Parameters of one `twiddle-rom` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwiddleRomOptions {
    pub size: usize,
    pub widths: Vec<u32>,
    pub reduced_bits: bool,
    pub modulus: Option<usize>,
}

/// Build the partial twiddle ROM module described by `opts`.
pub fn twiddle_rom_vhdl(opts: &TwiddleRomOptions) -> Result<String> {
    let rom = match opts.modulus {
        Some(m) => TwiddleRom::with_modulus(opts.size, m),
        None => TwiddleRom::new(opts.size),
    }
    .with_context(|| format!("invalid twiddle table of size {}", opts.size))?
    .reduced_bits(opts.reduced_bits);
    log::info!(
        "{}: {} entries, modulus {}, widths {:?}",
        rom.entity_name(),
        rom.size(),
        rom.modulus(),
        opts.widths
    );
    rom.gen_entity(&opts.widths)
        .with_context(|| format!("cannot emit {}", rom.entity_name()))
}

/// Write `text` to `output`, or to stdout when no path is given.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} bytes to {}", text.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Log level for a count of `-v` flags; `RUST_LOG` still overrides it.
pub fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(size: usize, widths: &[u32]) -> TwiddleRomOptions {
        TwiddleRomOptions {
            size,
            widths: widths.to_vec(),
            reduced_bits: false,
            modulus: None,
        }
    }

    #[test]
    fn emits_requested_variants() {
        let text = twiddle_rom_vhdl(&opts(16, &[12, 18])).unwrap();
        assert!(text.contains("entity twiddleGeneratorPartial16 is"));
        assert!(text.contains("if twBits = 12 generate"));
        assert!(text.contains("if twBits = 18 generate"));
    }

    #[test]
    fn errors_carry_context() {
        let err = twiddle_rom_vhdl(&opts(12, &[12])).unwrap_err();
        assert_eq!(err.to_string(), "invalid twiddle table of size 12");
        assert!(format!("{:#}", err).contains("not a positive power of two"));

        let err = twiddle_rom_vhdl(&opts(16, &[])).unwrap_err();
        assert!(err.to_string().contains("twiddleGeneratorPartial16"));
    }

    #[test]
    fn modulus_and_reduced_bits_are_forwarded() {
        let mut o = opts(4, &[8]);
        o.modulus = Some(16);
        o.reduced_bits = true;
        let text = twiddle_rom_vhdl(&o).unwrap();
        assert!(text.contains("transform of size 16"));
        assert!(text.contains("constant romWidth: integer := (twBits)*2;"));
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(5), LevelFilter::Debug);
    }
}
