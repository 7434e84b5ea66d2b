//! Builds a few common FFT layouts and prints their metadata and VHDL.
//!
//! Run with `cargo run --example layouts [OUTDIR]`; when OUTDIR is given every
//! generated entity is written there as `{name}.vhd`.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use fftgen::{generate, large_multiplier, Fft, Fft4Step, FftBase, FftSpdf, GenError};

fn fft4() -> Result<FftBase, GenError> {
    FftBase::new(4, "fft4_serial7", "SCALE_NONE", 11)
}

fn fft16() -> Result<Fft, GenError> {
    Ok(FftSpdf::new(16, fft4()?)?.into())
}

fn fft64() -> Result<Fft, GenError> {
    Ok(FftSpdf::new(64, fft16()?)?.into())
}

fn fft256() -> Result<Fft, GenError> {
    Ok(Fft4Step::new(256, fft16()?, fft16()?)?.into())
}

fn fft4096() -> Result<Fft, GenError> {
    let mut tree: Fft = Fft4Step::new(4096, fft64()?, fft64()?)?.into();
    tree.set_multiplier(large_multiplier(), true);
    Ok(tree)
}

fn main() -> Result<(), Box<dyn Error>> {
    let outdir = std::env::args().nth(1).map(PathBuf::from);
    let layouts = [
        ("fft16", fft16()?),
        ("fft64", fft64()?),
        ("fft256", fft256()?),
        ("fft4096", fft4096()?),
    ];

    for (name, tree) in &layouts {
        println!("=== {} ===", name);
        println!("{}", tree.description_str());
        println!("input order:  {}", tree.input_bit_order().describe());
        println!("output order: {}", tree.output_bit_order().describe());
        println!("components:   {:?}", tree.imports().iter().collect::<Vec<_>>());

        let entities = generate(tree, name)?;
        for entity in &entities {
            println!("  {} (delay {}, {} lines)", entity.name, entity.delay, entity.code.lines().count());
            if let Some(dir) = &outdir {
                fs::create_dir_all(dir)?;
                fs::write(dir.join(format!("{}.vhd", entity.name)), &entity.code)?;
            }
        }
        println!();
    }
    Ok(())
}
