//! Demonstrates enabling verbose logging for fftgen.
use fftgen::{generate, Fft, Fft4Step, FftBase};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let sub2 = FftBase::new(8, "fft8", "SCALE_NONE", 8)
        .and_then(|b| b.with_input_bit_order(&[1, 0, 2]))
        .unwrap();
    let fft8 = FftBase::new(8, "fft8", "SCALE_NONE", 8).unwrap();
    let tree: Fft = Fft4Step::new(64, fft8, sub2).unwrap().into();

    generate(&tree, "fft64").unwrap();
}
