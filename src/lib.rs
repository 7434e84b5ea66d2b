//! # fftgen - VHDL generator for streaming FFT cores
//!
//! Builds large pipelined FFT cores out of small hand-written ones. An
//! architecture is a tree: [`FftBase`] leaves wrap existing VHDL entities,
//! [`Fft4Step`] combines two sub-transforms with a transposer and a twiddle
//! multiplication, and [`FftSpdf`] puts a fixed radix-4 stage in front of a
//! quarter-size sub-transform.
//!
//! Every node reports its exact pipeline delay and the bit order in which it
//! consumes and produces samples, so a surrounding design can be wired up
//! without simulating it first.
//!
//! ## Features
//!
//! - **Bit-order algebra** ([`BitOrder`]) and the staged [`BitPermutation`]
//!   used by reorder buffers
//! - **Whole-tree emission** ([`generate`]), children before parents
//! - **Partial twiddle ROMs** ([`TwiddleRom`]) with reproducible contents
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` for [`GenError`] and std hashing in
//!   `blake3`
//! - `verbose-logging`: `log::debug!` records for every composite built and
//!   entity emitted
//! - `internal-tests`: property tests over random trees and permutations
//!
//! ## Example
//!
//! ```
//! use fftgen::{generate, Fft, FftBase, FftSpdf};
//!
//! let fft4 = FftBase::new(4, "fft4", "SCALE_NONE", 5)?;
//! let fft16: Fft = FftSpdf::new(16, fft4)?.into();
//! assert_eq!(fft16.output_bit_order().as_slice(), &[3, 2, 0, 1]);
//!
//! let entities = generate(&fft16, "fft16")?;
//! assert_eq!(entities.len(), 1);
//! assert!(entities[0].code.contains("entity fft16 is"));
//! # Ok::<(), fftgen::GenError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod arch;
pub mod bit_order;
pub mod bit_permutation;
pub mod codegen;
pub mod error;
pub mod imports;
pub mod multiplier;
pub mod twiddle;
pub mod vhdl;

pub use arch::{Fft, Fft4Step, FftBase, FftSpdf, TwiddleBits};
pub use bit_order::{log2_exact, BitOrder};
pub use bit_permutation::BitPermutation;
pub use codegen::{generate, GeneratedEntity};
pub use error::GenError;
pub use imports::Imports;
pub use multiplier::{default_multiplier, large_multiplier, Multiplier};
pub use twiddle::TwiddleRom;
