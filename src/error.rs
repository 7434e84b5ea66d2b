//! Error type shared by the architecture model, the bit-order algebra and the
//! twiddle ROM generator.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Smallest twiddle word width the ROM generator accepts.
pub const MIN_TWIDDLE_WIDTH: u32 = 2;

/// Largest twiddle word width the ROM generator accepts.
///
/// Quantized samples are computed in `f64` and encoded into `u64`, so widths
/// beyond this would lose exactness.
pub const MAX_TWIDDLE_WIDTH: u32 = 32;

/// Errors raised while describing or generating an FFT core.
///
/// Every variant is fatal for the node or table being built: nothing is
/// emitted once one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A transform or table size was zero or not a power of two.
    NotPowerOfTwo(usize),
    /// A bit order had the wrong number of entries for the node's size.
    BitOrderLength { expected: usize, actual: usize },
    /// A bit order was not a permutation of `0..len`.
    NotAPermutation(Vec<usize>),
    /// A composite's size does not equal the product of its factors.
    SizeMismatch { n: usize, product: usize },
    /// A twiddle table must have at least two entries.
    TableTooSmall(usize),
    /// No twiddle widths were requested.
    NoTwiddleWidths,
    /// The same twiddle width was requested twice.
    DuplicateTwiddleWidth(u32),
    /// A twiddle width outside `MIN_TWIDDLE_WIDTH..=MAX_TWIDDLE_WIDTH`.
    TwiddleWidth(u32),
    /// The full-transform modulus is not a positive multiple of `4 * n`.
    TwiddleModulus { n: usize, modulus: usize },
    /// An entity name is not a basic VHDL identifier.
    InvalidEntityName(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::NotPowerOfTwo(n) => write!(f, "size {} is not a positive power of two", n),
            GenError::BitOrderLength { expected, actual } => write!(
                f,
                "bit order has {} entries but the node needs {}",
                actual, expected
            ),
            GenError::NotAPermutation(bits) => {
                write!(f, "bit order {:?} is not a permutation of 0..{}", bits, bits.len())
            }
            GenError::SizeMismatch { n, product } => write!(
                f,
                "composite size {} does not match the product of its factors ({})",
                n, product
            ),
            GenError::TableTooSmall(n) => {
                write!(f, "twiddle table size {} is below the minimum of 2", n)
            }
            GenError::NoTwiddleWidths => write!(f, "at least one twiddle width is required"),
            GenError::DuplicateTwiddleWidth(w) => {
                write!(f, "twiddle width {} was requested more than once", w)
            }
            GenError::TwiddleWidth(w) => write!(
                f,
                "twiddle width {} is outside {}..={}",
                w, MIN_TWIDDLE_WIDTH, MAX_TWIDDLE_WIDTH
            ),
            GenError::TwiddleModulus { n, modulus } => write!(
                f,
                "twiddle modulus {} is not a positive multiple of 4 * {}",
                modulus, n
            ),
            GenError::InvalidEntityName(name) => {
                write!(f, "'{}' is not a valid VHDL entity name", name)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GenError {}
