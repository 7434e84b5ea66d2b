//! Partial twiddle ROM generator.
//!
//! A large twiddle generator splits the angle index into a major and a minor
//! part. The minor table covers `n` consecutive angles `2π·i/M` of a much
//! larger transform of size `M`; by default `M = 4n·n`. Each requested word
//! width gets its own ROM contents, selected at elaboration time.
//!
//! Quantization is round-half-away-from-zero and goes through `libm`, so a
//! table is bit-for-bit reproducible across targets and feature sets.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::bit_order::log2_exact;
use crate::error::{GenError, MAX_TWIDDLE_WIDTH, MIN_TWIDDLE_WIDTH};

/// Read latency of the generated module in cycles.
pub const PARTIAL_ROM_READ_DELAY: usize = 2;

/// Words per line in the emitted ROM aggregate.
const WORDS_PER_LINE: usize = 6;

/// Quantized sample `(scale·cos θ, scale·sin θ)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwiddleSample {
    pub re: i64,
    pub im: i64,
}

/// Minor twiddle table of `n` entries for a transform of size `modulus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwiddleRom {
    n: usize,
    modulus: usize,
    reduced_bits: bool,
}

impl TwiddleRom {
    /// Table of `n` entries serving a transform of size `4n·n`.
    pub fn new(n: usize) -> Result<Self, GenError> {
        Self::with_modulus(n, n.saturating_mul(n).saturating_mul(4))
    }

    /// Table of `n` entries serving a transform of size `modulus`, which must
    /// be a positive multiple of `4n`.
    pub fn with_modulus(n: usize, modulus: usize) -> Result<Self, GenError> {
        log2_exact(n)?;
        if n < 2 {
            return Err(GenError::TableTooSmall(n));
        }
        let quarter = n
            .checked_mul(4)
            .ok_or(GenError::TwiddleModulus { n, modulus })?;
        if modulus == 0 || modulus % quarter != 0 {
            return Err(GenError::TwiddleModulus { n, modulus });
        }
        Ok(TwiddleRom {
            n,
            modulus,
            reduced_bits: false,
        })
    }

    /// With `true`, samples fit a `width`-bit signed word (scale
    /// `2^(width-1) - 1`); otherwise they use `width + 1` bits and scale
    /// `2^(width-1)`.
    pub fn reduced_bits(mut self, reduced: bool) -> Self {
        self.reduced_bits = reduced;
        self
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn modulus(&self) -> usize {
        self.modulus
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced_bits
    }

    /// Address width of the table.
    pub fn depth_order(&self) -> usize {
        self.n.trailing_zeros() as usize
    }

    /// Name of the emitted entity.
    pub fn entity_name(&self) -> String {
        format!("twiddleGeneratorPartial{}", self.n)
    }

    /// Full-scale value for `width`.
    pub fn scale(&self, width: u32) -> Result<i64, GenError> {
        check_width(width)?;
        let scale = 1i64 << (width - 1);
        Ok(if self.reduced_bits { scale - 1 } else { scale })
    }

    /// Bits per component in the ROM word.
    pub fn word_bits(&self, width: u32) -> Result<u32, GenError> {
        check_width(width)?;
        Ok(if self.reduced_bits { width } else { width + 1 })
    }

    /// Quantized twiddle `i` at `width`.
    pub fn sample(&self, i: usize, width: u32) -> Result<TwiddleSample, GenError> {
        let scale = self.scale(width)? as f64;
        let theta = i as f64 / self.modulus as f64 * (2.0 * PI);
        Ok(TwiddleSample {
            re: quantize(libm::cos(theta), scale),
            im: quantize(libm::sin(theta), scale),
        })
    }

    /// Two's-complement encodings `(re, im)` of twiddle `i`.
    pub fn encode(&self, i: usize, width: u32) -> Result<(u64, u64), GenError> {
        let s = self.sample(i, width)?;
        let bits = self.word_bits(width)?;
        Ok((twos_complement(s.re, bits), twos_complement(s.im, bits)))
    }

    /// ROM word for twiddle `i`: imaginary bits followed by real bits.
    pub fn word(&self, i: usize, width: u32) -> Result<String, GenError> {
        let (re, im) = self.encode(i, width)?;
        let bits = self.word_bits(width)? as usize;
        Ok(format!("{:0w$b}{:0w$b}", im, re, w = bits))
    }

    /// All `n` ROM words at `width`.
    pub fn words(&self, width: u32) -> Result<Vec<String>, GenError> {
        (0..self.n).map(|i| self.word(i, width)).collect()
    }

    /// BLAKE3 digest of the ROM contents at `width`.
    pub fn fingerprint(&self, width: u32) -> Result<blake3::Hash, GenError> {
        let mut hasher = blake3::Hasher::new();
        for word in self.words(width)? {
            hasher.update(word.as_bytes());
            hasher.update(b"\n");
        }
        Ok(hasher.finalize())
    }

    /// VHDL module holding one ROM variant per entry of `widths`.
    pub fn gen_entity(&self, widths: &[u32]) -> Result<String, GenError> {
        check_widths(widths)?;
        let rom_width = if self.reduced_bits { "twBits" } else { "twBits + 1" };
        let name = self.entity_name();
        let order = self.depth_order();

        let mut code = format!(
            "\n\
             library ieee;\n\
             library work;\n\
             use ieee.numeric_std.all;\n\
             use ieee.std_logic_1164.all;\n\
             use work.fft_types.all;\n\
             -- read delay is {0} cycles\n\
             -- minor table of {1} entries for a transform of size {2}\n",
            PARTIAL_ROM_READ_DELAY, self.n, self.modulus
        );
        for &w in widths {
            code += &format!("-- twBits={} contents: blake3 {}\n", w, self.fingerprint(w)?.to_hex());
        }
        code += &format!(
            "\n\
             entity {1} is\n\
             \tgeneric(twBits: integer := 17);\n\
             \tport(clk: in std_logic;\n\
             \t\t\ttwAddr: in unsigned({0}-1 downto 0);\n\
             \t\t\ttwData: out complex\n\
             \t\t\t);\n\
             end entity;\n\
             architecture a of {1} is\n\
             \tconstant romDepthOrder: integer := {0};\n\
             \tconstant romDepth: integer := 2**romDepthOrder;\n\
             \tconstant romWidth: integer := ({2})*2;\n\
             \t--ram\n\
             \ttype ram1t is array(0 to romDepth-1) of\n\
             \t\tstd_logic_vector(romWidth-1 downto 0);\n\
             \tsignal rom: ram1t;\n\
             \tsignal addr1: unsigned(romDepthOrder-1 downto 0) := (others=>'0');\n\
             \tsignal data0,data1: std_logic_vector(romWidth-1 downto 0) := (others=>'0');\n\
             begin\n\
             \taddr1 <= twAddr when rising_edge(clk);\n\
             \tdata0 <= rom(to_integer(addr1));\n\
             \tdata1 <= data0 when rising_edge(clk);\n\
             \ttwData <= complex_unpack(data1);\n",
            order, name, rom_width
        );
        for &w in widths {
            code += &format!(
                "\ng{0}:\n\tif twBits = {0} generate\n\t\trom <= (\n{1});\n\tend generate;\n",
                w,
                self.rom_contents(w)?
            );
        }
        code += "\nend a;\n";
        #[cfg(feature = "verbose-logging")]
        log::debug!("emitted {} with {} width variant(s)", name, widths.len());
        Ok(code)
    }

    fn rom_contents(&self, width: u32) -> Result<String, GenError> {
        let words: Vec<String> = self
            .words(width)?
            .into_iter()
            .map(|w| format!("\"{}\"", w))
            .collect();
        let lines: Vec<String> = words
            .chunks(WORDS_PER_LINE)
            .map(|chunk| format!("\t\t\t{}", chunk.join(", ")))
            .collect();
        Ok(lines.join(",\n"))
    }
}

fn check_width(width: u32) -> Result<(), GenError> {
    if !(MIN_TWIDDLE_WIDTH..=MAX_TWIDDLE_WIDTH).contains(&width) {
        return Err(GenError::TwiddleWidth(width));
    }
    Ok(())
}

fn check_widths(widths: &[u32]) -> Result<(), GenError> {
    if widths.is_empty() {
        return Err(GenError::NoTwiddleWidths);
    }
    for (i, &w) in widths.iter().enumerate() {
        check_width(w)?;
        if widths[..i].contains(&w) {
            return Err(GenError::DuplicateTwiddleWidth(w));
        }
    }
    Ok(())
}

/// `value * scale` rounded half away from zero.
fn quantize(value: f64, scale: f64) -> i64 {
    libm::round(value * scale) as i64
}

/// Unsigned encoding of `value` as a `bits`-wide two's-complement word.
fn twos_complement(value: i64, bits: u32) -> u64 {
    if value < 0 {
        (value + (1i64 << bits)) as u64
    } else {
        value as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_zero_is_full_scale_cosine() {
        let reduced = TwiddleRom::new(16).unwrap().reduced_bits(true);
        assert_eq!(reduced.scale(8), Ok(127));
        assert_eq!(reduced.sample(0, 8).unwrap(), TwiddleSample { re: 127, im: 0 });
        assert_eq!(reduced.word(0, 8).unwrap(), "0000000001111111");

        let wide = TwiddleRom::new(16).unwrap();
        assert_eq!(wide.scale(8), Ok(128));
        assert_eq!(wide.word_bits(8), Ok(9));
        assert_eq!(wide.sample(0, 8).unwrap(), TwiddleSample { re: 128, im: 0 });
        assert_eq!(wide.word(0, 8).unwrap(), "000000000010000000");
    }

    #[test]
    fn samples_follow_the_unit_circle() {
        let rom = TwiddleRom::with_modulus(2, 8).unwrap();
        assert_eq!(rom.sample(1, 4).unwrap(), TwiddleSample { re: 6, im: 6 });
        let rom = TwiddleRom::with_modulus(4, 16).unwrap();
        assert_eq!(rom.sample(3, 4).unwrap(), TwiddleSample { re: 3, im: 7 });
        // the default modulus keeps the whole table in the first octant
        let rom = TwiddleRom::new(8).unwrap();
        for i in 0..8 {
            let s = rom.sample(i, 12).unwrap();
            assert!(s.re >= s.im && s.im >= 0);
        }
    }

    #[test]
    fn negative_samples_are_twos_complement() {
        assert_eq!(twos_complement(-1, 5), 0b11111);
        assert_eq!(twos_complement(-8, 5), 0b11000);
        assert_eq!(twos_complement(7, 5), 0b00111);
        // 3π/4 has a negative cosine
        let rom = TwiddleRom::with_modulus(2, 8).unwrap();
        assert_eq!(rom.sample(3, 4).unwrap(), TwiddleSample { re: -6, im: 6 });
        assert_eq!(rom.encode(3, 4).unwrap(), (0b11010, 0b00110));
        assert_eq!(rom.word(3, 4).unwrap(), "0011011010");
    }

    #[test]
    fn quantization_rounds_half_away_from_zero() {
        // exact ties in both directions
        assert_eq!(quantize(0.5, 5.0), 3);
        assert_eq!(quantize(-0.5, 5.0), -3);
        assert_eq!(quantize(0.5, 1.0), 1);
        assert_eq!(quantize(-0.5, 1.0), -1);
        assert_eq!(quantize(0.375, 4.0), 2);
        assert_eq!(quantize(-0.375, 4.0), -2);
        // just below a tie stays below
        assert_eq!(quantize(0.49, 1.0), 0);
        // cos(2π/8)·8 = 5.657
        let rom = TwiddleRom::with_modulus(2, 8).unwrap();
        assert_eq!(rom.sample(1, 4).unwrap().re, 6);
    }

    #[test]
    fn width_helpers_reject_out_of_range_widths() {
        let rom = TwiddleRom::new(8).unwrap();
        assert_eq!(rom.scale(0), Err(GenError::TwiddleWidth(0)));
        assert_eq!(rom.scale(65), Err(GenError::TwiddleWidth(65)));
        assert_eq!(rom.word_bits(1), Err(GenError::TwiddleWidth(1)));
        assert_eq!(rom.word_bits(33), Err(GenError::TwiddleWidth(33)));
        assert_eq!(rom.scale(32), Ok(1i64 << 31));
        assert_eq!(rom.word_bits(2), Ok(3));
    }

    #[test]
    fn rejects_inconsistent_configurations() {
        assert_eq!(TwiddleRom::new(12), Err(GenError::NotPowerOfTwo(12)));
        assert_eq!(TwiddleRom::new(1), Err(GenError::TableTooSmall(1)));
        assert_eq!(
            TwiddleRom::with_modulus(8, 48),
            Err(GenError::TwiddleModulus { n: 8, modulus: 48 })
        );
        // 4n no longer fits in usize
        let huge = 1usize << (usize::BITS - 2);
        assert_eq!(
            TwiddleRom::new(huge),
            Err(GenError::TwiddleModulus {
                n: huge,
                modulus: usize::MAX
            })
        );
        assert_eq!(
            TwiddleRom::with_modulus(huge, 64),
            Err(GenError::TwiddleModulus { n: huge, modulus: 64 })
        );
        let rom = TwiddleRom::new(8).unwrap();
        assert_eq!(rom.gen_entity(&[]), Err(GenError::NoTwiddleWidths));
        assert_eq!(rom.gen_entity(&[12, 1]), Err(GenError::TwiddleWidth(1)));
        assert_eq!(rom.gen_entity(&[12, 40]), Err(GenError::TwiddleWidth(40)));
        assert_eq!(
            rom.gen_entity(&[12, 16, 12]),
            Err(GenError::DuplicateTwiddleWidth(12))
        );
    }

    #[test]
    fn entity_has_one_variant_per_width() {
        let rom = TwiddleRom::new(8).unwrap();
        let code = rom.gen_entity(&[12, 16]).unwrap();
        assert!(code.contains("entity twiddleGeneratorPartial8 is"));
        assert!(code.contains("twAddr: in unsigned(3-1 downto 0);"));
        assert!(code.contains("constant romWidth: integer := (twBits + 1)*2;"));
        assert!(code.contains("g12:\n\tif twBits = 12 generate"));
        assert!(code.contains("g16:\n\tif twBits = 16 generate"));
        assert_eq!(code.matches("end generate;").count(), 2);
        let first = format!("\"{}\"", rom.word(0, 12).unwrap());
        assert!(code.contains(&first));
        assert!(code.ends_with("end a;\n"));
    }

    #[test]
    fn regeneration_is_identical() {
        let rom = TwiddleRom::new(32).unwrap();
        assert_eq!(rom.gen_entity(&[18]).unwrap(), rom.gen_entity(&[18]).unwrap());
        assert_eq!(rom.fingerprint(18).unwrap(), rom.fingerprint(18).unwrap());
        assert_ne!(rom.fingerprint(18).unwrap(), rom.fingerprint(17).unwrap());
    }
}
