//! FFT architecture trees.
//!
//! A tree is built bottom-up from [`FftBase`] leaves combined through
//! [`Fft4Step`] and [`FftSpdf`] composites. Every node knows its size, the
//! bit orders it consumes and produces, and its exact pipeline delay; the
//! composites additionally know how to emit themselves as VHDL entities.
//!
//! ```
//! use fftgen::arch::{Fft, Fft4Step, FftBase};
//!
//! let fft64: Fft = Fft4Step::new(
//!     64,
//!     FftBase::new(8, "fft8", "SCALE_NONE", 8)?,
//!     FftBase::new(8, "fft8", "SCALE_NONE", 8)?,
//! )?
//! .into();
//! assert_eq!(fft64.delay(), 8 + 64 + 6 + 8);
//! # Ok::<(), fftgen::GenError>(())
//! ```

pub mod base;
pub mod four_step;
pub mod spdf;
mod stages;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

pub use base::FftBase;
pub use four_step::Fft4Step;
pub use spdf::{spdf_stage_delay, FftSpdf};
pub use stages::{
    TwiddleSource, REORDER_ADDITIVE_DELAY, ROM_TWIDDLE_DELAY, TABLE_TWIDDLE_DELAY,
    TWIDDLE_ROM_THRESHOLD,
};

use crate::bit_order::BitOrder;
use crate::imports::Imports;
use crate::multiplier::Multiplier;

/// Twiddle word width of a composite: a VHDL expression or a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwiddleBits {
    /// Name of a generic or constant visible in the generated entity.
    Symbol(String),
    Bits(u32),
}

impl TwiddleBits {
    /// Form used in configuration dumps: symbols quoted, literals bare.
    pub fn serialize(&self) -> String {
        match self {
            TwiddleBits::Symbol(s) => format!("\"{}\"", s),
            TwiddleBits::Bits(b) => format!("{}", b),
        }
    }
}

impl Default for TwiddleBits {
    fn default() -> Self {
        TwiddleBits::Symbol(String::from("twBits"))
    }
}

impl fmt::Display for TwiddleBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwiddleBits::Symbol(s) => f.write_str(s),
            TwiddleBits::Bits(b) => write!(f, "{}", b),
        }
    }
}

/// A node of an FFT architecture tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fft {
    Base(FftBase),
    FourStep(Box<Fft4Step>),
    Spdf(Box<FftSpdf>),
}

impl From<FftBase> for Fft {
    fn from(node: FftBase) -> Self {
        Fft::Base(node)
    }
}

impl From<Fft4Step> for Fft {
    fn from(node: Fft4Step) -> Self {
        Fft::FourStep(Box::new(node))
    }
}

impl From<FftSpdf> for Fft {
    fn from(node: FftSpdf) -> Self {
        Fft::Spdf(Box::new(node))
    }
}

impl Fft {
    /// Transform size N.
    pub fn size(&self) -> usize {
        match self {
            Fft::Base(b) => b.size(),
            Fft::FourStep(c) => c.size(),
            Fft::Spdf(c) => c.size(),
        }
    }

    /// log2(N).
    pub fn order(&self) -> usize {
        match self {
            Fft::Base(b) => b.order(),
            Fft::FourStep(c) => c.order(),
            Fft::Spdf(c) => c.order(),
        }
    }

    /// Cycles from the first input sample to the first output sample.
    pub fn delay(&self) -> usize {
        match self {
            Fft::Base(b) => b.delay(),
            Fft::FourStep(c) => c.delay(),
            Fft::Spdf(c) => c.delay(),
        }
    }

    /// Order in which the node expects its input samples.
    pub fn input_bit_order(&self) -> BitOrder {
        match self {
            Fft::Base(b) => b.input_bit_order().clone(),
            Fft::FourStep(c) => c.input_bit_order(),
            Fft::Spdf(c) => c.input_bit_order(),
        }
    }

    /// Order in which the node produces its output samples.
    pub fn output_bit_order(&self) -> BitOrder {
        match self {
            Fft::Base(b) => b.output_bit_order().clone(),
            Fft::FourStep(c) => c.output_bit_order(),
            Fft::Spdf(c) => c.output_bit_order(),
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Fft::Base(_))
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> Vec<&Fft> {
        match self {
            Fft::Base(_) => Vec::new(),
            Fft::FourStep(c) => alloc::vec![c.sub1(), c.sub2()],
            Fft::Spdf(c) => alloc::vec![c.sub1()],
        }
    }

    /// Multiplier in effect; `None` for leaves.
    pub fn multiplier(&self) -> Option<&Arc<Multiplier>> {
        match self {
            Fft::Base(_) => None,
            Fft::FourStep(c) => Some(c.multiplier()),
            Fft::Spdf(c) => Some(c.multiplier()),
        }
    }

    /// Replace the multiplier of this node, and with `recursive` of every
    /// composite below it. Leaves have no multiplier and are left untouched.
    pub fn set_multiplier(&mut self, multiplier: Arc<Multiplier>, recursive: bool) {
        match self {
            Fft::Base(_) => {}
            Fft::FourStep(c) => c.set_multiplier(multiplier, recursive),
            Fft::Spdf(c) => c.set_multiplier(multiplier, recursive),
        }
    }

    /// Components this node instantiates itself.
    pub fn local_imports(&self) -> Imports {
        match self {
            Fft::Base(b) => b.local_imports(),
            Fft::FourStep(c) => c.local_imports(),
            Fft::Spdf(c) => c.local_imports(),
        }
    }

    /// Components required by this node and its whole subtree.
    pub fn imports(&self) -> Imports {
        let mut all = Imports::new();
        self.visit(&mut |node| all = core::mem::take(&mut all).union(&node.local_imports()));
        all
    }

    /// Depth-first walk calling `f` on every node, children before parents.
    pub fn visit<'a, F: FnMut(&'a Fft)>(&'a self, f: &mut F) {
        for child in self.children() {
            child.visit(f);
        }
        f(self);
    }

    pub fn configuration_str(&self) -> String {
        match self {
            Fft::Base(b) => b.configuration_str(),
            Fft::FourStep(c) => c.configuration_str(),
            Fft::Spdf(c) => c.configuration_str(),
        }
    }

    pub fn description_str(&self) -> String {
        match self {
            Fft::Base(b) => b.description_str(),
            Fft::FourStep(c) => c.description_str(),
            Fft::Spdf(c) => c.description_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiplier::{default_multiplier, large_multiplier};

    fn base(n: usize) -> FftBase {
        FftBase::new(n, format!("fft{}", n), "SCALE_NONE", n).unwrap()
    }

    fn fft1024() -> Fft {
        // 1024 = (4 x 4) x (spdf 4 x 16)
        let inner = Fft4Step::new(16, base(4), base(4)).unwrap();
        let spdf = FftSpdf::new(64, base(16)).unwrap();
        Fft4Step::new(1024, inner, spdf).unwrap().into()
    }

    #[test]
    fn visit_is_depth_first_children_first() {
        let tree = fft1024();
        let mut sizes = Vec::new();
        tree.visit(&mut |node| sizes.push(node.size()));
        assert_eq!(sizes, alloc::vec![4, 4, 16, 16, 64, 1024]);
    }

    #[test]
    fn imports_cover_the_subtree() {
        let imports = fft1024().imports();
        for name in [
            "fft4",
            "fft16",
            "transposer",
            "twiddleGenerator16",
            "twiddleGenerator",
            "twiddleRom64",
            "twiddleRom1024",
            "fft_spdf_stage",
            "complexMultiply2",
        ] {
            assert!(imports.contains(name), "missing {}", name);
        }
        assert!(!imports.contains("reorderBuffer"));
        // asking twice yields the same set: nothing accumulates
        assert_eq!(fft1024().imports(), imports);
        let tree = fft1024();
        assert_eq!(tree.imports(), tree.imports());
    }

    #[test]
    fn recursive_multiplier_replacement() {
        let mut tree = fft1024();
        let big = large_multiplier();
        tree.set_multiplier(Arc::clone(&big), true);
        let mut seen = 0;
        tree.visit(&mut |node| {
            if let Some(m) = node.multiplier() {
                assert!(Arc::ptr_eq(m, &big));
                seen += 1;
            }
        });
        assert_eq!(seen, 3);
        assert!(!tree.imports().contains("complexMultiply2"));
    }

    #[test]
    fn non_recursive_multiplier_replacement_stops_at_root() {
        let mut tree = fft1024();
        let before = tree.delay();
        tree.set_multiplier(large_multiplier(), false);
        assert_eq!(tree.delay(), before + 3);
        let children = tree.children();
        assert_eq!(children[0].multiplier().unwrap().delay(), 6);
        assert_eq!(children[1].multiplier().unwrap().delay(), 6);
        assert_eq!(*children[0].multiplier().unwrap(), default_multiplier());
    }

    #[test]
    fn composite_delay_sums_children() {
        let tree = fft1024();
        let inner = 4 + 16 + 6 + 4;
        let spdf = spdf_stage_delay(64) + 16 + 6;
        assert_eq!(tree.delay(), inner + 1024 + 6 + spdf);
    }

    #[test]
    fn description_lists_every_node() {
        let text = fft1024().description_str();
        assert!(text.starts_with("1024: twiddleBits=twBits, delay="));
        assert!(text.contains("\t16: twiddleBits=twBits"));
        assert!(text.contains("\t\t4: base, 'fft4', scale='SCALE_NONE', delay=4"));
        assert!(text.contains("\t\t4: (spdf stage), delay=54"));
    }

    #[test]
    fn configuration_is_nested() {
        let tree: Fft = Fft4Step::new(16, base(4), base(4).with_output_bit_order(&[1, 0]).unwrap())
            .unwrap()
            .with_twiddle_bits(TwiddleBits::Bits(16))
            .into();
        assert_eq!(
            tree.configuration_str(),
            "Fft4Step(16,\n\
             \tFftBase(4, \"fft4\", \"SCALE_NONE\", 4),\n\
             \tFftBase(4, \"fft4\", \"SCALE_NONE\", 4).output([1, 0]),\n\
             \tmultiplier=Multiplier(\"complexMultiply2\", 6),\n\
             \ttwiddleBits=16)"
        );
    }
}
