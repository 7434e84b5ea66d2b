//! Four-step (Cooley–Tukey) composite.
//!
//! An `N = N1 * N2` point transform is computed as `N2` transforms of size
//! `N1` (sub1), a transpose, a twiddle multiply, and `N1` transforms of size
//! `N2` (sub2). If sub2 needs its input in a non-natural order a reorder
//! buffer is placed in front of it. sub1 never gets one: whatever order it
//! needs is exported through [`Fft4Step::input_bit_order`] for the caller to
//! honour.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use super::stages::{self, EntityParts, Reorder, SubCore, TwiddleSource};
use super::{Fft, TwiddleBits};
use crate::bit_order::{log2_exact, BitOrder};
use crate::bit_permutation::BitPermutation;
use crate::error::GenError;
use crate::imports::Imports;
use crate::multiplier::{default_multiplier, Multiplier};
use crate::vhdl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fft4Step {
    n: usize,
    order: usize,
    sub1: Fft,
    sub2: Fft,
    multiplier: Arc<Multiplier>,
    twiddle_bits: TwiddleBits,
    twiddle: TwiddleSource,
    reorder: Option<Reorder>,
}

impl Fft4Step {
    /// Combine `sub1` (size N1) and `sub2` (size N2) into an `n`-point core.
    ///
    /// Uses the default multiplier and the symbolic `twBits` twiddle width.
    pub fn new(n: usize, sub1: impl Into<Fft>, sub2: impl Into<Fft>) -> Result<Self, GenError> {
        let sub1 = sub1.into();
        let sub2 = sub2.into();
        let product = sub1.size().checked_mul(sub2.size());
        if product != Some(n) {
            return Err(GenError::SizeMismatch {
                n,
                product: product.unwrap_or(usize::MAX),
            });
        }
        let order = log2_exact(n)?;
        let reorder = Reorder::for_input_of(&sub2);
        #[cfg(feature = "verbose-logging")]
        {
            log::debug!(
                "four-step {} = {} x {}{}",
                n,
                sub1.size(),
                sub2.size(),
                if reorder.is_some() { ", reordering sub2 input" } else { "" }
            );
        }
        Ok(Fft4Step {
            n,
            order,
            sub1,
            sub2,
            multiplier: default_multiplier(),
            twiddle_bits: TwiddleBits::default(),
            twiddle: TwiddleSource::for_size(n),
            reorder,
        })
    }

    /// Use `multiplier` for this node only.
    pub fn with_multiplier(mut self, multiplier: Arc<Multiplier>) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_twiddle_bits(mut self, twiddle_bits: TwiddleBits) -> Self {
        self.twiddle_bits = twiddle_bits;
        self
    }

    /// Replace the multiplier, and with `recursive` that of every composite
    /// below this node.
    pub fn set_multiplier(&mut self, multiplier: Arc<Multiplier>, recursive: bool) {
        if recursive {
            self.sub1.set_multiplier(Arc::clone(&multiplier), true);
            self.sub2.set_multiplier(Arc::clone(&multiplier), true);
        }
        self.multiplier = multiplier;
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn sub1(&self) -> &Fft {
        &self.sub1
    }

    pub fn sub2(&self) -> &Fft {
        &self.sub2
    }

    pub fn multiplier(&self) -> &Arc<Multiplier> {
        &self.multiplier
    }

    pub fn twiddle_bits(&self) -> &TwiddleBits {
        &self.twiddle_bits
    }

    pub fn twiddle_source(&self) -> TwiddleSource {
        self.twiddle
    }

    /// True when twiddles come from a single `twiddleGenerator{N}` table.
    pub fn simple_twiddle_rom(&self) -> bool {
        self.twiddle == TwiddleSource::Table
    }

    pub fn twiddle_delay(&self) -> usize {
        self.twiddle.delay()
    }

    /// True when a reorder buffer feeds sub2.
    pub fn sub2_reordered(&self) -> bool {
        self.reorder.is_some()
    }

    pub fn reorder_delay(&self) -> usize {
        self.reorder.as_ref().map_or(0, Reorder::delay)
    }

    pub fn reorder_permutation(&self) -> Option<&BitPermutation> {
        self.reorder.as_ref().map(Reorder::permutation)
    }

    /// sub1 + one transposer pass + multiply + sub2, plus reordering.
    pub fn delay(&self) -> usize {
        self.sub1.delay() + self.n + self.multiplier.delay() + self.sub2.delay() + self.reorder_delay()
    }

    /// sub2's address bits come first (rotated above sub1's), then sub1's own
    /// input order.
    pub fn input_bit_order(&self) -> BitOrder {
        let o1 = self.sub1.order();
        let o2 = self.sub2.order();
        BitOrder::from_parts(o1..o1 + o2, &self.sub1.input_bit_order())
    }

    /// sub1's output bits shifted above sub2's, then sub2's output bits.
    pub fn output_bit_order(&self) -> BitOrder {
        let o2 = self.sub2.order();
        BitOrder::from_parts(
            self.sub1.output_bit_order().shifted(o2),
            &self.sub2.output_bit_order(),
        )
    }

    /// Components this node instantiates directly.
    pub fn local_imports(&self) -> Imports {
        let mut imports: Imports = ["twiddleAddrGen", "transposer"].into_iter().collect();
        for name in self.twiddle.imports(self.n) {
            imports.insert(name);
        }
        if self.reorder.is_some() {
            imports.insert("reorderBuffer");
        }
        imports.insert(self.multiplier.entity());
        imports
    }

    pub fn configuration_str(&self) -> String {
        format!(
            "Fft4Step({},\n{},\n{},\n\tmultiplier={},\n\ttwiddleBits={})",
            self.n,
            vhdl::indent(&self.sub1.configuration_str(), 1),
            vhdl::indent(&self.sub2.configuration_str(), 1),
            self.multiplier.configuration_str(),
            self.twiddle_bits.serialize()
        )
    }

    pub fn description_str(&self) -> String {
        format!(
            "{}: twiddleBits={}, delay={}\n{}\n{}",
            self.n,
            self.twiddle_bits,
            self.delay(),
            vhdl::indent(&self.sub1.description_str(), 1),
            vhdl::indent(&self.sub2.description_str(), 1)
        )
    }

    pub fn gen_constants(&self, id: &str) -> String {
        let mut constants = stages::composite_constants(
            id,
            self.n,
            self.order,
            &self.twiddle_bits.to_string(),
            self.twiddle_delay(),
            self.delay(),
        );
        if let Some(reorder) = &self.reorder {
            constants += &reorder.permutation().gen_constants(id);
        }
        constants
    }

    pub fn gen_declarations(&self, id: &str) -> String {
        let mut signals = format!(
            "\n\
             signal {0}ph1, {0}ph2, {0}ph3: unsigned({0}order-1 downto 0);\n\
             signal {0}rbIn, {0}transpOut: complex;\n\
             signal {0}bitPermIn,{0}bitPermOut: unsigned({1}-1 downto 0);\n\
             \n\
             -- twiddle generator\n",
            id,
            self.sub1.order()
        );
        signals += &stages::twiddle_declarations(id);
        if let Some(reorder) = &self.reorder {
            signals += &reorder.gen_declarations(id, self.sub2.order());
        }
        signals
    }

    /// Architecture body with sub-cores under prefixes `sub1_id`/`sub2_id`.
    pub fn gen_body(&self, id: &str, sub1_id: &str, sub2_id: &str) -> String {
        let sub1_order = self.sub1.order();
        let sub2_order = self.sub2.order();
        let (sub2_in, sub2_phase) = match self.reorder {
            Some(_) => (format!("{}rbIn", id), format!("{}rbInPhase", id)),
            None => (format!("{}din", sub2_id), format!("{}phase", sub2_id)),
        };
        let transp_phase = format!("{}ph1", id);
        let twiddle_phase = format!("{}ph2", id);

        let mut body = format!(
            "\n\
             {1}din <= {0}din;\n\
             {1}phase <= {0}phase({2}-1 downto 0);\n\
             \n",
            id, sub1_id, sub1_order
        );
        body += &stages::phase_register(&transp_phase, &format!("{}phase", id), self.sub1.delay());
        body += &format!(
            "\n\
             {0}transp: entity transposer\n\
             \tgeneric map(N1=>{1}, N2=>{2}, dataBits=>dataBits)\n\
             \tport map(clk=>clk, din=>{3}dout, phase=>{4}, dout=>{0}transpOut);\n\
             \n\
             {5} <= {4};\n\
             \n",
            id, sub2_order, sub1_order, sub1_id, transp_phase, twiddle_phase
        );
        body += &stages::twiddle_addr_gen(id, sub1_order, sub2_order, &twiddle_phase);
        body += "\n";
        body += &stages::twiddle_multiply(
            id,
            self.multiplier.entity(),
            &format!("{}transpOut", id),
            &sub2_in,
        );
        body += "\n";
        body += &stages::phase_register(&format!("{}ph3", id), &twiddle_phase, self.multiplier.delay());
        body += &format!(
            "{0} <= {1}ph3({2}-1 downto 0);\n\
             {1}dout <= {3}dout;\n\
             {1}bitPermOut <= {4};\n",
            sub2_phase,
            id,
            sub2_order,
            sub2_id,
            self.sub1.output_bit_order().to_vhdl(&format!("{}bitPermIn", id))
        );
        body += &self.twiddle.gen_body(id, self.n);
        if let Some(reorder) = &self.reorder {
            body += &reorder.gen_body(id, sub2_id, sub2_order);
        }
        body
    }

    /// Stand-alone entity `name`, instantiating composite children as
    /// `sub1_name`/`sub2_name` (leaves are instantiated directly).
    pub fn gen_entity(&self, name: &str, sub1_name: &str, sub2_name: &str) -> String {
        #[cfg(feature = "verbose-logging")]
        log::debug!("emitting four-step entity {} (N={}, delay={})", name, self.n, self.delay());
        EntityParts {
            name,
            order: self.order,
            input_order: self.input_bit_order(),
            output_order: self.output_bit_order(),
            delay: self.delay(),
            imports: self.local_imports(),
            subs: alloc::vec![
                SubCore {
                    instance: "sub1",
                    node: &self.sub1,
                    entity: sub1_name,
                },
                SubCore {
                    instance: "sub2",
                    node: &self.sub2,
                    entity: sub2_name,
                },
            ],
            constants: self.gen_constants(""),
            declarations: self.gen_declarations(""),
            body: self.gen_body("", "sub1", "sub2"),
        }
        .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::FftBase;
    use crate::multiplier::large_multiplier;

    fn base(n: usize, delay: usize) -> FftBase {
        FftBase::new(n, format!("fft{}", n), "SCALE_NONE", delay).unwrap()
    }

    #[test]
    fn rejects_size_mismatch() {
        assert_eq!(
            Fft4Step::new(32, base(8, 8), base(8, 8)),
            Err(GenError::SizeMismatch { n: 32, product: 64 })
        );
    }

    #[test]
    fn sixty_four_from_two_eights() {
        let f = Fft4Step::new(64, base(8, 8), base(8, 8)).unwrap();
        assert!(!f.simple_twiddle_rom());
        assert_eq!(f.twiddle_delay(), 7);
        assert!(!f.sub2_reordered());
        assert_eq!(f.delay(), 8 + 64 + 6 + 8);
        let imports = f.local_imports();
        assert!(imports.contains("twiddleGenerator"));
        assert!(imports.contains("twiddleRom64"));
        assert!(imports.contains("complexMultiply2"));
        assert!(!imports.contains("reorderBuffer"));
    }

    #[test]
    fn small_composites_use_a_single_table() {
        let f = Fft4Step::new(16, base(4, 5), base(4, 5)).unwrap();
        assert!(f.simple_twiddle_rom());
        assert_eq!(f.twiddle_delay(), 2);
        assert!(f.local_imports().contains("twiddleGenerator16"));
        let f = Fft4Step::new(32, base(4, 5), base(8, 5)).unwrap();
        assert!(f.simple_twiddle_rom());
    }

    #[test]
    fn reorders_non_natural_sub2_input() {
        let sub2 = base(4, 4).with_input_bit_order(&[1, 0]).unwrap();
        let f = Fft4Step::new(16, base(4, 4), sub2).unwrap();
        assert!(f.sub2_reordered());
        assert_eq!(f.reorder_delay(), 4);
        assert_eq!(f.delay(), 4 + 16 + 6 + 4 + 4);
        assert!(f.local_imports().contains("reorderBuffer"));
        assert_eq!(f.reorder_permutation().unwrap().rep_len(), 2);
    }

    #[test]
    fn non_natural_sub1_input_is_exported_not_reordered() {
        let sub1 = base(4, 4).with_input_bit_order(&[1, 0]).unwrap();
        let f = Fft4Step::new(16, sub1, base(4, 4)).unwrap();
        assert!(!f.sub2_reordered());
        assert_eq!(f.input_bit_order().as_slice(), &[2, 3, 1, 0]);
    }

    #[test]
    fn derived_bit_orders() {
        let f = Fft4Step::new(32, base(4, 4), base(8, 8)).unwrap();
        assert_eq!(f.input_bit_order().as_slice(), &[2, 3, 4, 0, 1]);
        assert_eq!(f.output_bit_order().as_slice(), &[3, 4, 0, 1, 2]);
    }

    #[test]
    fn constructor_multiplier_is_local() {
        let f = Fft4Step::new(64, base(8, 8), base(8, 8))
            .unwrap()
            .with_multiplier(large_multiplier());
        assert_eq!(f.delay(), 8 + 64 + 9 + 8);
        assert!(f.local_imports().contains("dsp48e1_complexMultiply"));
        assert!(!f.local_imports().contains("complexMultiply2"));
    }

    #[test]
    fn body_phase_arithmetic_tracks_stage_delays() {
        let f = Fft4Step::new(64, base(8, 11), base(8, 8)).unwrap();
        let body = f.gen_body("", "sub1", "sub2");
        assert!(body.contains("ph1 <= phase-11+1 when rising_edge(clk);"));
        assert!(body.contains("ph2 <= ph1;"));
        assert!(body.contains("ph3 <= ph2-6+1 when rising_edge(clk);"));
        assert!(body.contains("sub2phase <= ph3(3-1 downto 0);"));
        assert!(body.contains("out1=>sub2din);"));
        assert!(body.contains("bitPermOut <= bitPermIn(2) & bitPermIn(1) & bitPermIn(0);"));
        assert!(body.contains("rom: entity twiddleRom64"));
    }

    #[test]
    fn body_routes_through_reorder_buffer() {
        let sub2 = base(4, 4).with_input_bit_order(&[1, 0]).unwrap();
        let f = Fft4Step::new(16, base(4, 4), sub2).unwrap();
        let body = f.gen_body("", "sub1", "sub2");
        assert!(body.contains("out1=>rbIn);"));
        assert!(body.contains("rbInPhase <= ph3(2-1 downto 0);"));
        assert!(body.contains("rP1 <= rP0(0) & rP0(1) when rCnt(0)='1' else rP0;"));
        assert!(body.contains("repPeriod=>2"));
        assert!(body.contains("sub2phase <= rbInPhase-0;"));
        assert!(body.contains("tw: entity twiddleGenerator16 port map"));
    }
}
