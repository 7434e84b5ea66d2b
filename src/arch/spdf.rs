//! SPDF composite: a fixed radix-4 stage in front of one `N/4` sub-core.

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

/// Entity name of the fixed radix-4 stage.
pub const SPDF_STAGE_ENTITY: &str = "fft_spdf_stage";

/// Pipeline delay of the `fft_spdf_stage` entity for an `n`-point transform.
pub fn spdf_stage_delay(n: usize) -> usize {
    n / 2 + 3 + n / 4 + 3
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FftSpdf {
    n: usize,
    order: usize,
    sub1: Fft,
    multiplier: Arc<Multiplier>,
    twiddle_bits: TwiddleBits,
    twiddle: TwiddleSource,
    spdf_delay: usize,
    reorder: Option<Reorder>,
}

impl FftSpdf {
    /// Combine a radix-4 stage with `sub1` of size `n / 4`.
    pub fn new(n: usize, sub1: impl Into<Fft>) -> Result<Self, GenError> {
        let sub1 = sub1.into();
        let product = sub1.size().checked_mul(4);
        if product != Some(n) {
            return Err(GenError::SizeMismatch {
                n,
                product: product.unwrap_or(usize::MAX),
            });
        }
        let order = log2_exact(n)?;
        let reorder = Reorder::for_input_of(&sub1);
        #[cfg(feature = "verbose-logging")]
        {
            log::debug!(
                "spdf {} = 4 x {}{}",
                n,
                sub1.size(),
                if reorder.is_some() { ", reordering sub1 input" } else { "" }
            );
        }
        Ok(FftSpdf {
            n,
            order,
            sub1,
            multiplier: default_multiplier(),
            twiddle_bits: TwiddleBits::default(),
            twiddle: TwiddleSource::for_size(n),
            spdf_delay: spdf_stage_delay(n),
            reorder,
        })
    }

    pub fn with_multiplier(mut self, multiplier: Arc<Multiplier>) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_twiddle_bits(mut self, twiddle_bits: TwiddleBits) -> Self {
        self.twiddle_bits = twiddle_bits;
        self
    }

    pub fn set_multiplier(&mut self, multiplier: Arc<Multiplier>, recursive: bool) {
        if recursive {
            self.sub1.set_multiplier(Arc::clone(&multiplier), true);
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

    pub fn multiplier(&self) -> &Arc<Multiplier> {
        &self.multiplier
    }

    pub fn twiddle_bits(&self) -> &TwiddleBits {
        &self.twiddle_bits
    }

    pub fn twiddle_source(&self) -> TwiddleSource {
        self.twiddle
    }

    pub fn simple_twiddle_rom(&self) -> bool {
        self.twiddle == TwiddleSource::Table
    }

    pub fn twiddle_delay(&self) -> usize {
        self.twiddle.delay()
    }

    /// Delay of the radix-4 stage alone.
    pub fn spdf_delay(&self) -> usize {
        self.spdf_delay
    }

    /// True when a reorder buffer feeds sub1.
    pub fn sub1_reordered(&self) -> bool {
        self.reorder.is_some()
    }

    pub fn reorder_delay(&self) -> usize {
        self.reorder.as_ref().map_or(0, Reorder::delay)
    }

    pub fn reorder_permutation(&self) -> Option<&BitPermutation> {
        self.reorder.as_ref().map(Reorder::permutation)
    }

    pub fn delay(&self) -> usize {
        self.spdf_delay + self.sub1.delay() + self.multiplier.delay() + self.reorder_delay()
    }

    /// The radix-4 stage accepts natural order.
    pub fn input_bit_order(&self) -> BitOrder {
        BitOrder::natural(self.order)
    }

    /// The two radix-4 output bits (swapped) above sub1's output bits.
    pub fn output_bit_order(&self) -> BitOrder {
        let o1 = self.sub1.order();
        BitOrder::from_parts([o1 + 1, o1], &self.sub1.output_bit_order())
    }

    pub fn local_imports(&self) -> Imports {
        let mut imports: Imports = ["twiddleAddrGen", SPDF_STAGE_ENTITY].into_iter().collect();
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
            "FftSpdf({},\n{},\n\tmultiplier={},\n\ttwiddleBits={})",
            self.n,
            vhdl::indent(&self.sub1.configuration_str(), 1),
            self.multiplier.configuration_str(),
            self.twiddle_bits.serialize()
        )
    }

    pub fn description_str(&self) -> String {
        format!(
            "{}: twiddleBits={}, delay={}\n\t4: (spdf stage), delay={}\n{}",
            self.n,
            self.twiddle_bits,
            self.delay(),
            self.spdf_delay,
            vhdl::indent(&self.sub1.description_str(), 1)
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
             signal {0}rbIn, {0}spdfOut: complex;\n\
             signal {0}ph1, {0}ph2: unsigned({0}order-1 downto 0);\n\
             \n\
             -- twiddle generator\n\
             signal {0}bitPermIn,{0}bitPermOut: unsigned(1 downto 0);\n",
            id
        );
        signals += &stages::twiddle_declarations(id);
        if let Some(reorder) = &self.reorder {
            signals += &reorder.gen_declarations(id, self.sub1.order());
        }
        signals
    }

    pub fn gen_body(&self, id: &str, sub1_id: &str) -> String {
        let sub1_order = self.sub1.order();
        let (sub1_in, sub1_phase) = match self.reorder {
            Some(_) => (format!("{}rbIn", id), format!("{}rbInPhase", id)),
            None => (format!("{}din", sub1_id), format!("{}phase", sub1_id)),
        };
        let ph1 = format!("{}ph1", id);

        let mut body = format!(
            "\n\
             {0}spdfStage: entity {1}\n\
             \tgeneric map(N=>{2}, dataBits=>dataBits)\n\
             \tport map(clk=>clk, din=>{0}din, phase=>{0}phase, dout=>{0}spdfOut);\n\
             \n",
            id, SPDF_STAGE_ENTITY, self.order
        );
        body += &stages::phase_register(&ph1, &format!("{}phase", id), self.spdf_delay);
        body += "\n";
        body += &stages::twiddle_addr_gen(id, 2, sub1_order, &ph1);
        body += "\n";
        body += &stages::twiddle_multiply(
            id,
            self.multiplier.entity(),
            &format!("{}spdfOut", id),
            &sub1_in,
        );
        body += "\n";
        body += &stages::phase_register(&format!("{}ph2", id), &ph1, self.multiplier.delay());
        body += &format!(
            "{0} <= {1}ph2({2}-1 downto 0);\n\
             \n\
             {1}dout <= {3}dout;\n\
             \n\
             {1}bitPermOut <= {4};\n",
            sub1_phase,
            id,
            sub1_order,
            sub1_id,
            BitOrder::reversed(2).to_vhdl(&format!("{}bitPermIn", id))
        );
        body += &self.twiddle.gen_body(id, self.n);
        if let Some(reorder) = &self.reorder {
            body += &reorder.gen_body(id, sub1_id, sub1_order);
        }
        body
    }

    /// Stand-alone entity `name`; a composite sub1 is instantiated as
    /// `sub1_name`.
    pub fn gen_entity(&self, name: &str, sub1_name: &str) -> String {
        #[cfg(feature = "verbose-logging")]
        log::debug!("emitting spdf entity {} (N={}, delay={})", name, self.n, self.delay());
        EntityParts {
            name,
            order: self.order,
            input_order: self.input_bit_order(),
            output_order: self.output_bit_order(),
            delay: self.delay(),
            imports: self.local_imports(),
            subs: alloc::vec![SubCore {
                instance: "sub1",
                node: &self.sub1,
                entity: sub1_name,
            }],
            constants: self.gen_constants(""),
            declarations: self.gen_declarations(""),
            body: self.gen_body("", "sub1"),
        }
        .render()
    }
}
