//! Pipeline stages shared by the four-step and SPDF composites.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::Fft;
use crate::bit_order::BitOrder;
use crate::bit_permutation::BitPermutation;
use crate::imports::Imports;
use crate::vhdl;

/// Composites above this size read twiddles from a generator + ROM pair.
pub const TWIDDLE_ROM_THRESHOLD: usize = 32;

/// Read latency of the generator + ROM twiddle path.
pub const ROM_TWIDDLE_DELAY: usize = 7;

/// Read latency of the single-table twiddle path.
pub const TABLE_TWIDDLE_DELAY: usize = 2;

/// Extra data-path latency of the reorder buffer beyond one frame.
pub const REORDER_ADDITIVE_DELAY: usize = 0;

/// How a composite of a given size obtains its twiddle factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwiddleSource {
    /// `twiddleGenerator{N}`: one combinational table.
    Table,
    /// `twiddleGenerator` fed by `twiddleRom{N}`.
    Rom,
}

impl TwiddleSource {
    pub fn for_size(n: usize) -> Self {
        if n > TWIDDLE_ROM_THRESHOLD {
            TwiddleSource::Rom
        } else {
            TwiddleSource::Table
        }
    }

    pub fn delay(self) -> usize {
        match self {
            TwiddleSource::Table => TABLE_TWIDDLE_DELAY,
            TwiddleSource::Rom => ROM_TWIDDLE_DELAY,
        }
    }

    pub fn imports(self, n: usize) -> Vec<String> {
        match self {
            TwiddleSource::Table => alloc::vec![format!("twiddleGenerator{}", n)],
            TwiddleSource::Rom => {
                alloc::vec![String::from("twiddleGenerator"), format!("twiddleRom{}", n)]
            }
        }
    }

    pub(crate) fn gen_body(self, id: &str, n: usize) -> String {
        match self {
            TwiddleSource::Table => format!(
                "\n{0}tw: entity twiddleGenerator{1} port map(clk, {0}twAddr, {0}twData);\n",
                id, n
            ),
            TwiddleSource::Rom => format!(
                "\n{0}tw: entity twiddleGenerator generic map({0}twiddleBits, {0}order)\n\
                 \tport map(clk, {0}twAddr, {0}twData, {0}romAddr, {0}romData);\n\
                 {0}rom: entity twiddleRom{1} port map(clk, {0}romAddr,{0}romData);\n",
                id, n
            ),
        }
    }
}

/// Reorder buffer placed in front of a sub-core that wants non-natural input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reorder {
    perm: BitPermutation,
    delay: usize,
}

impl Reorder {
    /// `None` when `sub` already accepts natural order.
    pub(crate) fn for_input_of(sub: &Fft) -> Option<Self> {
        let order = sub.input_bit_order();
        if order.is_natural() {
            return None;
        }
        Some(Reorder {
            perm: BitPermutation::new(order),
            delay: sub.size() + REORDER_ADDITIVE_DELAY,
        })
    }

    pub(crate) fn delay(&self) -> usize {
        self.delay
    }

    pub(crate) fn permutation(&self) -> &BitPermutation {
        &self.perm
    }

    pub(crate) fn gen_declarations(&self, id: &str, sub_order: usize) -> String {
        format!(
            "{}\nsignal {}rbInPhase: unsigned({}-1 downto 0);\n",
            self.perm.gen_declarations(id),
            id,
            sub_order
        )
    }

    pub(crate) fn gen_body(&self, id: &str, sub_id: &str, sub_order: usize) -> String {
        let mut body = self.perm.gen_body(id);
        body += &format!(
            "\n\
             {0}rb: entity reorderBuffer\n\
             \tgeneric map(N=>{1}, dataBits=>dataBits, repPeriod=>{2}, bitPermDelay=>{3}, dataPathDelay=>{4})\n\
             \tport map(clk, din=>{0}rbIn, phase=>{0}rbInPhase, dout=>{5}din,\n\
             \t\tbitPermIn=>{6}, bitPermCount=>{7}, bitPermOut=>{8});\n\
             \n\
             {5}phase <= {0}rbInPhase-{4};\n",
            id,
            sub_order,
            self.perm.rep_len(),
            self.perm.delay(),
            REORDER_ADDITIVE_DELAY,
            sub_id,
            self.perm.sig_in(id),
            self.perm.sig_count(id),
            self.perm.sig_out(id),
        );
        body
    }
}

/// `N`, `twiddleBits`, `twiddleDelay`, `order` and `delay` constants.
pub(crate) fn composite_constants(
    id: &str,
    n: usize,
    order: usize,
    twiddle_bits: &str,
    twiddle_delay: usize,
    delay: usize,
) -> String {
    vhdl::constants(
        id,
        &[
            ("N", format!("{}", n)),
            ("twiddleBits", String::from(twiddle_bits)),
            ("twiddleDelay", format!("{}", twiddle_delay)),
            ("order", format!("{}", order)),
            ("delay", format!("{}", delay)),
        ],
    )
}

pub(crate) fn twiddle_declarations(id: &str) -> String {
    format!(
        "signal {0}twAddr: unsigned({0}order-1 downto 0);\n\
         signal {0}twData: complex;\n\
         \n\
         signal {0}romAddr: unsigned({0}order-4 downto 0);\n\
         signal {0}romData: std_logic_vector({0}twiddleBits*2-3 downto 0);\n",
        id
    )
}

pub(crate) fn twiddle_addr_gen(id: &str, sub_order1: usize, sub_order2: usize, phase: &str) -> String {
    format!(
        "{0}twAG: entity twiddleAddrGen\n\
         \tgeneric map(\n\
         \t\tsubOrder1=>{1},\n\
         \t\tsubOrder2=>{2},\n\
         \t\ttwiddleDelay=>{0}twiddleDelay,\n\
         \t\tcustomSubOrder=>true)\n\
         \tport map(\n\
         \t\tclk=>clk,\n\
         \t\tphase=>{3},\n\
         \t\ttwAddr=>{0}twAddr,\n\
         \t\tbitPermIn=>{0}bitPermIn,\n\
         \t\tbitPermOut=>{0}bitPermOut);\n",
        id, sub_order1, sub_order2, phase
    )
}

pub(crate) fn twiddle_multiply(id: &str, multiplier: &str, data_in: &str, data_out: &str) -> String {
    format!(
        "{0}twMult: entity {1}\n\
         \tgeneric map(in1Bits=>{0}twiddleBits+1,\n\
         \t\t\t\tin2Bits=>dataBits,\n\
         \t\t\t\toutBits=>dataBits)\n\
         \tport map(clk=>clk, in1=>{0}twData, in2=>{2}, out1=>{3});\n",
        id, multiplier, data_in, data_out
    )
}

/// Registered phase decrement that keeps control aligned with a stage of
/// `delay` cycles.
pub(crate) fn phase_register(dest: &str, src: &str, delay: usize) -> String {
    format!("{} <= {}-{}+1 when rising_edge(clk);\n", dest, src, delay)
}

/// One sub-core of a composite as seen by the entity emitter.
pub(crate) struct SubCore<'a> {
    pub instance: &'a str,
    pub node: &'a Fft,
    pub entity: &'a str,
}

impl SubCore<'_> {
    fn instantiation(&self) -> String {
        match self.node {
            Fft::Base(base) => base.gen_body(self.instance),
            _ => vhdl::composite_instance(self.instance, self.entity),
        }
    }
}

/// Everything a composite contributes to its stand-alone entity.
pub(crate) struct EntityParts<'a> {
    pub name: &'a str,
    pub order: usize,
    pub input_order: BitOrder,
    pub output_order: BitOrder,
    pub delay: usize,
    pub imports: Imports,
    pub subs: Vec<SubCore<'a>>,
    pub constants: String,
    pub declarations: String,
    pub body: String,
}

impl EntityParts<'_> {
    pub(crate) fn render(self) -> String {
        let imports = self
            .subs
            .iter()
            .fold(self.imports.clone(), |acc, sub| {
                acc.union(&core::iter::once(sub.entity).collect())
            });

        let mut code = String::from(vhdl::LIBRARY_HEADER);
        code += &vhdl::use_clauses(&imports);
        code += &format!(
            "\n\
             -- data input bit order: {0}\n\
             -- data output bit order: {1}\n\
             -- phase should be 0,1,2,3,4,5,6,...\n\
             -- delay is {2}\n\
             entity {3} is\n\
             \tgeneric(dataBits: integer := 24;\n\
             \t\t\ttwBits: integer := 12);\n\
             \tport(clk: in std_logic;\n\
             \t\tdin: in complex;\n\
             \t\tphase: in unsigned({4}-1 downto 0);\n\
             \t\tdout: out complex\n\
             \t\t);\n\
             end entity;\n\
             architecture ar of {3} is\n",
            self.input_order.describe(),
            self.output_order.describe(),
            self.delay,
            self.name,
            self.order,
        );

        let data_signals: Vec<String> = self
            .subs
            .iter()
            .flat_map(|sub| [format!("{}din", sub.instance), format!("{}dout", sub.instance)])
            .collect();
        code += &format!("\tsignal {}: complex;\n", data_signals.join(", "));
        for sub in &self.subs {
            code += &format!(
                "\tsignal {}phase: unsigned({}-1 downto 0);\n",
                sub.instance,
                sub.node.order()
            );
        }

        code += &vhdl::indent(&self.constants, 1);
        code += "\n\t--=======================================\n\n";
        code += &vhdl::indent(&self.declarations, 1);
        code += "\nbegin\n";
        code += &vhdl::indent(&self.body, 1);
        for sub in &self.subs {
            code += "\n";
            code += &vhdl::indent(&sub.instantiation(), 1);
        }
        code += "\nend ar;\n";
        code
    }
}
