//! Leaf nodes wrapping a hand-written FFT core.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::bit_order::{log2_exact, BitOrder};
use crate::error::GenError;
use crate::imports::Imports;

/// A primitive FFT entity of size `n` with a declared pipeline delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FftBase {
    n: usize,
    order: usize,
    entity: String,
    scale: String,
    delay: usize,
    input_order: BitOrder,
    output_order: BitOrder,
}

impl FftBase {
    /// `scale` is passed through verbatim as the entity's `scale` generic.
    pub fn new(
        n: usize,
        entity: impl Into<String>,
        scale: impl Into<String>,
        delay: usize,
    ) -> Result<Self, GenError> {
        let order = log2_exact(n)?;
        Ok(FftBase {
            n,
            order,
            entity: entity.into(),
            scale: scale.into(),
            delay,
            input_order: BitOrder::natural(order),
            output_order: BitOrder::natural(order),
        })
    }

    pub fn with_input_bit_order(mut self, bits: &[usize]) -> Result<Self, GenError> {
        self.set_input_bit_order(bits)?;
        Ok(self)
    }

    pub fn with_output_bit_order(mut self, bits: &[usize]) -> Result<Self, GenError> {
        self.set_output_bit_order(bits)?;
        Ok(self)
    }

    /// Declare the order the core expects its input in.
    pub fn set_input_bit_order(&mut self, bits: &[usize]) -> Result<(), GenError> {
        self.input_order = self.checked_order(bits)?;
        Ok(())
    }

    /// Declare the order the core produces its output in.
    pub fn set_output_bit_order(&mut self, bits: &[usize]) -> Result<(), GenError> {
        self.output_order = self.checked_order(bits)?;
        Ok(())
    }

    fn checked_order(&self, bits: &[usize]) -> Result<BitOrder, GenError> {
        if bits.len() != self.order {
            return Err(GenError::BitOrderLength {
                expected: self.order,
                actual: bits.len(),
            });
        }
        BitOrder::new(Vec::from(bits))
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// log2 of the size.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn scale(&self) -> &str {
        &self.scale
    }

    pub fn delay(&self) -> usize {
        self.delay
    }

    pub fn input_bit_order(&self) -> &BitOrder {
        &self.input_order
    }

    pub fn output_bit_order(&self) -> &BitOrder {
        &self.output_order
    }

    pub fn local_imports(&self) -> Imports {
        core::iter::once(self.entity.as_str()).collect()
    }

    pub fn configuration_str(&self) -> String {
        let mut res = format!(
            "FftBase({}, \"{}\", \"{}\", {})",
            self.n, self.entity, self.scale, self.delay
        );
        if !self.input_order.is_natural() {
            res += &format!(".input({})", self.input_order);
        }
        if !self.output_order.is_natural() {
            res += &format!(".output({})", self.output_order);
        }
        res
    }

    pub fn description_str(&self) -> String {
        format!(
            "{}: base, '{}', scale='{}', delay={}",
            self.n, self.entity, self.scale, self.delay
        )
    }

    /// Inline instantiation of the core under instance prefix `id`.
    pub fn gen_body(&self, id: &str) -> String {
        format!(
            "{0}inst: entity {1}\n\
             \tgeneric map(dataBits=>dataBits, scale=>{2})\n\
             \tport map(clk=>clk, din=>{0}din, phase=>{0}phase, dout=>{0}dout);",
            id, self.entity, self.scale
        )
    }
}
