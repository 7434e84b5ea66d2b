//! Complex multiplier descriptors.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

/// Entity and pipeline delay of the default complex multiplier.
pub const DEFAULT_MULTIPLIER: (&str, usize) = ("complexMultiply2", 6);

/// DSP48E1-mapped multiplier for wide twiddles.
pub const LARGE_MULTIPLIER: (&str, usize) = ("dsp48e1_complexMultiply", 9);

/// An opaque complex multiplier entity with a fixed pipeline delay.
///
/// Descriptors are immutable and shared between nodes through [`Arc`];
/// replacing a node's multiplier swaps the reference, never the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Multiplier {
    entity: String,
    delay: usize,
}

impl Multiplier {
    pub fn new(entity: impl Into<String>, delay: usize) -> Self {
        Multiplier {
            entity: entity.into(),
            delay,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Pipeline delay in clock cycles.
    pub fn delay(&self) -> usize {
        self.delay
    }

    pub fn configuration_str(&self) -> String {
        format!("Multiplier(\"{}\", {})", self.entity, self.delay)
    }

    pub fn description_str(&self) -> String {
        format!("'{}', delay={}", self.entity, self.delay)
    }
}

pub fn default_multiplier() -> Arc<Multiplier> {
    Arc::new(Multiplier::new(DEFAULT_MULTIPLIER.0, DEFAULT_MULTIPLIER.1))
}

pub fn large_multiplier() -> Arc<Multiplier> {
    Arc::new(Multiplier::new(LARGE_MULTIPLIER.0, LARGE_MULTIPLIER.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins() {
        let m = default_multiplier();
        assert_eq!(m.entity(), "complexMultiply2");
        assert_eq!(m.delay(), 6);
        assert_eq!(large_multiplier().delay(), 9);
        assert_eq!(m.configuration_str(), "Multiplier(\"complexMultiply2\", 6)");
        assert_eq!(m.description_str(), "'complexMultiply2', delay=6");
    }
}
