//! Staged address permutation network driving a reorder buffer.
//!
//! A reorder buffer rewrites frame `c` in the order `o^c`. The network below
//! computes that address with one 2-way stage per counter bit: stage `i`
//! applies `o^(2^i)` when bit `i` of the replication counter is set.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::bit_order::BitOrder;

/// Streaming schedule for a non-natural bit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPermutation {
    order: BitOrder,
    n: usize,
    rep_len: usize,
    state_bits: usize,
}

impl BitPermutation {
    pub fn new(order: BitOrder) -> Self {
        let rep_len = order.minimal_period();
        let state_bits = rep_len.next_power_of_two().trailing_zeros() as usize;
        BitPermutation {
            n: order.len(),
            order,
            rep_len,
            state_bits,
        }
    }

    pub fn bit_order(&self) -> &BitOrder {
        &self.order
    }

    /// Number of address bits permuted.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Frames after which the schedule repeats.
    pub fn rep_len(&self) -> usize {
        self.rep_len
    }

    /// Width of the replication counter.
    pub fn state_bits(&self) -> usize {
        self.state_bits
    }

    /// The network is combinational.
    pub fn delay(&self) -> usize {
        0
    }

    /// Order applied per stage: `o`, `o^2`, `o^4`, ...
    pub fn stage_orders(&self) -> Vec<BitOrder> {
        let mut orders = Vec::with_capacity(self.state_bits);
        let mut current = self.order.clone();
        for _ in 0..self.state_bits {
            let next = current.n_times(2);
            orders.push(current);
            current = next;
        }
        orders
    }

    /// Effective order produced for counter value `count`.
    pub fn schedule(&self, count: usize) -> BitOrder {
        self.stage_orders()
            .iter()
            .enumerate()
            .filter(|(i, _)| (count >> i) & 1 == 1)
            .fold(BitOrder::natural(self.n), |acc, (_, stage)| acc.then(stage))
    }

    pub fn sig_in(&self, id: &str) -> String {
        format!("{}rP0", id)
    }

    pub fn sig_out(&self, id: &str) -> String {
        format!("{}rP{}", id, self.state_bits)
    }

    pub fn sig_count(&self, id: &str) -> String {
        format!("{}rCnt", id)
    }

    pub fn gen_constants(&self, _id: &str) -> String {
        String::new()
    }

    pub fn gen_declarations(&self, id: &str) -> String {
        let mut decls: Vec<String> = (0..=self.state_bits)
            .map(|i| format!("signal {}rP{}: unsigned({}-1 downto 0);", id, i, self.n))
            .collect();
        decls.push(format!(
            "signal {}: unsigned({}-1 downto 0);",
            self.sig_count(id),
            self.state_bits
        ));
        decls.join("\n")
    }

    pub fn gen_body(&self, id: &str) -> String {
        let mut buf = String::new();
        for (i, stage) in self.stage_orders().iter().enumerate() {
            let keep = format!("{}rP{}", id, i);
            let permuted = stage.to_vhdl(&keep);
            buf += &format!(
                "{}rP{} <= {} when {}({})='1' else {};\n",
                id,
                i + 1,
                permuted,
                self.sig_count(id),
                i,
                keep
            );
        }
        buf
    }
}
