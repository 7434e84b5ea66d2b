//! Bit-order algebra.
//!
//! A [`BitOrder`] of length `k` describes how the `k` address bits of an
//! `N = 2^k` point stream are arranged. Entry `i` names the bit of the
//! *natural* address that sits at position `i` of the represented address, so
//! applying `[1, 2, 3, 0]` to `0b0001` yields `0b1000`. The identity order
//! `[0, 1, .., k-1]` is natural order.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::GenError;

/// Exact base-2 logarithm of a positive power of two.
pub fn log2_exact(n: usize) -> Result<usize, GenError> {
    if n == 0 || !n.is_power_of_two() {
        return Err(GenError::NotPowerOfTwo(n));
    }
    Ok(n.trailing_zeros() as usize)
}

/// A permutation of address bits. Always a bijection on `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitOrder(Vec<usize>);

impl BitOrder {
    /// Natural order on `k` bits.
    pub fn natural(k: usize) -> Self {
        BitOrder((0..k).collect())
    }

    /// Bit-reversed order on `k` bits.
    pub fn reversed(k: usize) -> Self {
        BitOrder((0..k).rev().collect())
    }

    /// Validate `bits` as a permutation of `0..bits.len()`.
    pub fn new(bits: Vec<usize>) -> Result<Self, GenError> {
        let mut seen = alloc::vec![false; bits.len()];
        for &b in &bits {
            if b >= bits.len() || seen[b] {
                return Err(GenError::NotAPermutation(bits));
            }
            seen[b] = true;
        }
        Ok(BitOrder(bits))
    }

    /// Build an order from pieces already known to form a permutation.
    pub(crate) fn from_parts(head: impl IntoIterator<Item = usize>, tail: &BitOrder) -> Self {
        let mut bits: Vec<usize> = head.into_iter().collect();
        bits.extend_from_slice(&tail.0);
        debug_assert!(BitOrder::new(bits.clone()).is_ok(), "{:?}", bits);
        BitOrder(bits)
    }

    /// Copy of this order with every entry raised by `offset`.
    ///
    /// The result is not a permutation on its own; composites stack it above
    /// another order with [`BitOrder::from_parts`].
    pub(crate) fn shifted(&self, offset: usize) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(move |&b| b + offset)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// True iff this is the identity permutation.
    pub fn is_natural(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &b)| i == b)
    }

    /// Permute the low `len()` bits of `addr`; higher bits are dropped.
    pub fn apply(&self, addr: usize) -> usize {
        self.0
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &src)| acc | (((addr >> src) & 1) << i))
    }

    /// The order equivalent to applying `self` and then `next`.
    ///
    /// Both orders must have the same length.
    pub fn then(&self, next: &BitOrder) -> BitOrder {
        debug_assert_eq!(self.len(), next.len());
        BitOrder(next.0.iter().map(|&q| self.0[q]).collect())
    }

    /// `self` composed with itself `n` times; `n == 0` gives natural order.
    pub fn n_times(&self, n: usize) -> BitOrder {
        let mut acc = BitOrder::natural(self.len());
        for _ in 0..n {
            acc = acc.then(self);
        }
        acc
    }

    /// Smallest `p > 0` such that applying the order `p` times is the
    /// identity: the least common multiple of its cycle lengths.
    pub fn minimal_period(&self) -> usize {
        let mut visited = alloc::vec![false; self.len()];
        let mut period = 1;
        for start in 0..self.len() {
            if visited[start] {
                continue;
            }
            let mut len = 0;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = self.0[i];
                len += 1;
            }
            period = lcm(period, len);
        }
        period
    }

    /// VHDL expression that reorders the bits of `signal`, MSB first.
    pub fn to_vhdl(&self, signal: &str) -> String {
        match self.0.as_slice() {
            [] => String::from(signal),
            [only] => format!("(0 => {}({}))", signal, only),
            bits => bits
                .iter()
                .rev()
                .map(|b| format!("{}({})", signal, b))
                .collect::<Vec<_>>()
                .join(" & "),
        }
    }

    /// Short text for VHDL comments.
    pub fn describe(&self) -> String {
        if self.is_natural() {
            return String::from("natural");
        }
        let list = format!("{:?}", self.0);
        if *self == BitOrder::reversed(self.len()) {
            format!("bit-reversed {}", list)
        } else {
            list
        }
    }
}

impl fmt::Display for BitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl AsRef<[usize]> for BitOrder {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}
