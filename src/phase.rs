//! Phase codes and the quadrature decode table.
//!
//! The A and B channels are combined into a 2-bit phase code with A in the
//! low bit and B in the high bit. A healthy encoder walks the Gray-code
//! cycle below, changing exactly one channel per edge:
//!
//! ```text
//!            forward →
//!   0 (00) → 1 (01) → 3 (11) → 2 (10) → 0
//!            ← reverse
//! ```
//!
//! Codes on opposite corners of the cycle (0↔3, 1↔2) differ in both
//! channels. Seeing one of those means an edge was missed, so the
//! transition is reported as a [`Transition::Fault`] rather than guessed.

/// A 2-bit quadrature phase code, always in `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    /// Build a phase code from the channel levels (A = bit 0, B = bit 1).
    ///
    /// ```
    /// use quadrature_encoder::Phase;
    ///
    /// assert_eq!(Phase::from_levels(true, false).bits(), 1);
    /// assert_eq!(Phase::from_levels(false, true).bits(), 2);
    /// ```
    pub const fn from_levels(a: bool, b: bool) -> Self {
        Self((a as u8) | ((b as u8) << 1))
    }

    /// Build a phase code from its raw value.
    ///
    /// Returns `None` for values above 3.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits <= 3 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Keep only the low two bits.
    pub(crate) const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    /// Raw 2-bit value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level of channel A encoded in this phase.
    pub const fn a(self) -> bool {
        self.0 & 0b01 != 0
    }

    /// Level of channel B encoded in this phase.
    pub const fn b(self) -> bool {
        self.0 & 0b10 != 0
    }
}

/// Outcome of moving from one phase code to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// One step backwards along the cycle (-1).
    Reverse,
    /// Same code as before (0).
    NoChange,
    /// One step forwards along the cycle (+1).
    Forward,
    /// Both channels changed at once; direction is unknown.
    Fault,
}

impl Transition {
    /// Signed count change for this transition, `None` for a fault.
    pub const fn delta(self) -> Option<i32> {
        match self {
            Transition::Reverse => Some(-1),
            Transition::NoChange => Some(0),
            Transition::Forward => Some(1),
            Transition::Fault => None,
        }
    }
}

use Transition::{Fault as F, Forward as Fw, NoChange as Nc, Reverse as Rv};

/// `DECODE_TABLE[previous][new]`, indexed by raw phase codes.
///
/// Forward steps: 0→1, 1→3, 3→2, 2→0. Every other adjacent step is the
/// reverse of one of those.
pub const DECODE_TABLE: [[Transition; 4]; 4] = [
    //  new: 0   1   2   3
    [Nc, Fw, Rv, F], // previous 0
    [Rv, Nc, F, Fw], // previous 1
    [Fw, F, Nc, Rv], // previous 2
    [F, Rv, Fw, Nc], // previous 3
];

/// Look up the transition between two phase codes.
///
/// Total over all 16 pairs, so decoding can never get stuck.
///
/// ```
/// use quadrature_encoder::{decode, Phase, Transition};
///
/// let zero = Phase::from_levels(false, false);
/// let one = Phase::from_levels(true, false);
/// assert_eq!(decode(zero, one), Transition::Forward);
/// assert_eq!(decode(one, zero), Transition::Reverse);
/// ```
pub const fn decode(previous: Phase, new: Phase) -> Transition {
    DECODE_TABLE[previous.0 as usize][new.0 as usize]
}

// ── Unit Tests ───────────────────────────────────────────────────────
