//! Error types for encoder registration and lookup.
//!
//! Decode faults are not errors: they are counted and latched on the
//! decoder (see [`QuadratureDecoder::consume_fault()`](crate::QuadratureDecoder::consume_fault)).

use core::fmt;

/// Errors raised while registering an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    /// The registry already holds [`MAX_ENCODERS`](crate::MAX_ENCODERS) encoders.
    RegistryFull,

    /// Channel A or B has no pin assigned.
    ///
    /// The slot is still allocated (indices never shift), but the encoder
    /// is not in use: no interrupts were bound and all reads return zero.
    ChannelUnassigned {
        /// Slot that was allocated for the encoder.
        slot: usize,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::RegistryFull => write!(f, "Encoder registry is full"),
            ConfigurationError::ChannelUnassigned { slot } => {
                write!(f, "Encoder {} has no pin on channel A or B", slot)
            }
        }
    }
}

/// Lookup of a slot index that was never registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidEncoder {
    /// Index that was requested.
    pub index: usize,
    /// Number of registered encoders at the time of the lookup.
    pub registered: usize,
}

impl fmt::Display for InvalidEncoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid encoder index {} ({} registered)",
            self.index, self.registered
        )
    }
}
