//! Fixed-capacity collection of encoders with stable slot indices.
//!
//! Encoders are registered once during setup and never removed, so a slot
//! index handed out by [`EncoderRegistry::register()`] stays valid for the
//! life of the program. After setup the registry is only used through
//! `&self`: edge interrupts go through [`EncoderRegistry::dispatch()`] and
//! the application polls the `read_*` accessors.
//!
//! # Typical wiring
//!
//! ```ignore
//! static REGISTRY: StaticCell<EncoderRegistry> = StaticCell::new();
//!
//! let registry = REGISTRY.init(EncoderRegistry::new());
//! registry.register(EncoderConfig::from_raw(800, 2, 3, 4), &mut board, &mut binder)?;
//! let registry: &'static EncoderRegistry = registry;
//!
//! // In the edge handler, with the callback stored by the binder:
//! registry.dispatch(callback, &board);
//! ```

use heapless::Vec;

use crate::decoder::{EncoderConfig, EncoderSnapshot, QuadratureDecoder};
use crate::error::{ConfigurationError, InvalidEncoder};
use crate::pins::{DigitalRead, EdgeCallback, EdgeKind, InterruptBinder, PinSetup};

/// Maximum number of encoders a registry can hold (X, Y and Z axes).
pub const MAX_ENCODERS: usize = 3;

/// Owns every registered [`QuadratureDecoder`].
#[derive(Debug, Default)]
pub struct EncoderRegistry {
    slots: Vec<QuadratureDecoder, MAX_ENCODERS>,
}

impl EncoderRegistry {
    /// Create an empty registry. Usable in `static` initialisers.
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    // ── Setup ────────────────────────────────────────────────────────

    /// Register an encoder and bind its edge interrupts.
    ///
    /// The returned slot index equals the registration order (0, 1, 2).
    /// Call this only during setup, before edge interrupts are enabled.
    ///
    /// # Errors
    /// * [`ConfigurationError::RegistryFull`] if [`MAX_ENCODERS`] encoders
    ///   are already registered. The registry is left unchanged.
    /// * [`ConfigurationError::ChannelUnassigned`] if channel A or B has no
    ///   pin. The slot is still taken by a not-in-use encoder so later
    ///   indices do not shift.
    pub fn register<IO, B>(
        &mut self,
        config: EncoderConfig,
        io: &mut IO,
        binder: &mut B,
    ) -> Result<usize, ConfigurationError>
    where
        IO: PinSetup + ?Sized,
        B: InterruptBinder + ?Sized,
    {
        let slot = self.slots.len();
        if self.slots.push(QuadratureDecoder::new(config)).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Encoder registry full, rejecting {}", config);
            return Err(ConfigurationError::RegistryFull);
        }

        match self.slots[slot].attach(io, binder, slot) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "Encoder {} registered: {} PPR, index {}",
                    slot,
                    config.pulses_per_revolution,
                    config.channel_z.is_some()
                );
                Ok(slot)
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Encoder {} not in use: {}", slot, e);
                Err(e)
            }
        }
    }

    // ── Interrupt context ────────────────────────────────────────────

    /// Route a bound edge to its encoder.
    ///
    /// This is the single entry point for every encoder interrupt: the
    /// callback carries the slot and whether the edge came from A/B or Z.
    pub fn dispatch<P>(&self, callback: EdgeCallback, pins: &P)
    where
        P: DigitalRead + ?Sized,
    {
        // Callbacks are only created by register(), so the slot exists.
        if let Some(decoder) = self.slots.get(callback.slot()) {
            match callback.kind() {
                EdgeKind::Pulse => decoder.process_pulse(pins),
                EdgeKind::Index => decoder.process_index_pulse(),
            }
        }
    }

    // ── Poll context ─────────────────────────────────────────────────

    /// Borrow the encoder in slot `index`.
    ///
    /// # Errors
    /// [`InvalidEncoder`] if no encoder was registered at `index`.
    pub fn get(&self, index: usize) -> Result<&QuadratureDecoder, InvalidEncoder> {
        self.slots.get(index).ok_or(InvalidEncoder {
            index,
            registered: self.slots.len(),
        })
    }

    /// Net pulse count of encoder `index`.
    pub fn read_net_count(&self, index: usize) -> Result<i32, InvalidEncoder> {
        Ok(self.get(index)?.read_net_count())
    }

    /// Return and clear the fault latch of encoder `index`.
    pub fn consume_fault(&self, index: usize) -> Result<bool, InvalidEncoder> {
        Ok(self.get(index)?.consume_fault())
    }

    /// Calculated pulses per revolution of encoder `index` (`0` until two
    /// index pulses have been seen).
    pub fn read_calculated_ppr(&self, index: usize) -> Result<u32, InvalidEncoder> {
        Ok(self.get(index)?.read_calculated_ppr())
    }

    /// Consistent copy of every counter of encoder `index`.
    pub fn snapshot(&self, index: usize) -> Result<EncoderSnapshot, InvalidEncoder> {
        Ok(self.get(index)?.snapshot())
    }

    /// Number of registered encoders, in use or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registered encoders in slot order.
    pub fn iter(&self) -> core::slice::Iter<'_, QuadratureDecoder> {
        self.slots.iter()
    }
}

impl<'a> IntoIterator for &'a EncoderRegistry {
    type Item = &'a QuadratureDecoder;
    type IntoIter = core::slice::Iter<'a, QuadratureDecoder>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
