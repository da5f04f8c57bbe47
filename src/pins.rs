//! Pin identifiers and the board-side collaborator traits.
//!
//! The decoder never touches hardware directly. The board supplies three
//! small services:
//!
//! - [`DigitalRead`] — read one pin level (used at interrupt time).
//! - [`PinSetup`] — put a pin into pulled-up input mode (setup only).
//! - [`InterruptBinder`] — route an edge on a pin to an [`EdgeCallback`].
//!
//! An [`EdgeCallback`] is a small `Copy` value that remembers which slot
//! and which kind of edge it stands for. The board stores it with the
//! interrupt line and hands it back to
//! [`EncoderRegistry::dispatch()`](crate::EncoderRegistry::dispatch) when
//! the edge fires.

/// A raw board pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u8);

impl Pin {
    /// Raw sentinel used in board tables for "no pin connected".
    pub const UNUSED: u8 = 255;

    /// Wrap a raw pin number, mapping [`Pin::UNUSED`] to `None`.
    ///
    /// ```
    /// use quadrature_encoder::Pin;
    ///
    /// assert_eq!(Pin::new(4).map(Pin::number), Some(4));
    /// assert_eq!(Pin::new(Pin::UNUSED), None);
    /// ```
    pub const fn new(number: u8) -> Option<Self> {
        if number == Self::UNUSED {
            None
        } else {
            Some(Self(number))
        }
    }

    /// Raw pin number.
    pub const fn number(self) -> u8 {
        self.0
    }
}

/// Edge sensitivity requested for an interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
    /// Both rising and falling edges.
    AnyChange,
}

/// Which decoder entry point an edge should reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeKind {
    /// A or B channel edge → [`QuadratureDecoder::process_pulse()`](crate::QuadratureDecoder::process_pulse).
    Pulse,
    /// Z channel edge → [`QuadratureDecoder::process_index_pulse()`](crate::QuadratureDecoder::process_index_pulse).
    Index,
}

/// Callback context bound to an interrupt line at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeCallback {
    slot: usize,
    kind: EdgeKind,
}

impl EdgeCallback {
    pub(crate) const fn new(slot: usize, kind: EdgeKind) -> Self {
        Self { slot, kind }
    }

    /// Registry slot this callback targets.
    pub const fn slot(self) -> usize {
        self.slot
    }

    /// Entry point this callback targets.
    pub const fn kind(self) -> EdgeKind {
        self.kind
    }
}

/// Read the current level of a pin.
///
/// Called from interrupt context; implementations must not block.
pub trait DigitalRead {
    /// Returns `true` if `pin` is currently high.
    fn is_high(&self, pin: Pin) -> bool;
}

/// Configure pins during setup.
pub trait PinSetup: DigitalRead {
    /// Put `pin` into digital input mode with the internal pull-up enabled.
    fn configure_pull_up_input(&mut self, pin: Pin);
}

/// Attach edge interrupts to callbacks.
///
/// The binder only records the association; interrupts are expected to be
/// enabled by the board after all encoders are registered.
pub trait InterruptBinder {
    /// Route `edge` events on `pin` to `callback`.
    fn bind(&mut self, pin: Pin, edge: Edge, callback: EdgeCallback);
}

impl<T: DigitalRead + ?Sized> DigitalRead for &T {
    fn is_high(&self, pin: Pin) -> bool {
        (**self).is_high(pin)
    }
}
