//! Interrupt-driven quadrature encoder decoding.
//!
//! This crate turns the A/B edges of up to three incremental encoders into
//! signed pulse counts, latches decode faults for the application to poll,
//! and measures the pulses per revolution between index (Z) pulses.
//!
//! # Architecture
//!
//! - **[`QuadratureDecoder`]** — one encoder's state: last phase code,
//!   forward/reverse/net/fault counters, the sticky fault latch and the
//!   index calibration. Written from interrupt context, read from the
//!   application, with every shared field an atomic word.
//! - **[`EncoderRegistry`]** — fixed-capacity owner of the decoders. Hands
//!   out stable slot indices at registration and routes bound edge
//!   callbacks to the right slot through [`EncoderRegistry::dispatch()`].
//! - **[`pins`]** — the traits a board implements so the decoder can read
//!   levels, configure pull-ups and bind edge interrupts.
//!
//! # Quick start
//!
//! ```
//! use quadrature_encoder::{
//!     DigitalRead, Edge, EdgeCallback, EncoderConfig, EncoderRegistry, InterruptBinder, Pin,
//!     PinSetup,
//! };
//!
//! struct Board { levels: u32 }
//!
//! impl DigitalRead for Board {
//!     fn is_high(&self, pin: Pin) -> bool {
//!         self.levels & (1 << pin.number()) != 0
//!     }
//! }
//!
//! impl PinSetup for Board {
//!     fn configure_pull_up_input(&mut self, _pin: Pin) {}
//! }
//!
//! struct Binder { pulse: Option<EdgeCallback> }
//!
//! impl InterruptBinder for Binder {
//!     fn bind(&mut self, _pin: Pin, _edge: Edge, callback: EdgeCallback) {
//!         self.pulse.get_or_insert(callback);
//!     }
//! }
//!
//! let mut board = Board { levels: 0 };
//! let mut binder = Binder { pulse: None };
//! let mut registry = EncoderRegistry::new();
//!
//! let slot = registry
//!     .register(EncoderConfig::from_raw(800, 2, 3, Pin::UNUSED), &mut board, &mut binder)
//!     .unwrap();
//!
//! // Channel A rises: the board's edge handler dispatches the bound callback.
//! board.levels |= 1 << 2;
//! registry.dispatch(binder.pulse.unwrap(), &board);
//!
//! assert_eq!(registry.read_net_count(slot), Ok(1));
//! assert_eq!(registry.consume_fault(slot), Ok(false));
//! ```
//!
//! # Atomics
//!
//! Counters use [`portable_atomic`], so targets without native
//! read-modify-write atomics (e.g. `thumbv6m`) need one of its
//! `critical-section` or `unsafe-assume-single-core` features enabled by
//! the final binary. [`QuadratureDecoder::snapshot()`] additionally needs a
//! [`critical_section`] implementation.
//!
//! # Features
//!
//! - **`defmt`** — [`defmt::Format`] on all public types and registration
//!   logging.

#![no_std]

pub use decoder::{EncoderConfig, EncoderSnapshot, QuadratureDecoder};
pub use error::{ConfigurationError, InvalidEncoder};
pub use phase::{decode, Phase, Transition, DECODE_TABLE};
pub use pins::{DigitalRead, Edge, EdgeCallback, EdgeKind, InterruptBinder, Pin, PinSetup};
pub use registry::{EncoderRegistry, MAX_ENCODERS};

mod decoder;
mod error;
mod phase;
pub mod pins;
mod registry;

#[cfg(test)]
mod testing;
