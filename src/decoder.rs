//! Per-encoder quadrature decoding state.
//!
//! A [`QuadratureDecoder`] has two kinds of callers:
//!
//! - **Interrupt context** — [`process_pulse()`](QuadratureDecoder::process_pulse)
//!   and [`process_index_pulse()`](QuadratureDecoder::process_index_pulse),
//!   run to completion on every A/B/Z edge of this one encoder.
//! - **Poll context** — the `read_*` accessors and
//!   [`consume_fault()`](QuadratureDecoder::consume_fault), called from the
//!   application at any time.
//!
//! Every field the two sides share is its own atomic word, so a poll-side
//! read never observes a torn value. Only this encoder's callbacks write
//! the counters; the single poll-side write is the fault latch clear,
//! which is an atomic swap. All methods take `&self`, so the registry can
//! be shared as `&'static` once setup is done.
//!
//! Nothing here blocks, allocates or logs.

use portable_atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU8, Ordering};

use crate::error::ConfigurationError;
use crate::phase::{decode, Phase, Transition};
use crate::pins::{DigitalRead, Edge, EdgeCallback, EdgeKind, InterruptBinder, Pin, PinSetup};

/// Setup configuration for one encoder. Immutable once registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Expected quadrature pulses per revolution (4× the line count of the disk).
    pub pulses_per_revolution: u32,
    /// Channel A pin.
    pub channel_a: Option<Pin>,
    /// Channel B pin.
    pub channel_b: Option<Pin>,
    /// Optional index (Z) pin, one falling edge per revolution.
    pub channel_z: Option<Pin>,
}

impl EncoderConfig {
    /// Build a configuration from raw pin numbers, treating
    /// [`Pin::UNUSED`] as "not connected".
    ///
    /// ```
    /// use quadrature_encoder::{EncoderConfig, Pin};
    ///
    /// let config = EncoderConfig::from_raw(800, 2, 3, Pin::UNUSED);
    /// assert!(config.is_in_use());
    /// assert!(config.channel_z.is_none());
    /// ```
    pub const fn from_raw(pulses_per_revolution: u32, a: u8, b: u8, z: u8) -> Self {
        Self {
            pulses_per_revolution,
            channel_a: Pin::new(a),
            channel_b: Pin::new(b),
            channel_z: Pin::new(z),
        }
    }

    /// `true` when both quadrature channels have a pin.
    pub const fn is_in_use(&self) -> bool {
        self.channel_a.is_some() && self.channel_b.is_some()
    }

    fn channels(&self) -> Option<(Pin, Pin)> {
        match (self.channel_a, self.channel_b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
}

/// Consistent copy of an encoder's counters, taken with interrupts masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderSnapshot {
    pub net_count: i32,
    pub forward_count: u32,
    pub reverse_count: u32,
    pub fault_count: u32,
    /// State of the fault latch. Taking a snapshot does not clear it.
    pub fault_pending: bool,
    /// `0` until two index pulses have been seen.
    pub calculated_ppr: u32,
    /// `true` once `calculated_ppr` holds a measurement, even a zero one.
    pub calibrated: bool,
    pub last_phase: Phase,
}

/// Decoding state for one quadrature encoder.
#[derive(Debug)]
pub struct QuadratureDecoder {
    config: EncoderConfig,
    last_phase: AtomicU8,
    net_count: AtomicI32,
    forward_count: AtomicU32,
    reverse_count: AtomicU32,
    fault_count: AtomicU32,
    /// Sticky: set by a fault, cleared only by `consume_fault()`.
    fault_latch: AtomicBool,
    first_index_seen: AtomicBool,
    net_count_at_last_index: AtomicI32,
    calculated_ppr: AtomicU32,
    calibrated: AtomicBool,
}

impl QuadratureDecoder {
    /// Create a decoder with all counters at zero.
    ///
    /// No hardware is touched until [`attach()`](Self::attach).
    pub const fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            last_phase: AtomicU8::new(0),
            net_count: AtomicI32::new(0),
            forward_count: AtomicU32::new(0),
            reverse_count: AtomicU32::new(0),
            fault_count: AtomicU32::new(0),
            fault_latch: AtomicBool::new(false),
            first_index_seen: AtomicBool::new(false),
            net_count_at_last_index: AtomicI32::new(0),
            calculated_ppr: AtomicU32::new(0),
            calibrated: AtomicBool::new(false),
        }
    }

    /// Configure the pins, sample the starting phase and bind the edge
    /// interrupts for registry slot `slot`.
    ///
    /// A and B are bound on [`Edge::AnyChange`] to the slot's pulse
    /// callback; Z, if present, on [`Edge::Falling`] to its index callback.
    ///
    /// # Errors
    /// [`ConfigurationError::ChannelUnassigned`] if A or B has no pin. The
    /// decoder then stays not in use and nothing is configured or bound.
    pub fn attach<IO, B>(
        &self,
        io: &mut IO,
        binder: &mut B,
        slot: usize,
    ) -> Result<(), ConfigurationError>
    where
        IO: PinSetup + ?Sized,
        B: InterruptBinder + ?Sized,
    {
        let (a, b) = self
            .config
            .channels()
            .ok_or(ConfigurationError::ChannelUnassigned { slot })?;

        io.configure_pull_up_input(a);
        io.configure_pull_up_input(b);
        if let Some(z) = self.config.channel_z {
            io.configure_pull_up_input(z);
        }

        let phase = Phase::from_levels(io.is_high(a), io.is_high(b));
        self.last_phase.store(phase.bits(), Ordering::Relaxed);

        let pulse = EdgeCallback::new(slot, EdgeKind::Pulse);
        binder.bind(a, Edge::AnyChange, pulse);
        binder.bind(b, Edge::AnyChange, pulse);
        if let Some(z) = self.config.channel_z {
            binder.bind(z, Edge::Falling, EdgeCallback::new(slot, EdgeKind::Index));
        }

        Ok(())
    }

    // ── Interrupt context ────────────────────────────────────────────

    /// Handle an edge on channel A or B: read both levels and decode.
    ///
    /// Does nothing on a decoder that is not in use.
    pub fn process_pulse<P>(&self, pins: &P)
    where
        P: DigitalRead + ?Sized,
    {
        if let Some((a, b)) = self.config.channels() {
            self.process_phase(Phase::from_levels(pins.is_high(a), pins.is_high(b)));
        }
    }

    /// Decode a phase code that was already sampled.
    ///
    /// Useful when the board reads both channels from one port register.
    /// The last phase always advances to `phase`, faults included.
    ///
    /// ```
    /// use quadrature_encoder::{EncoderConfig, Phase, QuadratureDecoder, Transition};
    ///
    /// let decoder = QuadratureDecoder::new(EncoderConfig::from_raw(800, 2, 3, 255));
    /// let step = decoder.process_phase(Phase::from_levels(true, false));
    /// assert_eq!(step, Transition::Forward);
    /// assert_eq!(decoder.read_net_count(), 1);
    /// ```
    pub fn process_phase(&self, phase: Phase) -> Transition {
        if !self.is_in_use() {
            return Transition::NoChange;
        }

        let transition = decode(self.last_phase(), phase);
        match transition {
            Transition::Forward => {
                self.forward_count.fetch_add(1, Ordering::Relaxed);
                self.net_count.fetch_add(1, Ordering::Relaxed);
            }
            Transition::Reverse => {
                self.reverse_count.fetch_add(1, Ordering::Relaxed);
                self.net_count.fetch_sub(1, Ordering::Relaxed);
            }
            Transition::NoChange => {}
            Transition::Fault => {
                self.fault_count.fetch_add(1, Ordering::Relaxed);
                // Only ever set here; clearing belongs to consume_fault().
                self.fault_latch.store(true, Ordering::Release);
            }
        }
        self.last_phase.store(phase.bits(), Ordering::Relaxed);

        transition
    }

    /// Handle a falling edge on the index (Z) channel.
    ///
    /// The first pulse only records the reference count. Each later pulse
    /// sets the calculated PPR to the count travelled since the previous
    /// pulse, regardless of direction.
    pub fn process_index_pulse(&self) {
        if !self.is_in_use() {
            return;
        }

        let net = self.net_count.load(Ordering::Relaxed);
        if self.first_index_seen.load(Ordering::Relaxed) {
            let previous = self.net_count_at_last_index.load(Ordering::Relaxed);
            self.calculated_ppr
                .store(index_travel(previous, net), Ordering::Relaxed);
            self.calibrated.store(true, Ordering::Release);
        } else {
            self.first_index_seen.store(true, Ordering::Relaxed);
        }
        self.net_count_at_last_index.store(net, Ordering::Relaxed);
    }

    // ── Poll context ─────────────────────────────────────────────────

    /// Net pulse count (forward minus reverse).
    pub fn read_net_count(&self) -> i32 {
        self.net_count.load(Ordering::Relaxed)
    }

    /// Return the fault latch and clear it.
    ///
    /// Several faults between two calls collapse into one `true`; use
    /// [`read_fault_count()`](Self::read_fault_count) for the total.
    pub fn consume_fault(&self) -> bool {
        self.fault_latch.swap(false, Ordering::AcqRel)
    }

    /// Pulses counted between the two most recent index pulses, or `0`
    /// before the second index pulse.
    pub fn read_calculated_ppr(&self) -> u32 {
        self.calculated_ppr.load(Ordering::Relaxed)
    }

    /// `true` once two index pulses have been seen.
    ///
    /// A zero [`read_calculated_ppr()`](Self::read_calculated_ppr) is a
    /// real measurement when this is set (the index kept pulsing while
    /// A/B stood still).
    pub fn is_calibrated(&self) -> bool {
        self.calibrated.load(Ordering::Acquire)
    }

    /// `true` when both quadrature channels have a pin.
    pub fn is_in_use(&self) -> bool {
        self.config.is_in_use()
    }

    pub fn read_forward_count(&self) -> u32 {
        self.forward_count.load(Ordering::Relaxed)
    }

    pub fn read_reverse_count(&self) -> u32 {
        self.reverse_count.load(Ordering::Relaxed)
    }

    /// Total number of faults since startup. Never cleared.
    pub fn read_fault_count(&self) -> u32 {
        self.fault_count.load(Ordering::Relaxed)
    }

    /// Phase code seen on the most recent edge.
    pub fn last_phase(&self) -> Phase {
        Phase::from_bits_truncate(self.last_phase.load(Ordering::Relaxed))
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Calculated minus configured pulses per revolution.
    ///
    /// `None` until a calibration exists. A persistent non-zero value
    /// points at a wrong PPR setting or at lost edges.
    pub fn ppr_error(&self) -> Option<i64> {
        if !self.is_calibrated() {
            return None;
        }
        let measured = i64::from(self.read_calculated_ppr());
        Some(measured - i64::from(self.config.pulses_per_revolution))
    }

    /// Read every counter inside one critical section.
    ///
    /// Unlike the individual accessors, the fields of a snapshot always
    /// belong to the same edge, so `net_count` equals
    /// `forward_count - reverse_count` within it.
    pub fn snapshot(&self) -> EncoderSnapshot {
        critical_section::with(|_| EncoderSnapshot {
            net_count: self.read_net_count(),
            forward_count: self.read_forward_count(),
            reverse_count: self.read_reverse_count(),
            fault_count: self.read_fault_count(),
            fault_pending: self.fault_latch.load(Ordering::Acquire),
            calculated_ppr: self.read_calculated_ppr(),
            calibrated: self.is_calibrated(),
            last_phase: self.last_phase(),
        })
    }
}

/// Pulses travelled between two index readings of the net count.
///
/// The net count wraps, so the distance is taken modulo 2³² and the
/// direction is dropped.
fn index_travel(previous: i32, net: i32) -> u32 {
    net.wrapping_sub(previous).unsigned_abs()
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pin, FakePins, RecordingBinder};

    const A: u8 = 2;
    const B: u8 = 3;
    const Z: u8 = 4;

    fn config() -> EncoderConfig {
        EncoderConfig::from_raw(800, A, B, Z)
    }

    fn phase(bits: u8) -> Phase {
        Phase::from_bits(bits).unwrap()
    }

    /// Decoder that starts at phase 0, like a freshly attached encoder
    /// with both channels low.
    fn decoder() -> QuadratureDecoder {
        QuadratureDecoder::new(config())
    }

    fn feed(decoder: &QuadratureDecoder, sequence: &[u8]) {
        for &bits in sequence {
            decoder.process_phase(phase(bits));
        }
    }

    fn assert_invariant(decoder: &QuadratureDecoder) {
        assert_eq!(
            decoder.read_net_count(),
            decoder
                .read_forward_count()
                .wrapping_sub(decoder.read_reverse_count()) as i32
        );
    }

    // ── Configuration ────────────────────────────────────────────────

    #[test]
    fn unused_sentinel_maps_to_none() {
        let config = EncoderConfig::from_raw(400, Pin::UNUSED, B, Pin::UNUSED);
        assert!(config.channel_a.is_none());
        assert_eq!(config.channel_b, Some(pin(B)));
        assert!(!config.is_in_use());
    }

    #[test]
    fn in_use_needs_both_channels() {
        assert!(EncoderConfig::from_raw(400, A, B, Pin::UNUSED).is_in_use());
        assert!(!EncoderConfig::from_raw(400, A, Pin::UNUSED, Z).is_in_use());
        assert!(!EncoderConfig::from_raw(400, Pin::UNUSED, Pin::UNUSED, Pin::UNUSED).is_in_use());
    }

    // ── Attach ───────────────────────────────────────────────────────

    #[test]
    fn attach_configures_pull_ups_and_binds_edges() {
        let decoder = decoder();
        let mut pins = FakePins::new();
        let mut binder = RecordingBinder::new();

        decoder.attach(&mut pins, &mut binder, 1).unwrap();

        assert!(pins.is_pulled_up(pin(A)));
        assert!(pins.is_pulled_up(pin(B)));
        assert!(pins.is_pulled_up(pin(Z)));

        let pulse = EdgeCallback::new(1, EdgeKind::Pulse);
        let index = EdgeCallback::new(1, EdgeKind::Index);
        assert_eq!(
            binder.bindings.as_slice(),
            &[
                (pin(A), Edge::AnyChange, pulse),
                (pin(B), Edge::AnyChange, pulse),
                (pin(Z), Edge::Falling, index),
            ]
        );
    }

    #[test]
    fn attach_without_index_binds_only_a_and_b() {
        let decoder = QuadratureDecoder::new(EncoderConfig::from_raw(800, A, B, Pin::UNUSED));
        let mut pins = FakePins::new();
        let mut binder = RecordingBinder::new();

        decoder.attach(&mut pins, &mut binder, 0).unwrap();

        assert_eq!(binder.bindings.len(), 2);
        assert_eq!(pins.pull_up_count(), 2);
        assert!(binder.bindings.iter().all(|(_, edge, _)| *edge == Edge::AnyChange));
    }

    #[test]
    fn attach_samples_initial_phase() {
        let decoder = decoder();
        let mut pins = FakePins::new();
        let mut binder = RecordingBinder::new();
        pins.set_phase(pin(A), pin(B), 3);

        decoder.attach(&mut pins, &mut binder, 0).unwrap();
        assert_eq!(decoder.last_phase(), phase(3));

        // 3 → 2 is a forward step from the sampled starting point.
        pins.set_phase(pin(A), pin(B), 2);
        decoder.process_pulse(&pins);
        assert_eq!(decoder.read_net_count(), 1);
        assert_eq!(decoder.read_fault_count(), 0);
    }

    #[test]
    fn attach_with_unassigned_channel_fails_and_binds_nothing() {
        let decoder = QuadratureDecoder::new(EncoderConfig::from_raw(800, A, Pin::UNUSED, Z));
        let mut pins = FakePins::new();
        let mut binder = RecordingBinder::new();

        let result = decoder.attach(&mut pins, &mut binder, 2);

        assert_eq!(result, Err(ConfigurationError::ChannelUnassigned { slot: 2 }));
        assert!(binder.bindings.is_empty());
        assert_eq!(pins.pull_up_count(), 0);
    }

    // ── Pulse decoding ───────────────────────────────────────────────

    #[test]
    fn full_forward_cycle() {
        let decoder = decoder();
        feed(&decoder, &[0, 1, 3, 2, 0]);

        assert_eq!(decoder.read_forward_count(), 4);
        assert_eq!(decoder.read_reverse_count(), 0);
        assert_eq!(decoder.read_fault_count(), 0);
        assert_eq!(decoder.read_net_count(), 4);
        assert_eq!(decoder.last_phase(), phase(0));
    }

    #[test]
    fn full_reverse_cycle() {
        let decoder = decoder();
        feed(&decoder, &[0, 2, 3, 1, 0]);

        assert_eq!(decoder.read_reverse_count(), 4);
        assert_eq!(decoder.read_forward_count(), 0);
        assert_eq!(decoder.read_fault_count(), 0);
        assert_eq!(decoder.read_net_count(), -4);
    }

    #[test]
    fn forward_then_back_returns_to_zero() {
        let decoder = decoder();
        feed(&decoder, &[1, 3, 2, 3, 1, 0]);

        assert_eq!(decoder.read_forward_count(), 3);
        assert_eq!(decoder.read_reverse_count(), 3);
        assert_eq!(decoder.read_net_count(), 0);
    }

    #[test]
    fn repeated_phase_changes_nothing() {
        let decoder = decoder();
        feed(&decoder, &[1]);
        let transition = decoder.process_phase(phase(1));

        assert_eq!(transition, Transition::NoChange);
        assert_eq!(decoder.read_net_count(), 1);
        assert_eq!(decoder.read_forward_count(), 1);
    }

    #[test]
    fn diagonal_jump_is_a_fault() {
        let decoder = decoder();
        let transition = decoder.process_phase(phase(3));

        assert_eq!(transition, Transition::Fault);
        assert_eq!(decoder.read_fault_count(), 1);
        assert_eq!(decoder.read_net_count(), 0);
        assert_eq!(decoder.read_forward_count(), 0);
        assert_eq!(decoder.read_reverse_count(), 0);
        assert_eq!(decoder.last_phase(), phase(3));
        assert!(decoder.consume_fault());
    }

    #[test]
    fn decoding_continues_after_a_fault() {
        let decoder = decoder();
        // 0 → 3 faults, then 3 → 2 → 0 are forward steps from the new phase.
        feed(&decoder, &[3, 2, 0]);

        assert_eq!(decoder.read_fault_count(), 1);
        assert_eq!(decoder.read_forward_count(), 2);
        assert_eq!(decoder.read_net_count(), 2);
    }

    #[test]
    fn process_pulse_reads_channel_levels() {
        let decoder = decoder();
        let mut pins = FakePins::new();

        for bits in [1, 3, 2, 0] {
            pins.set_phase(pin(A), pin(B), bits);
            decoder.process_pulse(&pins);
        }

        assert_eq!(decoder.read_net_count(), 4);
    }

    #[test]
    fn invariant_holds_on_arbitrary_walk() {
        let decoder = decoder();
        // Small LCG so the walk mixes steps, repeats and faults.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            decoder.process_phase(phase(((seed >> 16) & 0b11) as u8));
            assert_invariant(&decoder);
        }
        assert!(decoder.read_fault_count() > 0);
    }

    // ── Fault latch ──────────────────────────────────────────────────

    #[test]
    fn consume_fault_clears_the_latch() {
        let decoder = decoder();
        feed(&decoder, &[3]);

        assert!(decoder.consume_fault());
        assert!(!decoder.consume_fault());
        // The permanent count is unaffected by consuming the latch.
        assert_eq!(decoder.read_fault_count(), 1);
    }

    #[test]
    fn consume_fault_without_fault_is_false_twice() {
        let decoder = decoder();
        feed(&decoder, &[1, 3]);

        assert!(!decoder.consume_fault());
        assert!(!decoder.consume_fault());
    }

    #[test]
    fn valid_steps_never_clear_the_latch() {
        let decoder = decoder();
        feed(&decoder, &[3, 2, 0, 1, 3]);

        assert!(decoder.consume_fault());
    }

    #[test]
    fn several_faults_collapse_into_one_latch() {
        let decoder = decoder();
        feed(&decoder, &[3, 0, 3]);

        assert_eq!(decoder.read_fault_count(), 3);
        assert!(decoder.consume_fault());
        assert!(!decoder.consume_fault());
    }

    // ── Index pulse ──────────────────────────────────────────────────

    #[test]
    fn first_index_pulse_only_records_reference() {
        let decoder = decoder();
        feed(&decoder, &[1, 3, 2]);
        decoder.process_index_pulse();

        assert_eq!(decoder.read_calculated_ppr(), 0);
        assert!(!decoder.is_calibrated());
        assert_eq!(decoder.ppr_error(), None);
    }

    #[test]
    fn second_index_pulse_measures_travel() {
        let decoder = decoder();
        feed(&decoder, &[1, 3]);
        decoder.process_index_pulse();
        feed(&decoder, &[2, 0, 1, 3, 2]);
        decoder.process_index_pulse();

        assert_eq!(decoder.read_calculated_ppr(), 5);
    }

    #[test]
    fn third_index_pulse_measures_against_second() {
        let decoder = decoder();
        decoder.process_index_pulse();
        feed(&decoder, &[1, 3, 2, 0]);
        decoder.process_index_pulse();
        assert_eq!(decoder.read_calculated_ppr(), 4);

        feed(&decoder, &[1, 3]);
        decoder.process_index_pulse();
        assert_eq!(decoder.read_calculated_ppr(), 2);
    }

    #[test]
    fn index_measurement_ignores_direction() {
        let decoder = decoder();
        decoder.process_index_pulse();
        feed(&decoder, &[2, 3, 1]);
        decoder.process_index_pulse();

        assert_eq!(decoder.read_net_count(), -3);
        assert_eq!(decoder.read_calculated_ppr(), 3);
    }

    #[test]
    fn ppr_error_compares_against_configuration() {
        let decoder = QuadratureDecoder::new(EncoderConfig::from_raw(4, A, B, Z));
        decoder.process_index_pulse();
        feed(&decoder, &[1, 3, 2, 0, 1]);
        decoder.process_index_pulse();

        assert_eq!(decoder.read_calculated_ppr(), 5);
        assert_eq!(decoder.ppr_error(), Some(1));
    }

    #[test]
    fn zero_travel_between_index_pulses_is_a_measurement() {
        let decoder = QuadratureDecoder::new(EncoderConfig::from_raw(2400, A, B, Z));
        decoder.process_index_pulse();
        feed(&decoder, &[1, 0]);
        decoder.process_index_pulse();

        assert_eq!(decoder.read_calculated_ppr(), 0);
        assert!(decoder.is_calibrated());
        assert_eq!(decoder.ppr_error(), Some(-2400));
        assert!(decoder.snapshot().calibrated);
    }

    #[test]
    fn index_travel_spans_the_count_wrap() {
        // Forward across i32::MAX into negative counts.
        assert_eq!(index_travel(i32::MAX - 1, i32::MIN + 2), 4);
        // Reverse across i32::MIN into positive counts.
        assert_eq!(index_travel(i32::MIN + 2, i32::MAX - 1), 4);
        assert_eq!(index_travel(-3, 5), 8);
        assert_eq!(index_travel(7, 7), 0);
    }

    // ── Not in use ───────────────────────────────────────────────────

    #[test]
    fn unused_decoder_ignores_edges() {
        let decoder = QuadratureDecoder::new(EncoderConfig::from_raw(800, Pin::UNUSED, B, Z));
        let pins = FakePins::new();

        assert_eq!(decoder.process_phase(phase(1)), Transition::NoChange);
        decoder.process_pulse(&pins);
        decoder.process_index_pulse();
        decoder.process_index_pulse();

        assert!(!decoder.is_in_use());
        assert_eq!(decoder.read_net_count(), 0);
        assert_eq!(decoder.read_calculated_ppr(), 0);
        assert!(!decoder.is_calibrated());
        assert!(!decoder.consume_fault());
    }

    // ── Snapshot ─────────────────────────────────────────────────────

    #[test]
    fn snapshot_reports_without_clearing() {
        let decoder = decoder();
        feed(&decoder, &[1, 3, 0, 1]);

        let snapshot = decoder.snapshot();
        assert_eq!(snapshot.forward_count, 3);
        assert_eq!(snapshot.reverse_count, 0);
        assert_eq!(snapshot.fault_count, 1);
        assert_eq!(snapshot.net_count, 3);
        assert!(snapshot.fault_pending);
        assert_eq!(snapshot.last_phase, phase(1));

        // Still pending for the real consumer.
        assert!(decoder.consume_fault());
    }
}
