//! Host-side stand-ins for the board services, shared by the unit tests.

use heapless::Vec;

use crate::phase::Phase;
use crate::pins::{DigitalRead, Edge, EdgeCallback, InterruptBinder, Pin, PinSetup};

pub(crate) fn pin(number: u8) -> Pin {
    Pin::new(number).unwrap()
}

/// Pin levels held in memory. Every pin starts low.
pub(crate) struct FakePins {
    levels: [bool; 64],
    pull_ups: Vec<Pin, 16>,
}

impl FakePins {
    pub(crate) fn new() -> Self {
        Self {
            levels: [false; 64],
            pull_ups: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, pin: Pin, high: bool) {
        self.levels[pin.number() as usize] = high;
    }

    /// Drive the A/B pair to the levels of `bits`.
    pub(crate) fn set_phase(&mut self, a: Pin, b: Pin, bits: u8) {
        let phase = Phase::from_bits(bits).unwrap();
        self.set(a, phase.a());
        self.set(b, phase.b());
    }

    pub(crate) fn is_pulled_up(&self, pin: Pin) -> bool {
        self.pull_ups.contains(&pin)
    }

    pub(crate) fn pull_up_count(&self) -> usize {
        self.pull_ups.len()
    }
}

impl DigitalRead for FakePins {
    fn is_high(&self, pin: Pin) -> bool {
        self.levels[pin.number() as usize]
    }
}

impl PinSetup for FakePins {
    fn configure_pull_up_input(&mut self, pin: Pin) {
        if !self.pull_ups.contains(&pin) {
            self.pull_ups.push(pin).unwrap();
        }
    }
}

/// Records every binding instead of touching interrupt hardware.
pub(crate) struct RecordingBinder {
    pub(crate) bindings: Vec<(Pin, Edge, EdgeCallback), 16>,
}

impl RecordingBinder {
    pub(crate) fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Callback bound to `pin`, as the board would look it up in its ISR.
    pub(crate) fn callback_for(&self, pin: Pin) -> Option<EdgeCallback> {
        self.bindings
            .iter()
            .find(|(bound, _, _)| *bound == pin)
            .map(|&(_, _, callback)| callback)
    }
}

impl InterruptBinder for RecordingBinder {
    fn bind(&mut self, pin: Pin, edge: Edge, callback: EdgeCallback) {
        self.bindings.push((pin, edge, callback)).unwrap();
    }
}
