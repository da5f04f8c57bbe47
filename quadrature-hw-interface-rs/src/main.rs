//! quadrature-hw-interface
//!
//! Encoder → registry → log firmware for the Raspberry Pi Pico 2. Wires the
//! `quadrature-encoder` library to real GPIO:
//!
//! 1. At startup every encoder in [`ENCODERS`] is registered. The registry
//!    configures the pull-ups through [`BoardPins`] and records its edge
//!    bindings in [`EdgeBindings`].
//! 2. One edge task per in-use encoder waits on that encoder's bound edges
//!    and dispatches the bound callback into the registry. A, B and Z of
//!    one encoder are serviced by the same task, so its callbacks never
//!    overlap.
//! 3. The poll task wakes every [`POLL_PERIOD_MS`], reports decode faults
//!    and logs a snapshot of each encoder.

#![no_std]
#![no_main]

use core::future::pending;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select3, Either3};
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Flex, Pull};
use embassy_time::{Duration, Ticker};
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use quadrature_encoder::{
    DigitalRead, Edge, EdgeCallback, EncoderConfig, EncoderRegistry, InterruptBinder, Pin,
    PinSetup, MAX_ENCODERS,
};

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Board configuration
// ---------------------------------------------------------------------------

/// Encoder wiring. 600-line encoders in full quadrature → 2400 PPR.
///
/// | Encoder | A    | B    | Z    |
/// |---------|------|------|------|
/// | 0       | GP2  | GP3  | GP4  |
/// | 1       | GP6  | GP7  | —    |
const ENCODERS: [EncoderConfig; 2] = [
    EncoderConfig::from_raw(2400, 2, 3, 4),
    EncoderConfig::from_raw(2400, 6, 7, Pin::UNUSED),
];

/// How often the poll task reports encoder state.
const POLL_PERIOD_MS: u64 = 250;

/// GPIO count of the RP2350A.
const GPIO_COUNT: usize = 30;

/// Every edge binding the registry can request (A, B and Z per encoder).
const MAX_BINDINGS: usize = MAX_ENCODERS * 3;

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Encoder registry: written by the edge tasks, read by the poll task.
static REGISTRY: StaticCell<EncoderRegistry> = StaticCell::new();

// ---------------------------------------------------------------------------
// Board services
// ---------------------------------------------------------------------------

/// GPIOs handed to the encoders, indexed by GPIO number.
struct BoardPins {
    pins: [Option<Flex<'static>>; GPIO_COUNT],
}

impl BoardPins {
    fn new() -> Self {
        Self {
            pins: core::array::from_fn(|_| None),
        }
    }

    fn insert(&mut self, number: u8, pin: Flex<'static>) {
        self.pins[number as usize] = Some(pin);
    }

    /// Move a pin out of the table so an edge task can own it.
    fn take(&mut self, pin: Pin) -> Option<Flex<'static>> {
        self.pins.get_mut(pin.number() as usize)?.take()
    }
}

impl DigitalRead for BoardPins {
    fn is_high(&self, pin: Pin) -> bool {
        matches!(self.pins.get(pin.number() as usize), Some(Some(flex)) if flex.is_high())
    }
}

impl PinSetup for BoardPins {
    fn configure_pull_up_input(&mut self, pin: Pin) {
        match self.pins.get_mut(pin.number() as usize) {
            Some(Some(flex)) => {
                flex.set_as_input();
                flex.set_pull(Pull::Up);
            }
            _ => warn!("GPIO{} is not wired to an encoder", pin.number()),
        }
    }
}

/// Edge bindings recorded during registration.
///
/// The registry binds A, B and then Z for each slot, so the bindings of
/// one slot come out in that order.
struct EdgeBindings {
    bindings: Vec<(Pin, Edge, EdgeCallback), MAX_BINDINGS>,
}

impl EdgeBindings {
    fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Collect the pins bound for `slot` into one task's worth of inputs.
    ///
    /// Returns `None` for a slot without bindings (encoder not in use).
    fn take_inputs(&self, board: &mut BoardPins, slot: usize) -> Option<EncoderInputs> {
        let mut bound = self
            .bindings
            .iter()
            .filter(|(_, _, callback)| callback.slot() == slot)
            .filter_map(|&(pin, edge, callback)| {
                Some(BoundPin {
                    pin,
                    input: board.take(pin)?,
                    edge,
                    callback,
                })
            });

        let a = bound.next()?;
        let b = bound.next()?;
        let z = bound.next();
        Some(EncoderInputs { a, b, z })
    }
}

impl InterruptBinder for EdgeBindings {
    fn bind(&mut self, pin: Pin, edge: Edge, callback: EdgeCallback) {
        if self.bindings.push((pin, edge, callback)).is_err() {
            error!("No room to bind GPIO{}", pin.number());
        }
    }
}

/// One GPIO together with the edge and callback bound to it.
struct BoundPin {
    pin: Pin,
    input: Flex<'static>,
    edge: Edge,
    callback: EdgeCallback,
}

impl BoundPin {
    async fn wait(&mut self) -> EdgeCallback {
        match self.edge {
            Edge::Rising => self.input.wait_for_rising_edge().await,
            Edge::Falling => self.input.wait_for_falling_edge().await,
            Edge::AnyChange => self.input.wait_for_any_edge().await,
        }
        self.callback
    }
}

/// All bound inputs of one encoder.
struct EncoderInputs {
    a: BoundPin,
    b: BoundPin,
    z: Option<BoundPin>,
}

impl DigitalRead for EncoderInputs {
    fn is_high(&self, pin: Pin) -> bool {
        if pin == self.a.pin {
            self.a.input.is_high()
        } else if pin == self.b.pin {
            self.b.input.is_high()
        } else {
            false
        }
    }
}

async fn wait_index(z: &mut Option<BoundPin>) -> EdgeCallback {
    match z {
        Some(z) => z.wait().await,
        None => pending().await,
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Edge handling for one encoder.
///
/// Runs to completion between awaits, so each dispatch finishes before the
/// next edge of the same encoder is looked at.
///
/// The edge waits are re-armed on every pass, so an A/B edge that lands
/// while a dispatch runs is not latched by the GPIO driver. After each wake
/// the channels are sampled once more through the pulse callback, which
/// picks up such an edge (or decodes as no change). Two edges inside that
/// window still read as a fault.
#[embassy_executor::task(pool_size = 3)]
async fn edge_task(registry: &'static EncoderRegistry, mut inputs: EncoderInputs) {
    info!("Edge task for encoder {} started", inputs.a.callback.slot());

    let resample = inputs.a.callback;

    loop {
        let callback = match select3(
            inputs.a.wait(),
            inputs.b.wait(),
            wait_index(&mut inputs.z),
        )
        .await
        {
            Either3::First(callback) | Either3::Second(callback) | Either3::Third(callback) => {
                callback
            }
        };

        registry.dispatch(callback, &inputs);
        registry.dispatch(resample, &inputs);
    }
}

/// Periodic report of every in-use encoder.
#[embassy_executor::task]
async fn poll_task(registry: &'static EncoderRegistry) {
    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS));
    // Last mismatching measurement warned about, per slot.
    let mut reported_ppr: [Option<u32>; MAX_ENCODERS] = [None; MAX_ENCODERS];

    loop {
        ticker.next().await;

        for (slot, encoder) in registry.iter().enumerate() {
            if !encoder.is_in_use() {
                continue;
            }

            let snapshot = encoder.snapshot();
            debug!("Encoder {}: {}", slot, snapshot);

            // Clear-on-read: one warning per poll period at most.
            if encoder.consume_fault() {
                warn!(
                    "Encoder {}: decode fault ({} total)",
                    slot,
                    encoder.read_fault_count()
                );
            }

            if let Some(error) = encoder.ppr_error() {
                let measured = Some(snapshot.calculated_ppr);
                if error != 0 && reported_ppr[slot] != measured {
                    reported_ppr[slot] = measured;
                    warn!(
                        "Encoder {}: measured {} PPR, configured {}",
                        slot,
                        snapshot.calculated_ppr,
                        encoder.config().pulses_per_revolution
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("quadrature-hw-interface starting");

    // —— Pin assignments (must match ENCODERS) ——————————————————————————————
    let mut board = BoardPins::new();
    board.insert(2, Flex::new(p.PIN_2));
    board.insert(3, Flex::new(p.PIN_3));
    board.insert(4, Flex::new(p.PIN_4));
    board.insert(6, Flex::new(p.PIN_6));
    board.insert(7, Flex::new(p.PIN_7));

    // —— Encoder registration ———————————————————————————————————————————————
    let mut bindings = EdgeBindings::new();
    let registry = REGISTRY.init(EncoderRegistry::new());

    for config in ENCODERS {
        match registry.register(config, &mut board, &mut bindings) {
            Ok(slot) => info!("Encoder {} ready", slot),
            // The registry keeps going; an unusable slot simply reads zero.
            Err(e) => error!("Encoder registration failed: {}", e),
        }
    }

    // Setup is over: from here on the registry is shared read-only.
    let registry: &'static EncoderRegistry = registry;

    // —— Spawn tasks ————————————————————————————————————————————————————————
    for slot in 0..registry.len() {
        if let Some(inputs) = bindings.take_inputs(&mut board, slot) {
            spawner.spawn(edge_task(registry, inputs)).unwrap();
        }
    }
    spawner.spawn(poll_task(registry)).unwrap();

    info!("All tasks spawned");
}
