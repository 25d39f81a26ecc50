//! Trigger aggregator.
//!
//! Every detector port sees the same trigger value each cycle. Their match bits feed a
//! [`BooleanFunctionUnit`] whose output is the `hit` pulse. The sample that accompanies the trigger
//! value goes through a data register that tracks the latency of the hit path, so `hit` and `dat`
//! always describe the same sample.

use std::any::Any;
use std::fmt::Debug;
use std::mem;

use arrayvec::ArrayVec;
use static_assertions::const_assert;
use tracing::trace;

use crate::lut::MAX_INPUTS;
use crate::*;

/// Maximum number of detector ports of a trigger.
// TODO: Add a reduction tree of units to aggregate more than 4 ports.
pub const MAX_PORTS: usize = MAX_INPUTS;

const_assert!(MAX_PORTS <= MAX_INPUTS);

/// Single-condition detector producing one match bit per cycle from the trigger value.
pub trait Detector: Debug {
    /// Width of the trigger value the detector compares.
    fn width(&self) -> usize;

    /// Latency of the match output.
    fn latency(&self) -> Latency;

    /// Returns the match output of the current cycle and advances one clock edge.
    fn tick(&mut self, value: u64) -> bool;

    /// Clears the detector's registers.
    fn reset(&mut self);

    /// Upcasts to [`Any`], for downcasting to the concrete detector.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Outputs of a trigger.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TriggerOutput {
    /// The trigger condition holds.
    pub hit: bool,
    /// Sample aligned with `hit`.
    pub dat: u64,
    /// The truth table is fully programmed.
    pub ready: bool,
    /// Last bit of the unit's shift chain.
    pub shift_out: bool,
}

/// Trigger aggregator.
#[derive(Debug)]
pub struct Trigger {
    trig_width: usize,
    dat_width: usize,
    ports: ArrayVec<Box<dyn Detector>, MAX_PORTS>,
    sum: Clocked<BooleanFunctionUnit>,
    /// Programming request applied on the next tick.
    prog: ProgInput,
    /// Data register; `dat_pipe[n]` holds the sample of `n + 1` cycles ago.
    dat_pipe: [u64; 2],
    delay: usize,
}

impl Trigger {
    /// Creates a trigger over `ports` whose match bits are combined by a unit of the given latency and
    /// programming mode.
    pub fn new(
        trig_width: usize, dat_width: usize, ports: Vec<Box<dyn Detector>>, latency: Latency, mode: ProgMode,
    ) -> Result<Self, ConfigurationError> {
        ConfigurationError::check_width("trigger value", trig_width)?;
        ConfigurationError::check_width("trigger data", dat_width)?;
        if ports.len() > MAX_PORTS {
            return Err(ConfigurationError::TooManyPorts { requested: ports.len(), max: MAX_PORTS });
        }

        let port_latency = ports.first().map_or(0, |port| port.latency().cycles());
        for (index, port) in ports.iter().enumerate() {
            if port.width() != trig_width {
                return Err(ConfigurationError::PortWidthMismatch {
                    port: index,
                    expected: trig_width,
                    actual: port.width(),
                });
            }
            if port.latency().cycles() != port_latency {
                return Err(ConfigurationError::LatencyMismatch {
                    port: index,
                    expected: port_latency,
                    actual: port.latency().cycles(),
                });
            }
        }

        let sum = BooleanFunctionUnit::new(ports.len(), latency, mode)?;
        Ok(Self {
            trig_width,
            dat_width,
            ports: ports.into_iter().collect(),
            sum: Clocked::new(sum),
            prog: ProgInput::Idle,
            dat_pipe: [0; 2],
            delay: port_latency + latency.cycles(),
        })
    }

    /// Sets the truth table the unit holds at power-up.
    pub fn with_table(self, table: TruthTable) -> Self {
        let sum = self.sum.fsm().clone().with_init(table);
        Self { sum: Clocked::new(sum), ..self }
    }

    /// Requests a parallel load of `table`, applied on the next tick.
    pub fn program(&mut self, table: TruthTable) {
        trace!(%table, "truth table load requested");
        self.prog = ProgInput::Load(table);
    }

    /// Shifts `bit` into the unit's chain on the next tick.
    pub fn shift(&mut self, bit: bool) { self.prog = ProgInput::Shift(bit); }

    /// Evaluates one cycle.
    pub fn tick(&mut self, trig: u64, dat: u64) -> TriggerOutput {
        let trig = trig & mask(self.trig_width);
        let dat = dat & mask(self.dat_width);

        let mut i = [false; MAX_INPUTS];
        for (slot, port) in i.iter_mut().zip(self.ports.iter_mut()) {
            *slot = port.tick(trig);
        }
        let sum = self.sum.tick(&BfuInput { i, prog: mem::take(&mut self.prog) });

        let aligned = match self.delay {
            0 => dat,
            delay => self.dat_pipe[delay - 1],
        };
        self.dat_pipe = [dat, self.dat_pipe[0]];

        TriggerOutput { hit: sum.o, dat: aligned, ready: sum.ready, shift_out: sum.shift_out }
    }

    /// Clears the registers of the ports, the unit and the data path. The truth table is kept; a load in
    /// flight is abandoned.
    pub fn reset(&mut self) {
        for port in &mut self.ports {
            port.reset();
        }
        let table = self.sum.state().table();
        self.sum = Clocked::new(self.sum.fsm().clone().with_init(table));
        self.prog = ProgInput::Idle;
        self.dat_pipe = [0; 2];
    }

    /// Returns the detector at `index` as a `T`.
    pub fn port_mut<T: Detector + 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.ports.get_mut(index)?.as_any_mut().downcast_mut()
    }

    /// Returns the number of detector ports.
    pub fn ports(&self) -> usize { self.ports.len() }

    /// Returns the width of the trigger value.
    pub fn trig_width(&self) -> usize { self.trig_width }

    /// Returns the width of the trigger data.
    pub fn dat_width(&self) -> usize { self.dat_width }

    /// Returns the number of cycles between a trigger value and its `hit`.
    pub fn latency(&self) -> usize { self.delay }

    /// Returns the boolean function unit.
    pub fn sum(&self) -> &Clocked<BooleanFunctionUnit> { &self.sum }
}
