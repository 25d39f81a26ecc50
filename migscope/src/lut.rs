//! Boolean function unit: a 4-input programmable lookup table.
//!
//! The unit is modelled after a 16-bit shift-register lookup primitive. Its table lives in a shift
//! chain that is programmed one bit per cycle, either by an internal sequencer that serializes a table
//! loaded in one step ([`ProgMode::Parallel`]) or directly by the caller ([`ProgMode::Shift`]).

use std::fmt;

use itertools::Itertools;
use static_assertions::const_assert_eq;

use crate::*;

/// Maximum number of inputs of a unit.
pub const MAX_INPUTS: usize = 4;

/// Number of entries of a truth table.
pub const TABLE_BITS: usize = 1 << MAX_INPUTS;

const_assert_eq!(TABLE_BITS, u16::BITS as usize);

/// Truth table of a 4-input boolean function.
///
/// Bit `k` is the output when the inputs, read as `(i3, i2, i1, i0)`, equal `k`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TruthTable(u16);

impl TruthTable {
    /// Creates a truth table from its 16 entries.
    pub const fn new(bits: u16) -> Self { Self(bits) }

    /// Returns the 16 entries.
    pub const fn bits(self) -> u16 { self.0 }

    /// Returns the entry at `index` (the low 4 bits are used).
    pub const fn eval(self, index: usize) -> bool { (self.0 >> (index % TABLE_BITS)) & 1 == 1 }

    /// Tabulates `f`, called with inputs `[i0, i1, i2, i3]`.
    pub fn from_fn<F: Fn([bool; MAX_INPUTS]) -> bool>(f: F) -> Self {
        Self((0..TABLE_BITS).filter(|k| f(u64_to_bits(*k as u64))).fold(0, |bits, k| bits | (1 << k)))
    }

    /// OR of the first `inputs` inputs.
    pub fn any(inputs: usize) -> Self { Self::from_fn(|i| i.iter().take(inputs).any(|b| *b)) }

    /// AND of the first `inputs` inputs.
    pub fn all(inputs: usize) -> Self { Self::from_fn(|i| i.iter().take(inputs).all(|b| *b)) }

    /// Bit stream that programs this table through the shift chain, most significant entry first.
    pub fn shift_sequence(self) -> impl Iterator<Item = bool> {
        (0..TABLE_BITS).rev().map(move |k| self.eval(k))
    }
}

impl From<u16> for TruthTable {
    fn from(bits: u16) -> Self { Self(bits) }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nibbles = (0..TABLE_BITS / 4).rev().map(|n| format!("{:04b}", (self.0 >> (n * 4)) & 0xF)).join("_");
        write!(f, "0b{nibbles}")
    }
}

/// Whether an output is combinational or registered one cycle later.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Latency {
    /// Output in the same cycle as the input.
    #[default]
    Comb,
    /// Output one cycle after the input.
    Registered,
}

impl Latency {
    /// Returns the latency in cycles.
    pub const fn cycles(self) -> usize {
        match self {
            Latency::Comb => 0,
            Latency::Registered => 1,
        }
    }
}

/// How the table of a unit is programmed. Fixed at construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgMode {
    /// The table is loaded in one step and serialized into the shift chain over 16 cycles.
    #[default]
    Parallel,
    /// The caller drives the shift chain directly.
    Shift,
}

/// Programming request of a cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProgInput {
    /// No request.
    #[default]
    Idle,
    /// Starts a parallel load, overriding a load in flight. Ignored in [`ProgMode::Shift`].
    Load(TruthTable),
    /// Shifts one bit into the chain. Ignored in [`ProgMode::Parallel`].
    Shift(bool),
}

/// Inputs of a unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BfuInput {
    /// Function inputs `[i0, i1, i2, i3]`; inputs beyond the configured count are held low.
    pub i: [bool; MAX_INPUTS],
    /// Programming request.
    pub prog: ProgInput,
}

/// Outputs of a unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BfuOutput {
    /// Function output. Held low while a parallel load is in flight.
    pub o: bool,
    /// The table is fully programmed.
    pub ready: bool,
    /// Last bit of the shift chain, for daisy-chaining. Always low in [`ProgMode::Parallel`].
    pub shift_out: bool,
}

/// Registers of a unit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BfuState {
    /// Shift chain; bit `k` is table entry `k`.
    chain: u16,
    /// Registered output.
    o: bool,
    /// Bits of a parallel load not yet shifted, most significant first.
    load: u16,
    /// Number of bits of `load` still to shift.
    pending: usize,
}

impl BfuState {
    /// Returns the table currently held in the shift chain.
    pub fn table(&self) -> TruthTable { TruthTable(self.chain) }

    /// Returns whether a parallel load is in flight.
    pub fn loading(&self) -> bool { self.pending != 0 }
}

/// Boolean function unit.
#[derive(Debug, Clone)]
pub struct BooleanFunctionUnit {
    inputs: usize,
    latency: Latency,
    mode: ProgMode,
    init: TruthTable,
}

impl BooleanFunctionUnit {
    /// Creates a unit of `inputs` inputs with an all-zero table.
    pub fn new(inputs: usize, latency: Latency, mode: ProgMode) -> Result<Self, ConfigurationError> {
        if inputs > MAX_INPUTS {
            return Err(ConfigurationError::TooManyInputs { requested: inputs, max: MAX_INPUTS });
        }
        Ok(Self { inputs, latency, mode, init: TruthTable::default() })
    }

    /// Sets the table held by the shift chain at power-up.
    pub fn with_init(self, init: TruthTable) -> Self { Self { init, ..self } }

    /// Returns the number of wired inputs.
    pub fn inputs(&self) -> usize { self.inputs }

    /// Returns the output latency.
    pub fn latency(&self) -> Latency { self.latency }

    /// Returns the programming mode.
    pub fn mode(&self) -> ProgMode { self.mode }

    /// Returns the table index addressed by `i`, with unwired inputs held low.
    fn index(&self, i: &[bool; MAX_INPUTS]) -> usize { bits_to_index(&i[..self.inputs]) }
}

impl Fsm for BooleanFunctionUnit {
    type Input = BfuInput;
    type Output = BfuOutput;
    type State = BfuState;

    fn init(&self) -> BfuState { BfuState { chain: self.init.bits(), ..Default::default() } }

    fn step(&self, input: &BfuInput, state: &BfuState) -> (BfuOutput, BfuState) {
        let mut next = state.clone();

        // Shift-enable and shift-data of the chain for this cycle.
        let shift = match self.mode {
            ProgMode::Parallel => {
                let (load, pending) = match input.prog {
                    ProgInput::Load(table) => (table.bits(), TABLE_BITS),
                    _ => (state.load, state.pending),
                };
                if pending != 0 {
                    next.load = load << 1;
                    next.pending = pending - 1;
                    Some(load >> 15 == 1)
                } else {
                    None
                }
            }
            ProgMode::Shift => match input.prog {
                ProgInput::Shift(bit) => Some(bit),
                _ => None,
            },
        };
        if let Some(bit) = shift {
            next.chain = (state.chain << 1) | u16::from(bit);
        }

        let ready = match self.mode {
            ProgMode::Parallel => state.pending == 0 && !matches!(input.prog, ProgInput::Load(_)),
            ProgMode::Shift => true,
        };
        let o_comb = ready && TruthTable(state.chain).eval(self.index(&input.i));
        next.o = o_comb;

        let o = match self.latency {
            Latency::Comb => o_comb,
            Latency::Registered => state.o,
        };
        let shift_out = self.mode == ProgMode::Shift && state.chain >> 15 == 1;

        (BfuOutput { o, ready, shift_out }, next)
    }
}
