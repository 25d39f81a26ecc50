//! Arm/record sequencer.

use crate::*;

/// Sequencer phase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not armed.
    #[default]
    Idle,
    /// Recording pre-trigger samples and waiting for a hit.
    Armed,
    /// Filling the post-trigger part of the window.
    Recording,
}

/// Inputs of the sequencer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequencerInput {
    /// Synchronous reset.
    pub rst: bool,
    /// Arm request.
    pub arm: bool,
    /// Pre-trigger depth.
    pub offset: usize,
    /// Window length.
    pub size: usize,
    /// Trigger hit.
    pub hit: bool,
    /// Storage completed the window.
    pub rec_done: bool,
}

/// Outputs of the sequencer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequencerOutput {
    /// Recording is enabled; drives the storage write strobe.
    pub enable: bool,
    /// Opens the storage window.
    pub rec_start: bool,
    /// Re-initializes storage (reset, or an accepted arm).
    pub rec_rst: bool,
    /// Pre-trigger depth passed to storage.
    pub rec_offset: usize,
    /// Window length passed to storage.
    pub rec_size: usize,
    /// Idle.
    pub ctl_done: bool,
    /// An arm request was accepted this cycle.
    pub armed: bool,
    /// Sticky configuration fault.
    pub fault: bool,
}

/// Registers of the sequencer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SequencerState {
    phase: Phase,
    fault: bool,
}

impl SequencerState {
    /// Returns the phase.
    pub fn phase(&self) -> Phase { self.phase }

    /// Returns whether recording is enabled.
    pub fn enabled(&self) -> bool { self.phase != Phase::Idle }

    /// Returns whether the last arm request was rejected.
    pub fn fault(&self) -> bool { self.fault }
}

/// Arm/record sequencer for a storage of `depth` samples.
#[derive(Debug, Clone)]
pub struct Sequencer {
    depth: usize,
}

impl Sequencer {
    /// Creates a sequencer.
    pub fn new(depth: usize) -> Self { Self { depth } }

    /// Returns the storage depth the window is checked against.
    pub fn depth(&self) -> usize { self.depth }
}

impl Fsm for Sequencer {
    type Input = SequencerInput;
    type Output = SequencerOutput;
    type State = SequencerState;

    fn init(&self) -> SequencerState { SequencerState::default() }

    fn step(&self, input: &SequencerInput, state: &SequencerState) -> (SequencerOutput, SequencerState) {
        let valid = ConfigurationError::check_window(input.offset, input.size, self.depth).is_ok();
        let armed = !input.rst && input.arm && valid;
        let rec_rst = input.rst || armed;

        // reset > arm > done
        let next = if input.rst {
            SequencerState { phase: Phase::Idle, fault: false }
        } else if input.arm && valid {
            SequencerState { phase: Phase::Armed, fault: false }
        } else {
            let fault = state.fault || input.arm;
            let phase = match state.phase {
                _ if input.rec_done => Phase::Idle,
                Phase::Armed if input.hit => Phase::Recording,
                phase => phase,
            };
            SequencerState { phase, fault }
        };

        let output = SequencerOutput {
            enable: state.enabled(),
            rec_start: state.phase == Phase::Armed && input.hit && !rec_rst,
            rec_rst,
            rec_offset: input.offset,
            rec_size: input.size,
            ctl_done: !state.enabled(),
            armed,
            fault: state.fault,
        };
        (output, next)
    }
}
