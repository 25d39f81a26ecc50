//! Finite state machine (Mealy machine).

use std::fmt::Debug;

/// Synchronous state machine.
///
/// `step` describes one clock cycle: (1) the current-cycle output for the given input and (2) the
/// next-cycle state. It must be a pure function of its arguments; all components evaluate against the
/// same current state and commit together at the clock edge.
pub trait Fsm {
    /// Inputs sampled in a cycle.
    type Input;

    /// Outputs of a cycle.
    type Output;

    /// Registers.
    type State: Clone + Debug;

    /// Initial value of registers.
    fn init(&self) -> Self::State;

    /// Computes the current-cycle output and the next-cycle state.
    fn step(&self, input: &Self::Input, state: &Self::State) -> (Self::Output, Self::State);
}

/// A state machine together with its current registers.
#[derive(Debug, Clone)]
pub struct Clocked<M: Fsm> {
    fsm: M,
    state: M::State,
}

impl<M: Fsm> Clocked<M> {
    /// Creates a machine in its initial state.
    pub fn new(fsm: M) -> Self {
        let state = fsm.init();
        Self { fsm, state }
    }

    /// Evaluates one cycle and commits the next state.
    pub fn tick(&mut self, input: &M::Input) -> M::Output {
        let (output, state) = self.fsm.step(input, &self.state);
        self.state = state;
        output
    }

    /// Evaluates the outputs of the current cycle without committing.
    pub fn peek(&self, input: &M::Input) -> M::Output { self.fsm.step(input, &self.state).0 }

    /// Returns the machine.
    pub fn fsm(&self) -> &M { &self.fsm }

    /// Returns the current registers.
    pub fn state(&self) -> &M::State { &self.state }

    /// Restores the initial registers.
    pub fn reset(&mut self) { self.state = self.fsm.init(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts rising inputs, wrapping at 4.
    #[derive(Debug)]
    struct Count;

    impl Fsm for Count {
        type Input = bool;
        type Output = u8;
        type State = u8;

        fn init(&self) -> u8 { 0 }

        fn step(&self, input: &bool, state: &u8) -> (u8, u8) {
            let next = if *input { (state + 1) % 4 } else { *state };
            (*state, next)
        }
    }

    #[test]
    fn tick_commits_and_peek_does_not() {
        let mut m = Clocked::new(Count);
        assert_eq!(m.peek(&true), 0);
        assert_eq!(*m.state(), 0);
        assert_eq!(m.tick(&true), 0);
        assert_eq!(m.tick(&true), 1);
        assert_eq!(m.tick(&false), 2);
        assert_eq!(*m.state(), 2);
        m.reset();
        assert_eq!(*m.state(), 0);
    }
}
