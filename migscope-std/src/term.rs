//! Equality term.

use std::any::Any;

use crate::*;

/// Matches when the trigger value equals a target.
#[derive(Debug, Clone)]
pub struct Term {
    width: usize,
    latency: Latency,
    target: u64,
    o: bool,
}

impl Term {
    /// Creates a term over `width`-bit values.
    pub fn new(width: usize, latency: Latency, target: u64) -> Self {
        Self { width, latency, target: target & mask(width), o: false }
    }

    /// Returns the target.
    pub fn target(&self) -> u64 { self.target }

    /// Sets the target.
    pub fn set_target(&mut self, target: u64) { self.target = target & mask(self.width); }

    /// Boxes the term as a trigger port.
    pub fn boxed(self) -> Box<dyn Detector> { Box::new(self) }
}

impl Detector for Term {
    fn width(&self) -> usize { self.width }

    fn latency(&self) -> Latency { self.latency }

    fn tick(&mut self, value: u64) -> bool {
        let m = value & mask(self.width) == self.target;
        output(self.latency, &mut self.o, m)
    }

    fn reset(&mut self) { self.o = false; }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comb_and_registered() {
        let mut comb = Term::new(8, Latency::Comb, 0x42);
        let mut reg = Term::new(8, Latency::Registered, 0x42);
        let values = [0x41, 0x42, 0x142, 0x00];
        let comb_out = values.iter().map(|v| comb.tick(*v)).collect::<Vec<_>>();
        let reg_out = values.iter().map(|v| reg.tick(*v)).collect::<Vec<_>>();
        assert_eq!(comb_out, [false, true, true, false]);
        assert_eq!(reg_out, [false, false, true, true]);
    }

    #[test]
    fn target_is_truncated() {
        let mut term = Term::new(4, Latency::Comb, 0);
        term.set_target(0x1F);
        assert_eq!(term.target(), 0xF);
        assert!(term.tick(0xF));
    }
}
