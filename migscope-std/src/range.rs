//! Range detector.

use std::any::Any;

use crate::*;

/// Matches when `low <= value <= high`.
#[derive(Debug, Clone)]
pub struct RangeDetector {
    width: usize,
    latency: Latency,
    low: u64,
    high: u64,
    o: bool,
}

impl RangeDetector {
    /// Creates a range detector over `width`-bit values.
    pub fn new(width: usize, latency: Latency, low: u64, high: u64) -> Self {
        Self { width, latency, low: low & mask(width), high: high & mask(width), o: false }
    }

    /// Returns the inclusive bounds.
    pub fn bounds(&self) -> (u64, u64) { (self.low, self.high) }

    /// Sets the inclusive bounds.
    pub fn set_bounds(&mut self, low: u64, high: u64) {
        self.low = low & mask(self.width);
        self.high = high & mask(self.width);
    }

    /// Boxes the detector as a trigger port.
    pub fn boxed(self) -> Box<dyn Detector> { Box::new(self) }
}

impl Detector for RangeDetector {
    fn width(&self) -> usize { self.width }

    fn latency(&self) -> Latency { self.latency }

    fn tick(&mut self, value: u64) -> bool {
        let value = value & mask(self.width);
        output(self.latency, &mut self.o, (self.low..=self.high).contains(&value))
    }

    fn reset(&mut self) { self.o = false; }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
