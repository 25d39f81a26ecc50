//! Edge detector.

use std::any::Any;

use crate::*;

/// Enabled sub-detectors of an [`EdgeDetector`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeMode {
    /// Detect 0 -> 1 transitions.
    pub rising: bool,
    /// Detect 1 -> 0 transitions.
    pub falling: bool,
    /// Detect any transition.
    pub both: bool,
}

impl EdgeMode {
    /// Rising edges only.
    pub const RISING: Self = Self { rising: true, falling: false, both: false };
    /// Falling edges only.
    pub const FALLING: Self = Self { rising: false, falling: true, both: false };
    /// Any transition.
    pub const BOTH: Self = Self { rising: false, falling: false, both: true };
    /// All sub-detectors.
    pub const ALL: Self = Self { rising: true, falling: true, both: true };
}

/// Matches on transitions of masked bits between consecutive trigger values.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    width: usize,
    latency: Latency,
    mode: EdgeMode,
    rise_mask: u64,
    fall_mask: u64,
    both_mask: u64,
    prev: u64,
    o: bool,
}

impl EdgeDetector {
    /// Creates an edge detector over `width`-bit values watching every bit.
    pub fn new(width: usize, latency: Latency, mode: EdgeMode) -> Self {
        Self {
            width,
            latency,
            mode,
            rise_mask: mask(width),
            fall_mask: mask(width),
            both_mask: mask(width),
            prev: 0,
            o: false,
        }
    }

    /// Restricts the bits watched by each sub-detector.
    pub fn with_masks(self, rise_mask: u64, fall_mask: u64, both_mask: u64) -> Self {
        let bits = mask(self.width);
        Self { rise_mask: rise_mask & bits, fall_mask: fall_mask & bits, both_mask: both_mask & bits, ..self }
    }

    /// Returns the enabled sub-detectors.
    pub fn mode(&self) -> EdgeMode { self.mode }

    /// Sets the rising-edge mask.
    pub fn set_rise_mask(&mut self, bits: u64) { self.rise_mask = bits & mask(self.width); }

    /// Sets the falling-edge mask.
    pub fn set_fall_mask(&mut self, bits: u64) { self.fall_mask = bits & mask(self.width); }

    /// Sets the any-edge mask.
    pub fn set_both_mask(&mut self, bits: u64) { self.both_mask = bits & mask(self.width); }

    /// Boxes the detector as a trigger port.
    pub fn boxed(self) -> Box<dyn Detector> { Box::new(self) }
}

impl Detector for EdgeDetector {
    fn width(&self) -> usize { self.width }

    fn latency(&self) -> Latency { self.latency }

    fn tick(&mut self, value: u64) -> bool {
        let value = value & mask(self.width);
        let prev = self.prev;
        self.prev = value;

        let rising = self.mode.rising && value & !prev & self.rise_mask != 0;
        let falling = self.mode.falling && !value & prev & self.fall_mask != 0;
        let both = self.mode.both && (value ^ prev) & self.both_mask != 0;
        output(self.latency, &mut self.o, rising || falling || both)
    }

    fn reset(&mut self) {
        self.prev = 0;
        self.o = false;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
