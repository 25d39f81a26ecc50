//! Recorder: trigger, sequencer and storage wired behind a register bank.

use tracing::{debug, warn};

use crate::*;

/// Geometry of a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Sample width in bits.
    pub width: usize,
    /// Number of samples in the ring buffer.
    pub depth: usize,
}

impl RecorderConfig {
    /// Creates a configuration.
    pub fn new(width: usize, depth: usize) -> Self { Self { width, depth } }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ConfigurationError::check_width("sample", self.width)?;
        if self.depth == 0 {
            return Err(ConfigurationError::ZeroDepth);
        }
        Ok(())
    }

    /// Returns the width of the storage pointers.
    pub fn addr_width(&self) -> usize { clog2(self.depth) }

    /// Returns the width of the `size` and `offset` fields, wide enough to hold `depth`.
    pub fn window_width(&self) -> usize { bits_for(self.depth) }
}

/// Values observed by the recorder in one cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Value compared by the detectors.
    pub trig: u64,
    /// Sample recorded into storage.
    pub dat: u64,
}

impl Probe {
    /// Creates a probe.
    pub fn new(trig: u64, dat: u64) -> Self { Self { trig, dat } }
}

/// Trace recorder.
///
/// The register bank is the only way to control the recorder; sequencer and storage registers can be
/// inspected but not modified.
#[derive(Debug)]
pub struct Recorder {
    config: RecorderConfig,
    bank: RecorderBank,
    trigger: Trigger,
    sequencer: Clocked<Sequencer>,
    storage: Storage,
    cycle: u64,
}

impl Recorder {
    /// Creates a recorder fed by `trigger`.
    pub fn new(config: &RecorderConfig, trigger: Trigger) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if trigger.dat_width() != config.width {
            return Err(ConfigurationError::WidthMismatch {
                what: "trigger data",
                expected: config.width,
                actual: trigger.dat_width(),
            });
        }

        let mut recorder = Self {
            config: *config,
            bank: RecorderBank::new(config),
            trigger,
            sequencer: Clocked::new(Sequencer::new(config.depth)),
            storage: Storage::new(config.width, config.depth)?,
            cycle: 0,
        };
        recorder.refresh();
        Ok(recorder)
    }

    /// Evaluates one clock cycle and returns the trigger outputs of the cycle.
    pub fn tick(&mut self, probe: Probe) -> TriggerOutput {
        let rst = self.bank.rst.take();
        let arm = self.bank.arm.take();
        let get = self.bank.get.take();
        let offset = self.bank.offset.read() as usize;
        let size = self.bank.size.read() as usize;

        let trig = self.trigger.tick(probe.trig, probe.dat);
        let seq = self.sequencer.tick(&SequencerInput {
            rst,
            arm,
            offset,
            size,
            hit: trig.hit,
            rec_done: self.storage.state().done(),
        });

        let done = self.storage.state().done();
        let put_ptr = self.storage.state().put_ptr();
        self.storage.tick(&StorageInput {
            rst: seq.rec_rst,
            start: seq.rec_start,
            offset: seq.rec_offset,
            size: seq.rec_size,
            put: seq.enable,
            put_dat: trig.dat,
            get,
        });

        let cycle = self.cycle;
        if rst {
            self.trigger.reset();
            debug!(cycle, "recorder reset");
        } else if seq.armed {
            debug!(cycle, offset, size, "recorder armed");
        } else if arm {
            warn!(cycle, offset, size, depth = self.config.depth, "arm rejected, window does not fit storage");
        }
        if seq.rec_start {
            debug!(cycle, put_ptr, get_ptr = self.storage.state().get_ptr(), "trigger hit, window opened");
        }
        if !done && self.storage.state().done() {
            debug!(cycle, "window complete");
        }

        self.cycle += 1;
        self.refresh();
        trig
    }

    /// Drives the read-only fields from the registers.
    fn refresh(&mut self) {
        let seq = self.sequencer.state();
        self.bank.done.drive(u64::from(!seq.enabled()));
        self.bank.fault.drive(u64::from(seq.fault()));
        self.bank.get_dat.drive(self.storage.state().get_dat());
    }

    /// Writes the window fields after checking them against the depth.
    pub fn set_window(&mut self, offset: usize, size: usize) -> Result<(), ConfigurationError> {
        ConfigurationError::check_window(offset, size, self.config.depth)?;
        self.bank.offset.write(offset as u64);
        self.bank.size.write(size as u64);
        Ok(())
    }

    /// Requests arming on the next tick, unless the window fields are misconfigured.
    pub fn arm(&mut self) -> Result<(), ConfigurationError> {
        let offset = self.bank.offset.read() as usize;
        let size = self.bank.size.read() as usize;
        ConfigurationError::check_window(offset, size, self.config.depth)?;
        self.bank.arm.pulse();
        Ok(())
    }

    /// Requests a reset on the next tick.
    pub fn reset(&mut self) { self.bank.rst.pulse(); }

    /// Reads `count` samples from the read pointer, one tick each.
    ///
    /// Meant for an idle recorder: the ticks observe an all-zero probe.
    pub fn read(&mut self, count: usize) -> Vec<u64> {
        (0..count)
            .map(|_| {
                self.bank.get.pulse();
                self.tick(Probe::default());
                self.bank.get_dat.read()
            })
            .collect()
    }

    /// Returns whether the sequencer is idle.
    pub fn done(&self) -> bool { self.bank.done.read() != 0 }

    /// Returns the configuration.
    pub fn config(&self) -> &RecorderConfig { &self.config }

    /// Returns the register bank.
    pub fn bank(&self) -> &RecorderBank { &self.bank }

    /// Returns the register bank for writing.
    pub fn bank_mut(&mut self) -> &mut RecorderBank { &mut self.bank }

    /// Returns the trigger.
    pub fn trigger(&self) -> &Trigger { &self.trigger }

    /// Returns the trigger, to program its truth table or reconfigure its detectors.
    pub fn trigger_mut(&mut self) -> &mut Trigger { &mut self.trigger }

    /// Returns the sequencer registers.
    pub fn sequencer(&self) -> &SequencerState { self.sequencer.state() }

    /// Returns the storage.
    pub fn storage(&self) -> &Storage { &self.storage }

    /// Returns the number of ticks since construction.
    pub fn cycle(&self) -> u64 { self.cycle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::tests::Bit;

    fn recorder(depth: usize) -> Recorder {
        let trigger = Trigger::new(8, 16, vec![Bit::boxed(0, 8, Latency::Comb)], Latency::Comb, ProgMode::Parallel)
            .unwrap()
            .with_table(TruthTable::any(1));
        let mut rec = Recorder::new(&RecorderConfig::new(16, depth), trigger).unwrap();
        rec.tick(Probe::default());
        rec
    }

    /// Ticks with the write pointer as sample.
    fn tick(rec: &mut Recorder, hit: bool) {
        let ptr = rec.storage().state().put_ptr() as u64;
        rec.tick(Probe::new(u64::from(hit), 100 + ptr));
    }

    #[test]
    fn trigger_data_width_must_match() {
        let trigger = Trigger::new(8, 8, vec![], Latency::Comb, ProgMode::Parallel).unwrap();
        let err = Recorder::new(&RecorderConfig::new(16, 16), trigger).unwrap_err();
        assert_eq!(err, ConfigurationError::WidthMismatch { what: "trigger data", expected: 16, actual: 8 });
    }

    #[test]
    fn invalid_geometry() {
        let trigger = || Trigger::new(8, 16, vec![], Latency::Comb, ProgMode::Parallel).unwrap();
        assert_eq!(Recorder::new(&RecorderConfig::new(16, 0), trigger()).unwrap_err(), ConfigurationError::ZeroDepth);
        assert!(Recorder::new(&RecorderConfig::new(0, 8), trigger()).is_err());
    }

    #[test]
    fn capture_with_hit_at_write_pointer_seven() {
        let mut rec = recorder(16);
        assert!(rec.done());
        rec.set_window(4, 10).unwrap();
        rec.arm().unwrap();
        rec.tick(Probe::default());
        assert!(!rec.done());
        assert_eq!(rec.sequencer().phase(), Phase::Armed);

        for _ in 0..7 {
            tick(&mut rec, false);
        }
        assert_eq!(rec.storage().state().put_ptr(), 7);
        tick(&mut rec, true);
        assert_eq!(rec.sequencer().phase(), Phase::Recording);
        assert_eq!(rec.storage().state().get_ptr(), 1);

        for _ in 0..5 {
            tick(&mut rec, false);
            assert!(!rec.storage().state().done());
        }
        tick(&mut rec, true);
        assert!(rec.storage().state().done());
        assert!(!rec.done());

        tick(&mut rec, false);
        assert!(rec.done());
        assert_eq!(rec.storage().state().put_ptr(), 15);

        assert_eq!(rec.read(10), (1..=10).map(|k| 100 + k).collect::<Vec<_>>());
    }

    #[test]
    fn every_enabled_cycle_writes_a_sample() {
        let mut rec = recorder(16);
        rec.set_window(4, 10).unwrap();
        rec.arm().unwrap();
        rec.tick(Probe::default());

        let mut cycle = 0;
        while rec.sequencer().enabled() {
            let ptr = rec.storage().state().put_ptr();
            tick(&mut rec, cycle == 7);
            assert_eq!(rec.storage().state().put_ptr(), wrapping_inc(ptr, 16), "cycle {cycle}");
            assert_eq!(rec.storage().memory().read(ptr), 100 + ptr as u64);
            cycle += 1;
        }
        assert_eq!(cycle, 15);
        assert_eq!(rec.read(10), (1..=10).map(|k| 100 + k).collect::<Vec<_>>());
    }

    #[test]
    fn misconfigured_arm_sets_fault() {
        let mut rec = recorder(16);
        rec.bank_mut().offset.write(5);
        rec.bank_mut().size.write(3);
        assert_eq!(rec.arm().unwrap_err(), ConfigurationError::OffsetExceedsSize { offset: 5, size: 3 });
        assert_eq!(rec.set_window(0, 17).unwrap_err(), ConfigurationError::SizeExceedsDepth { size: 17, depth: 16 });

        rec.bank_mut().arm.pulse();
        rec.tick(Probe::default());
        assert!(rec.done());
        assert_eq!(rec.bank().fault.read(), 1);

        rec.reset();
        rec.tick(Probe::default());
        assert_eq!(rec.bank().fault.read(), 0);
    }

    #[test]
    fn reset_abandons_capture() {
        let mut rec = recorder(8);
        rec.set_window(2, 6).unwrap();
        rec.arm().unwrap();
        rec.tick(Probe::default());
        tick(&mut rec, false);
        tick(&mut rec, true);
        tick(&mut rec, false);

        rec.reset();
        rec.tick(Probe::default());
        assert!(rec.done());
        let once = (rec.sequencer().clone(), rec.storage().state().clone());
        rec.reset();
        rec.tick(Probe::default());
        assert_eq!((rec.sequencer().clone(), rec.storage().state().clone()), once);
        assert_eq!(once.1, StorageState::default());
    }

    #[test]
    fn rearm_starts_a_fresh_session() {
        let mut rec = recorder(8);
        rec.set_window(1, 2).unwrap();
        for _ in 0..2 {
            rec.arm().unwrap();
            rec.tick(Probe::default());
            assert_eq!(rec.storage().state().put_ptr(), 0);
            tick(&mut rec, false);
            tick(&mut rec, true);
            tick(&mut rec, false);
            assert!(rec.storage().state().done());
            tick(&mut rec, false);
            assert!(rec.done());
        }
    }
}
