use itertools::Itertools;
use migscope::*;
use migscope_std::*;
use rstest::rstest;

/// Recorder fed with a counter: the trigger value and the sample of cycle `n` are both `n`.
struct Bench {
    rec: Recorder,
    n: u64,
}

impl Bench {
    fn new(trigger: Trigger, depth: usize) -> Self {
        let rec = Recorder::new(&RecorderConfig::new(8, depth), trigger).unwrap();
        let mut bench = Self { rec, n: 0 };
        bench.tick();
        bench
    }

    fn tick(&mut self) {
        self.rec.tick(Probe::new(self.n, self.n));
        self.n += 1;
    }

    fn capture(&mut self, offset: usize, size: usize) -> Vec<u64> {
        self.rec.set_window(offset, size).unwrap();
        self.rec.arm().unwrap();
        self.tick();
        assert!(!self.rec.done());
        while !self.rec.done() {
            self.tick();
            assert!(self.n < 256, "capture did not complete");
        }
        self.rec.read(size)
    }
}

/// Window read back around trigger sample `t`: `size - offset` samples before it, then the rest.
///
/// Every sample is retained as long as `2 * (size - offset) + 1 < depth` and
/// `offset <= size - offset + 1`.
fn window(t: u64, offset: usize, size: usize) -> Vec<u64> {
    (t - (size - offset) as u64..).take(size).collect_vec()
}

fn trigger(ports: Vec<Box<dyn Detector>>, latency: Latency, table: TruthTable) -> Trigger {
    Trigger::new(8, 8, ports, latency, ProgMode::Parallel).unwrap().with_table(table)
}

#[rstest]
#[case(Latency::Comb, 10)]
#[case(Latency::Comb, 16)]
#[case(Latency::Registered, 10)]
#[case(Latency::Registered, 16)]
fn equality_term(#[case] latency: Latency, #[case] depth: usize) {
    let term = Term::new(8, latency, 23);
    let mut bench = Bench::new(trigger(vec![term.boxed()], latency, TruthTable::any(1)), depth);
    assert_eq!(bench.capture(3, 7), window(23, 3, 7));
}

#[test]
fn range_and_rising_edge() {
    let ports = vec![
        RangeDetector::new(8, Latency::Comb, 20, 30).boxed(),
        EdgeDetector::new(8, Latency::Comb, EdgeMode::RISING).with_masks(0b1, 0, 0).boxed(),
    ];
    let mut bench = Bench::new(trigger(ports, Latency::Comb, TruthTable::all(2)), 16);
    assert_eq!(bench.capture(4, 10), window(21, 4, 10));
}

#[test]
fn masked_rising_edge() {
    let edge = EdgeDetector::new(8, Latency::Registered, EdgeMode::RISING).with_masks(0b1_0000, 0, 0);
    let mut bench = Bench::new(trigger(vec![edge.boxed()], Latency::Comb, TruthTable::any(1)), 12);
    assert_eq!(bench.capture(0, 5), window(16, 0, 5));
}

#[test]
fn ring_wraps_at_odd_depth() {
    let term = Term::new(8, Latency::Comb, 40);
    let mut bench = Bench::new(trigger(vec![term.boxed()], Latency::Comb, TruthTable::any(1)), 7);
    assert_eq!(bench.capture(2, 4), window(40, 2, 4));
}

#[test]
fn five_ports_are_rejected() {
    let ports = (0..5).map(|t| Term::new(8, Latency::Comb, t).boxed()).collect_vec();
    let err = Trigger::new(8, 8, ports, Latency::Comb, ProgMode::Parallel).unwrap_err();
    assert_eq!(err, ConfigurationError::TooManyPorts { requested: 5, max: MAX_PORTS });
}

#[test]
fn reprogram_between_captures() {
    let ports = vec![Term::new(8, Latency::Comb, 23).boxed(), Term::new(8, Latency::Comb, 60).boxed()];
    let mut bench = Bench::new(trigger(ports, Latency::Comb, TruthTable::any(1)), 16);
    assert_eq!(bench.capture(2, 6), window(23, 2, 6));

    bench.rec.trigger_mut().program(TruthTable::from_fn(|i| i[1]));
    for _ in 0..16 {
        bench.tick();
    }
    assert_eq!(bench.rec.trigger().sum().state().table(), TruthTable::from_fn(|i| i[1]));
    assert_eq!(bench.capture(2, 6), window(60, 2, 6));
}

#[test]
fn retarget_between_captures() {
    let term = Term::new(8, Latency::Comb, 23);
    let mut bench = Bench::new(trigger(vec![term.boxed()], Latency::Comb, TruthTable::any(1)), 16);
    assert_eq!(bench.capture(5, 9), window(23, 5, 9));

    bench.rec.trigger_mut().port_mut::<Term>(0).unwrap().set_target(50);
    assert_eq!(bench.capture(5, 9), window(50, 5, 9));
}

#[test]
fn register_protocol() {
    let term = Term::new(8, Latency::Comb, 30);
    let mut bench = Bench::new(trigger(vec![term.boxed()], Latency::Comb, TruthTable::any(1)), 16);
    let bank = bench.rec.bank_mut();
    bank.offset.write(2);
    bank.size.write(4);
    bank.arm.pulse();
    bench.tick();
    assert_eq!(bench.rec.bank().done.read(), 0);
    while bench.rec.bank().done.read() == 0 {
        bench.tick();
    }

    let mut read = Vec::new();
    for _ in 0..4 {
        bench.rec.bank_mut().get.pulse();
        bench.tick();
        read.push(bench.rec.bank().get_dat.read());
    }
    assert_eq!(read, window(30, 2, 4));
}
