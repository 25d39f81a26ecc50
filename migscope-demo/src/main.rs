use itertools::Itertools;
use migscope::*;
use migscope_std::*;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const WIDTH: usize = 16;
const DEPTH: usize = 32;
const OFFSET: usize = 6;
const SIZE: usize = 16;
const TIMEOUT: u64 = 1024;

/// Synthetic bus: an 8-bit counter on the trigger side, a scrambled word on the data side.
fn probe(n: u64) -> Probe { Probe::new(n & 0xFF, (n * 0x9E37) & mask(WIDTH)) }

fn main() -> Result<(), ConfigurationError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::fmt().with_env_filter(filter).init();

    // Odd counter value inside 0x40..=0x4F.
    let ports = vec![
        RangeDetector::new(8, Latency::Registered, 0x40, 0x4F).boxed(),
        EdgeDetector::new(8, Latency::Registered, EdgeMode::RISING).with_masks(0b1, 0, 0).boxed(),
    ];
    let trigger = Trigger::new(8, WIDTH, ports, Latency::Comb, ProgMode::Parallel)?.with_table(TruthTable::all(2));
    info!(table = %trigger.sum().state().table(), latency = trigger.latency(), "trigger configured");

    let config = RecorderConfig::new(WIDTH, DEPTH);
    let mut recorder = Recorder::new(&config, trigger)?;
    for (name, field) in recorder.bank().describe() {
        info!(name, width = field.width, access = ?field.access, "register");
    }

    let mut n = 0;
    recorder.tick(probe(n));
    n += 1;

    recorder.set_window(OFFSET, SIZE)?;
    recorder.arm()?;
    recorder.tick(probe(n));
    n += 1;
    while !recorder.done() {
        if n == TIMEOUT {
            warn!(cycles = n, "no trigger, giving up");
            return Ok(());
        }
        recorder.tick(probe(n));
        n += 1;
    }
    info!(cycles = recorder.cycle(), "capture complete");

    let samples = recorder.read(SIZE);
    info!("window: [{:#06x}]", samples.iter().format(", "));
    Ok(())
}
