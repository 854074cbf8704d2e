#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
use std::time::Instant;

/// Source of a monotonically increasing cycle count.
pub trait CycleCounter {
    fn read(&self) -> u64;
}

/// The CPU's own counter: TSC on x86_64, the virtual counter on aarch64.
/// Elsewhere, nanoseconds of a monotonic clock stand in for cycles.
pub struct HardwareCounter {
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    epoch: Instant,
}

impl HardwareCounter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
            epoch: Instant::now(),
        }
    }
}

impl Default for HardwareCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleCounter for HardwareCounter {
    #[cfg(target_arch = "x86_64")]
    fn read(&self) -> u64 {
        // SAFETY: `rdtsc` is available on every x86_64 CPU.
        unsafe { core::arch::x86_64::_rdtsc() }
    }

    #[cfg(target_arch = "aarch64")]
    fn read(&self) -> u64 {
        let count: u64;
        // SAFETY: `cntvct_el0` is readable from EL0 on every aarch64 target Rust supports.
        unsafe { core::arch::asm!("isb", "mrs {}, cntvct_el0", out(reg) count) };
        count
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn read(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }
}

/// Brackets a single call between two counter reads.
pub struct Timer<C> {
    counter: C,
}

impl<C: CycleCounter> Timer<C> {
    pub fn new(counter: C) -> Self {
        Self { counter }
    }

    /// Elapsed cycles of one call to `work`. The counter is assumed not to wrap.
    pub fn time<F: FnOnce()>(&self, work: F) -> u64 {
        let start = self.counter.read();
        work();
        let end = self.counter.read();
        end.wrapping_sub(start)
    }
}

/// Advances by a fixed amount on every read.
#[cfg(test)]
pub struct SteppingCounter {
    now: std::cell::Cell<u64>,
    step: u64,
}

#[cfg(test)]
impl SteppingCounter {
    pub fn new(step: u64) -> Self {
        Self {
            now: std::cell::Cell::new(0),
            step,
        }
    }
}

#[cfg(test)]
impl CycleCounter for SteppingCounter {
    fn read(&self) -> u64 {
        let now = self.now.get() + self.step;
        self.now.set(now);
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scalar,
        screen::{Frame, Grid, Viewport, SIZE},
    };

    #[test]
    fn no_op_costs_one_step() {
        let timer = Timer::new(SteppingCounter::new(7));
        assert_eq!(timer.time(|| {}), 7);
        assert_eq!(timer.time(|| {}), 7);
    }

    #[test]
    fn reads_bracket_the_work() {
        let timer = Timer::new(SteppingCounter::new(3));
        let mut inside = 0;
        let elapsed = timer.time(|| inside = timer.counter.read());
        assert_eq!(inside, 6);
        assert_eq!(elapsed, 6);
    }

    #[test]
    fn hardware_counter_is_monotonic() {
        let counter = HardwareCounter::new();
        let first = counter.read();
        let second = counter.read();
        assert!(second >= first);
    }

    #[test]
    fn hardware_counter_sees_real_work() {
        let timer = Timer::new(HardwareCounter::new());
        let grid = Grid::new(Viewport::default());
        let mut frame = Frame::new(SIZE).unwrap();
        let no_op = (0..8).map(|_| timer.time(|| {})).min().unwrap_or(0);
        let elapsed = timer.time(|| scalar::fill_frame(&grid, std::hint::black_box(&mut frame)));
        assert!(elapsed > 0);
        assert!(elapsed > no_op);
    }
}
