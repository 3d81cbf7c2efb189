//! Thread-scoped operation counters.
//!
//! Every pixel read or write performed by the library adds to `pixmem`;
//! sample comparisons made while matching subimages add to `comparisons`.
//! Counters live in a thread-local, so images processed on different threads
//! never share a count. Use [`measure`] to obtain the delta for one call.

use core::fmt;
use core::ops::{Add, Sub};
use std::cell::Cell;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub pixmem: u64,
    pub comparisons: u64,
}

impl Counters {
    pub const ZERO: Counters = Counters {
        pixmem: 0,
        comparisons: 0,
    };
}

impl Add for Counters {
    type Output = Counters;

    fn add(self, rhs: Counters) -> Self::Output {
        Counters {
            pixmem: self.pixmem.wrapping_add(rhs.pixmem),
            comparisons: self.comparisons.wrapping_add(rhs.comparisons),
        }
    }
}

impl Sub for Counters {
    type Output = Counters;

    fn sub(self, rhs: Counters) -> Self::Output {
        Counters {
            pixmem: self.pixmem.wrapping_sub(rhs.pixmem),
            comparisons: self.comparisons.wrapping_sub(rhs.comparisons),
        }
    }
}

thread_local! {
    static COUNTERS: Cell<Counters> = const { Cell::new(Counters::ZERO) };
}

#[inline]
pub fn add_pixmem(n: u64) {
    COUNTERS.with(|c| {
        let mut v = c.get();
        v.pixmem = v.pixmem.wrapping_add(n);
        c.set(v);
    });
}

#[inline]
pub fn add_comparisons(n: u64) {
    COUNTERS.with(|c| {
        let mut v = c.get();
        v.comparisons = v.comparisons.wrapping_add(n);
        c.set(v);
    });
}

pub fn snapshot() -> Counters {
    COUNTERS.with(Cell::get)
}

pub fn reset() {
    COUNTERS.with(|c| c.set(Counters::ZERO));
}

/// Wall time and counter deltas for one measured call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub elapsed: Duration,
    pub counters: Counters,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time {:.6}s pixmem {} comparisons {}",
            self.elapsed.as_secs_f64(),
            self.counters.pixmem,
            self.counters.comparisons
        )
    }
}

/// Runs `f` and reports the time and counters it consumed on this thread.
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, Report) {
    let before = snapshot();
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    let report = Report {
        elapsed,
        counters: snapshot() - before,
    };
    log::trace!("measured {report}");
    (out, report)
}
