use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Provides the seed for each guid generation
pub trait SeedSource {
    fn seed(&self) -> u64;
}

/// Seeds from the wall clock at microsecond resolution on every call.
///
/// Two generations within the same clock tick receive the same seed and so
/// produce the same guid.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockSeed;

impl SeedSource for ClockSeed {
    fn seed(&self) -> u64 {
        Utc::now().timestamp_micros() as u64
    }
}

/// Always returns the same seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl SeedSource for FixedSeed {
    fn seed(&self) -> u64 {
        self.0
    }
}

/// Reads the clock once, then hands out consecutive seeds
#[derive(Debug)]
pub struct SequenceSeed {
    next: AtomicU64,
}

impl SequenceSeed {
    pub fn starting_at(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }

    pub fn from_clock() -> Self {
        Self::starting_at(ClockSeed.seed())
    }
}

impl SeedSource for SequenceSeed {
    fn seed(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl<S: SeedSource + ?Sized> SeedSource for &S {
    fn seed(&self) -> u64 {
        (**self).seed()
    }
}
