// tests/support.rs
//! Test utilities — deterministic, failing and counting entropy sources

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng, TryCryptoRng, TryRngCore};

use pbkdf2_key::config::Defaults;

/// Seeded CSPRNG so salts are reproducible across runs
#[allow(dead_code)]
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Library defaults with a cheap iteration count
#[allow(dead_code)]
pub fn fast_defaults() -> Defaults {
    Defaults {
        iterations: 1_000,
        ..Defaults::default()
    }
}

/// An entropy source that is always unavailable
#[allow(dead_code)]
pub struct FailingEntropy;

impl TryRngCore for FailingEntropy {
    type Error = std::io::Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(unavailable())
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(unavailable())
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(unavailable())
    }
}

impl TryCryptoRng for FailingEntropy {}

fn unavailable() -> std::io::Error {
    std::io::Error::other("entropy pool unavailable")
}

/// Seeded source that records how many bytes were drawn from it
///
/// The count is shared, so it stays readable after the source has been
/// moved into a `KeyResource`.
#[allow(dead_code)]
pub struct CountingEntropy {
    inner: StdRng,
    drawn: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl CountingEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: seeded(seed),
            drawn: Rc::new(Cell::new(0)),
        }
    }

    pub fn bytes_drawn(&self) -> usize {
        self.drawn.get()
    }

    /// Handle onto the byte count
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.drawn)
    }

    fn record(&self, bytes: usize) {
        self.drawn.set(self.drawn.get() + bytes);
    }
}

impl TryRngCore for CountingEntropy {
    type Error = Infallible;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        self.record(4);
        Ok(self.inner.next_u32())
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        self.record(8);
        Ok(self.inner.next_u64())
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.record(dst.len());
        self.inner.fill_bytes(dst);
        Ok(())
    }
}

impl TryCryptoRng for CountingEntropy {}
