//! The payment register: one shop-wide, serially reused resource.
//!
//! The register is its own exclusion domain and never touches shop state,
//! so a barber can hold it without any lock ordering concern.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

/// Single mutual-exclusion token with usage counters.
#[derive(Debug, Default)]
pub struct PaymentRegister {
    token: Mutex<()>,
    in_progress: AtomicUsize,
    peak: AtomicUsize,
    settled: AtomicU64,
}

impl PaymentRegister {
    /// Create a free register.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `pay` while holding the register. Callers queue behind whoever
    /// holds it.
    pub fn settle<R>(&self, pay: impl FnOnce() -> R) -> R {
        let _held = self.token.lock();
        let now = self.in_progress.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        let out = pay();
        self.in_progress.fetch_sub(1, Ordering::AcqRel);
        self.settled.fetch_add(1, Ordering::Relaxed);
        out
    }

    /// Whether a payment is in progress right now.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.token.is_locked()
    }

    /// Payments completed.
    #[must_use]
    pub fn settled(&self) -> u64 {
        self.settled.load(Ordering::Relaxed)
    }

    /// Highest number of payments ever observed in progress at once.
    #[must_use]
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}
