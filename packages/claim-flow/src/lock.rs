//! Session-scoped single-flight guard: at most one claim orchestration (or
//! cache-bypassing refresh) may be in flight at a time. The lock is an
//! explicit compare-and-set on a boolean flow state rather than ambient
//! mutable state, so the no-op-when-busy behavior is testable in isolation.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct FlowLock {
    claiming: AtomicBool,
}

impl FlowLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock if no flow is active. Released when the returned
    /// guard drops.
    pub fn try_acquire(&self) -> Option<FlowGuard<'_>> {
        self.claiming
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlowGuard {
                lock: self,
            })
    }

    pub fn is_locked(&self) -> bool {
        self.claiming.load(Ordering::Acquire)
    }
}

pub struct FlowGuard<'a> {
    lock: &'a FlowLock,
}

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        self.lock.claiming.store(false, Ordering::Release);
    }
}
