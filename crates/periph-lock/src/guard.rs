use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::MutexGuard;
use embassy_time::{with_timeout, Duration};

use crate::context::ContextProbe;
use crate::error::LockError;
use crate::handle::LockHandle;

/// RAII guard over one resource lock.
///
/// A guard either holds the lock, releasing it on drop, or is *elided*: it was
/// built in interrupt context, took nothing and releases nothing. Acquire and
/// release are never split between the two.
pub struct ScopedGuard<'a, M: RawMutex> {
    held: Option<MutexGuard<'a, M, ()>>,
}

impl<'a, M: RawMutex> ScopedGuard<'a, M> {
    /// Wait, without bound, until `handle` is taken.
    ///
    /// In interrupt context nothing is taken and an elided guard is returned
    /// immediately. Calling this from an interrupt handler is still a caller
    /// error; the elision only avoids an illegal wait.
    pub async fn acquire<P: ContextProbe>(
        handle: LockHandle<'a, M>,
        probe: &P,
    ) -> Self {
        if probe.in_interrupt() {
            warn!("lock acquisition skipped in interrupt context");
            return Self { held: None };
        }
        Self { held: Some(handle.mutex().lock().await) }
    }

    /// Try to take `handle` within `timeout`.
    ///
    /// On success the lock stays held until the returned guard is dropped.
    /// A zero timeout makes this a plain try-lock.
    pub async fn try_acquire<P: ContextProbe>(
        handle: LockHandle<'a, M>,
        probe: &P,
        timeout: Duration,
    ) -> Result<Self, LockError> {
        if probe.in_interrupt() {
            return Err(LockError::InterruptContext);
        }

        if let Ok(guard) = handle.mutex().try_lock() {
            return Ok(Self { held: Some(guard) });
        }
        if timeout == Duration::from_ticks(0) {
            return Err(LockError::Timeout);
        }

        match with_timeout(timeout, handle.mutex().lock()).await {
            Ok(guard) => Ok(Self { held: Some(guard) }),
            Err(_) => {
                debug!("lock wait timed out after {} ms", timeout.as_millis());
                Err(LockError::Timeout)
            }
        }
    }

    /// Returns `true` if this guard actually holds its lock.
    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }
}
