use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;

/// Shared reference to one resource's lock.
///
/// Handles are cheap to copy. Two handles for the same resource always point
/// at the same mutex, which [`LockHandle::ptr_eq`] can confirm. The mutex
/// itself lives as long as the registry that created it and is never torn
/// down.
pub struct LockHandle<'a, M: RawMutex> {
    mutex: &'a Mutex<M, ()>,
}

impl<M: RawMutex> Clone for LockHandle<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex> Copy for LockHandle<'_, M> {}

impl<M: RawMutex> core::fmt::Debug for LockHandle<'_, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("LockHandle")
            .field(&(self.mutex as *const Mutex<M, ()>))
            .finish()
    }
}

impl<'a, M: RawMutex> LockHandle<'a, M> {
    pub(crate) fn new(mutex: &'a Mutex<M, ()>) -> Self {
        Self { mutex }
    }

    pub(crate) fn mutex(&self) -> &'a Mutex<M, ()> {
        self.mutex
    }

    /// Returns `true` if both handles refer to the same lock.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.mutex, other.mutex)
    }

    /// Returns `true` if some task currently holds the lock.
    ///
    /// Diagnostics and tests only. The answer may be stale by the time the
    /// caller looks at it, and when the lock is free the check takes and
    /// releases it: a concurrent zero-timeout acquisition can fail with
    /// [`LockError::Timeout`](crate::LockError::Timeout) and parked waiters
    /// are woken. Do not poll it from code that shares the resource.
    pub fn is_locked(&self) -> bool {
        self.mutex.try_lock().is_err()
    }
}
