/// Reasons a bounded acquisition did not take the lock.
///
/// In both cases the guarded operation was not performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockError {
    /// The lock was still held by another task when the timeout elapsed.
    Timeout,
    /// Called from interrupt context, where waiting on a lock is illegal.
    InterruptContext,
}

impl core::fmt::Display for LockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LockError::Timeout => write!(f, "timed out waiting for lock"),
            LockError::InterruptContext => {
                write!(f, "lock requested from interrupt context")
            }
        }
    }
}
