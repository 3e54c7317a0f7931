use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::handle::LockHandle;
use crate::io::PinId;
use crate::lazy::{LazyLock, TableLock};

/// Default table capacity; covers the pin count of ESP32, ESP32-S2 and
/// ESP32-S3 class parts.
pub const DEFAULT_MAX_PINS: usize = 48;

/// Fixed-capacity map from pin id to a lazily created lock.
///
/// Ids at or beyond `N` all share one fallback lock. That serializes them
/// with each other rather than rejecting them.
pub struct LockTable<M: RawMutex, const N: usize = DEFAULT_MAX_PINS> {
    slots: [LazyLock<M>; N],
    fallback: LazyLock<M>,
}

impl<M: RawMutex, const N: usize> LockTable<M, N> {
    pub const fn new() -> Self {
        Self { slots: [const { LazyLock::new() }; N], fallback: LazyLock::new() }
    }

    /// Returns the lock for `id`, creating it under `table` on first use.
    ///
    /// Once a slot exists the lookup does not touch `table`.
    pub fn get(&self, id: PinId, table: &TableLock<M>) -> LockHandle<'_, M> {
        if cfg!(feature = "gpio-global-lock") {
            return self.fallback.get_or_create(table);
        }
        match self.slots.get(usize::from(id)) {
            Some(slot) => slot.get_or_create(table),
            None => {
                trace!("pin {} is beyond the lock table, using fallback", id);
                self.fallback.get_or_create(table)
            }
        }
    }

    /// Number of slots (fallback included) whose lock has been created.
    pub fn allocated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_created()).count()
            + usize::from(self.fallback.is_created())
    }

    /// Configured capacity.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for LockTable<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
