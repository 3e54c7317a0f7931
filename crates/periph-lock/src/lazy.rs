use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use grounded::uninit::GroundedCell;
use portable_atomic::{AtomicBool, Ordering};

use crate::handle::LockHandle;

/// Second-level lock serializing the creation of resource locks.
///
/// It is held only while a slot is checked and filled, never while a
/// peripheral primitive runs, and no other lock is taken while it is held.
pub struct TableLock<M: RawMutex> {
    inner: BlockingMutex<M, ()>,
}

impl<M: RawMutex> TableLock<M> {
    pub const fn new() -> Self {
        Self { inner: BlockingMutex::new(()) }
    }

    fn create_with<R>(&self, f: impl FnOnce() -> R) -> R {
        self.inner.lock(|_| f())
    }
}

impl<M: RawMutex> Default for TableLock<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// A single lock slot that is filled on first use.
///
/// `created` is only ever flipped from `false` to `true`, and only by the
/// holder of the [`TableLock`] after the cell has been written. The cell is
/// written exactly once, before `created` is published with Release ordering;
/// every read of the cell follows an Acquire load (or a load under the table
/// lock) that observed `created`.
pub(crate) struct LazyLock<M: RawMutex> {
    cell: GroundedCell<Mutex<M, ()>>,
    created: AtomicBool,
}

impl<M: RawMutex> LazyLock<M> {
    pub(crate) const fn new() -> Self {
        Self { cell: GroundedCell::uninit(), created: AtomicBool::new(false) }
    }

    pub(crate) fn is_created(&self) -> bool {
        self.created.load(Ordering::Acquire)
    }

    /// Returns the slot's lock, creating it under `table` if needed.
    pub(crate) fn get_or_create(&self, table: &TableLock<M>) -> LockHandle<'_, M> {
        if !self.created.load(Ordering::Acquire) {
            table.create_with(|| {
                // Another task may have filled the slot while we waited.
                if !self.created.load(Ordering::Acquire) {
                    // SAFETY: we hold the table lock and `created` is false,
                    // so no other code is writing the cell and no reference
                    // to its contents has been handed out yet.
                    unsafe {
                        self.cell.get().write(Mutex::new(()));
                    }
                    self.created.store(true, Ordering::Release);
                    trace!("resource lock created");
                }
            });
        }

        // SAFETY: `created` is true (checked above or set by us), so the cell
        // holds an initialized mutex that is never moved or dropped while
        // `self` lives.
        let mutex = unsafe { &*(self.cell.get() as *const Mutex<M, ()>) };
        LockHandle::new(mutex)
    }
}
