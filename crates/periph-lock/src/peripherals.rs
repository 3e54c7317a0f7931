use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;
use portable_atomic::{AtomicBool, Ordering};

use crate::context::{ContextProbe, ThreadOnly};
use crate::error::LockError;
use crate::guard::ScopedGuard;
use crate::handle::LockHandle;
use crate::io::{Level, PeripheralIo, PinId, PinMode, Sample};
use crate::lazy::{LazyLock, TableLock};
use crate::table::{LockTable, DEFAULT_MAX_PINS};

/// Registry owning every peripheral lock and the hardware primitives they
/// protect.
///
/// Build one at startup (it is `const`-constructible, so a `static` works)
/// and hand out references to it. Locks are created lazily on first use and
/// live as long as the registry.
///
/// Each operation below performs exactly one hardware primitive under the
/// resource's lock, so a single call is atomic with respect to other calls on
/// the same pin or peripheral. Sequences of calls are not: use
/// [`lock_pin`](Self::lock_pin) to hold a pin across several primitives.
///
/// The probe `P` decides when locking is skipped. If tasks run on
/// interrupt-mode executors, the probe must report their handlers as task
/// context, or those tasks bypass every lock.
pub struct SharedPeripherals<
    M: RawMutex,
    IO,
    P = ThreadOnly,
    const N: usize = DEFAULT_MAX_PINS,
> {
    io: IO,
    probe: P,
    table_lock: TableLock<M>,
    pins: LockTable<M, N>,
    touch: LazyLock<M>,
    analog: LazyLock<M>,
    started: AtomicBool,
}

impl<M, IO, P, const N: usize> SharedPeripherals<M, IO, P, N>
where
    M: RawMutex,
    IO: PeripheralIo,
    P: ContextProbe,
{
    pub const fn new(io: IO, probe: P) -> Self {
        Self {
            io,
            probe,
            table_lock: TableLock::new(),
            pins: LockTable::new(),
            touch: LazyLock::new(),
            analog: LazyLock::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Mark the registry live before concurrent use begins.
    ///
    /// The table lock is built together with the registry, so this has no
    /// ordering requirement of its own. Idempotent; returns `true` only for
    /// the first call.
    pub fn init(&self) -> bool {
        let first = !self.started.swap(true, Ordering::AcqRel);
        if first {
            debug!("peripheral locks ready: {} pin slots", N);
        }
        first
    }

    pub fn is_initialized(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Lock guarding `pin`. Pins at or beyond `N` share one fallback lock.
    pub fn pin_lock(&self, pin: PinId) -> LockHandle<'_, M> {
        self.pins.get(pin, &self.table_lock)
    }

    /// Lock shared by every touch channel.
    pub fn touch_lock(&self) -> LockHandle<'_, M> {
        self.touch.get_or_create(&self.table_lock)
    }

    /// Lock shared by every ADC channel.
    pub fn analog_lock(&self) -> LockHandle<'_, M> {
        self.analog.get_or_create(&self.table_lock)
    }

    /// Number of pin locks created so far (fallback included).
    pub fn allocated_pin_locks(&self) -> usize {
        self.pins.allocated()
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// The raw primitives. Calling them directly bypasses every lock.
    pub fn io(&self) -> &IO {
        &self.io
    }

    pub async fn set_pin_mode(&self, pin: PinId, mode: PinMode) {
        let _guard = ScopedGuard::acquire(self.pin_lock(pin), &self.probe).await;
        self.io.set_pin_mode(pin, mode);
    }

    pub async fn write_pin(&self, pin: PinId, level: Level) {
        let _guard = ScopedGuard::acquire(self.pin_lock(pin), &self.probe).await;
        self.io.write_pin(pin, level);
    }

    pub async fn read_pin(&self, pin: PinId) -> Level {
        let _guard = ScopedGuard::acquire(self.pin_lock(pin), &self.probe).await;
        self.io.read_pin(pin)
    }

    /// Sample an ADC channel.
    ///
    /// The lock only serializes tasks using this registry. Anything else
    /// driving the converter directly (on the classic ESP32, the Wi-Fi stack
    /// uses ADC2) is not arbitrated; prefer ADC1 channels while the radio is
    /// on.
    pub async fn read_analog(&self, channel: PinId) -> Sample {
        let _guard = ScopedGuard::acquire(self.analog_lock(), &self.probe).await;
        self.io.read_analog(channel)
    }

    /// Sample a capacitive touch channel.
    pub async fn read_touch(&self, channel: PinId) -> Sample {
        let _guard = ScopedGuard::acquire(self.touch_lock(), &self.probe).await;
        self.io.read_touch(channel)
    }

    /// Write `pin` only if its lock can be taken within `timeout`.
    ///
    /// On `Err` the pin was not touched.
    pub async fn try_write_pin(
        &self,
        pin: PinId,
        level: Level,
        timeout: Duration,
    ) -> Result<(), LockError> {
        let guard = self.try_lock_pin(pin, timeout).await?;
        guard.write(level);
        Ok(())
    }

    /// Hold `pin` across several primitives, e.g. a read-modify-write.
    pub async fn lock_pin(&self, pin: PinId) -> PinGuard<'_, M, IO> {
        let guard = ScopedGuard::acquire(self.pin_lock(pin), &self.probe).await;
        PinGuard { pin, io: &self.io, _guard: guard }
    }

    /// Like [`lock_pin`](Self::lock_pin), giving up after `timeout`.
    pub async fn try_lock_pin(
        &self,
        pin: PinId,
        timeout: Duration,
    ) -> Result<PinGuard<'_, M, IO>, LockError> {
        let guard =
            ScopedGuard::try_acquire(self.pin_lock(pin), &self.probe, timeout)
                .await?;
        Ok(PinGuard { pin, io: &self.io, _guard: guard })
    }
}

/// Exclusive access to one pin for as long as the guard lives.
///
/// The methods call the hardware primitives directly; the pin's lock is
/// already held, so they never wait.
pub struct PinGuard<'a, M: RawMutex, IO> {
    pin: PinId,
    io: &'a IO,
    _guard: ScopedGuard<'a, M>,
}

impl<M: RawMutex, IO: PeripheralIo> PinGuard<'_, M, IO> {
    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn set_mode(&self, mode: PinMode) {
        self.io.set_pin_mode(self.pin, mode);
    }

    pub fn write(&self, level: Level) {
        self.io.write_pin(self.pin, level);
    }

    pub fn read(&self) -> Level {
        self.io.read_pin(self.pin)
    }

    /// Invert the pin's level and return the new level.
    pub fn toggle(&self) -> Level {
        let level = !self.io.read_pin(self.pin);
        self.io.write_pin(self.pin, level);
        level
    }
}
