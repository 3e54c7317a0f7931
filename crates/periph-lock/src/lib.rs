#![cfg_attr(not(test), no_std)]
//! Serialized access to shared microcontroller peripherals.
//!
//! GPIO pins, the ADC and the capacitive touch sensor are not safe to drive
//! from several tasks at once. [`SharedPeripherals`] owns one lock per pin
//! (created lazily on first use), one lock for the whole ADC and one for the
//! whole touch peripheral, and wraps each hardware primitive so that a single
//! call is atomic with respect to other calls on the same resource.
//!
//! Locking from interrupt handlers is not supported. When the configured
//! [`ContextProbe`] reports interrupt context, blocking acquisition degrades
//! to a no-op and bounded acquisition fails with
//! [`LockError::InterruptContext`]. Tasks polled by an interrupt-mode
//! executor are task context, not interrupt context: configure the probe
//! accordingly (see `CortexM::with_executor_irqs`).
//!
//! ```ignore
//! static PERIPHERALS: SharedPeripherals<CriticalSectionRawMutex, BoardIo, CortexM> =
//!     SharedPeripherals::new(BoardIo, CortexM::with_executor_irqs(&[SWI0_IRQN]));
//!
//! PERIPHERALS.init();
//! PERIPHERALS.set_pin_mode(2, PinMode::Output).await;
//! PERIPHERALS.write_pin(2, Level::High).await;
//! let touch = PERIPHERALS.read_touch(7).await;
//! ```

// This must go first so the macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod backend;
pub mod context;
mod error;
mod guard;
mod handle;
mod io;
mod lazy;
pub mod log_sink;
mod peripherals;
mod table;
pub mod time_source;

pub use backend::Backend;
pub use context::{ActiveVector, ContextProbe, ExecutorVectors, ThreadOnly};
pub use error::LockError;
pub use guard::ScopedGuard;
pub use handle::LockHandle;
pub use io::{Level, PeripheralIo, PinId, PinMode, Sample};
pub use lazy::TableLock;
pub use log_sink::{LogSink, NullSink};
pub use peripherals::{PinGuard, SharedPeripherals};
pub use table::{LockTable, DEFAULT_MAX_PINS};
pub use time_source::{SyncedClock, TimeSource, UptimeClock};

#[cfg(feature = "cortex-m")]
pub use context::CortexM;
#[cfg(feature = "defmt")]
pub use log_sink::DefmtSink;
