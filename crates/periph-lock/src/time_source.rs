//! Pluggable wall-clock source.
//!
//! The locking core has no time dependency; this is for layers above it that
//! want timestamps. [`SyncedClock`] is anchored to a unix time supplied by
//! some outside sync (NTP, a BLE host, an RTC). [`UptimeClock`] is the null
//! stand-in and counts seconds since boot.

use core::cell::Cell;
use core::fmt::Write as _;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

use crate::backend::Backend;

pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Formatted timestamp, e.g. `2023-11-14 22:13:20` or an uptime count.
pub type FormattedTime = heapless::String<24>;

pub trait TimeSource {
    /// Start the source (e.g. kick off a sync client). Idempotent.
    fn begin(&self) {}

    /// Current time in seconds since the unix epoch, in the source's own
    /// (possibly local) zone.
    fn unix_time(&self) -> u32;

    /// Convert the current time to UTC given the local offset in seconds east
    /// of UTC. Saturates at the ends of the `u32` range, so an uptime-based
    /// source shortly after boot reports 0 rather than wrapping.
    fn unix_utc_time(&self, local_offset: i32) -> u32 {
        let utc = i64::from(self.unix_time()) - i64::from(local_offset);
        u32::try_from(utc).unwrap_or(if utc < 0 { 0 } else { u32::MAX })
    }

    fn formatted_time(&self) -> FormattedTime;

    /// Seconds since midnight; wraps every 24 h.
    fn seconds_of_day(&self) -> u32 {
        self.unix_time() % SECONDS_PER_DAY
    }
}

fn uptime_secs() -> u32 {
    Instant::now().as_secs() as u32
}

fn format_secs(secs: u32) -> FormattedTime {
    let mut out = FormattedTime::new();
    // u32 always fits in 24 bytes
    let _ = write!(out, "{}", secs);
    out
}

/// Null time source: seconds since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UptimeClock;

impl TimeSource for UptimeClock {
    fn unix_time(&self) -> u32 {
        uptime_secs()
    }

    fn formatted_time(&self) -> FormattedTime {
        format_secs(uptime_secs())
    }
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    unix: u32,
    at: Instant,
}

/// Wall clock anchored to an externally supplied unix time.
///
/// Until [`set_unix_time`](Self::set_unix_time) has been called it behaves
/// like [`UptimeClock`].
pub struct SyncedClock<M: RawMutex> {
    anchor: Mutex<M, Cell<Option<Anchor>>>,
}

impl<M: RawMutex> SyncedClock<M> {
    pub const fn new() -> Self {
        Self { anchor: Mutex::new(Cell::new(None)) }
    }

    /// Anchor the clock: `unix` is the time right now.
    pub fn set_unix_time(&self, unix: u32) {
        let anchor = Anchor { unix, at: Instant::now() };
        self.anchor.lock(|cell| cell.set(Some(anchor)));
        debug!("clock synced to {}", unix);
    }

    pub fn is_synced(&self) -> bool {
        self.anchor.lock(|cell| cell.get().is_some())
    }

    fn now(&self) -> Option<u32> {
        self.anchor.lock(|cell| cell.get()).map(|anchor| {
            let elapsed = Instant::now().saturating_duration_since(anchor.at);
            anchor.unix.wrapping_add(elapsed.as_secs() as u32)
        })
    }
}

impl<M: RawMutex> Default for SyncedClock<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> TimeSource for SyncedClock<M> {
    fn begin(&self) {
        if !self.is_synced() {
            debug!("clock started, waiting for sync");
        }
    }

    fn unix_time(&self) -> u32 {
        self.now().unwrap_or_else(uptime_secs)
    }

    fn formatted_time(&self) -> FormattedTime {
        let Some(unix) = self.now() else {
            return format_secs(uptime_secs());
        };
        let mut out = FormattedTime::new();
        match time::OffsetDateTime::from_unix_timestamp(i64::from(unix)) {
            Ok(dt) => {
                let _ = write!(
                    out,
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    dt.year(),
                    u8::from(dt.month()),
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second()
                );
            }
            Err(_) => {
                let _ = write!(out, "{}", unix);
            }
        }
        out
    }
}

impl<A: TimeSource> TimeSource for Backend<A> {
    fn begin(&self) {
        if let Backend::Active(source) = self {
            source.begin();
        }
    }

    fn unix_time(&self) -> u32 {
        match self {
            Backend::Active(source) => source.unix_time(),
            Backend::Null => UptimeClock.unix_time(),
        }
    }

    fn unix_utc_time(&self, local_offset: i32) -> u32 {
        match self {
            Backend::Active(source) => source.unix_utc_time(local_offset),
            Backend::Null => UptimeClock.unix_utc_time(local_offset),
        }
    }

    fn formatted_time(&self) -> FormattedTime {
        match self {
            Backend::Active(source) => source.formatted_time(),
            Backend::Null => UptimeClock.formatted_time(),
        }
    }

    fn seconds_of_day(&self) -> u32 {
        match self {
            Backend::Active(source) => source.seconds_of_day(),
            Backend::Null => UptimeClock.seconds_of_day(),
        }
    }
}
