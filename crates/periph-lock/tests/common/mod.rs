#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use periph_lock::{
    ContextProbe, Level, PeripheralIo, PinId, PinMode, Sample, SharedPeripherals,
};

pub const PINS: usize = 64;
pub const CHANNELS: usize = 16;

pub type TestPeripherals =
    SharedPeripherals<CriticalSectionRawMutex, MockIo, ForcedProbe>;

pub fn make_peripherals() -> TestPeripherals {
    SharedPeripherals::new(MockIo::new(), ForcedProbe::new())
}

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

/// Probe whose answer the test controls.
#[derive(Default)]
pub struct ForcedProbe {
    in_interrupt: AtomicBool,
}

impl ForcedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_in_interrupt(&self, value: bool) {
        self.in_interrupt.store(value, Ordering::SeqCst);
    }
}

impl ContextProbe for ForcedProbe {
    fn in_interrupt(&self) -> bool {
        self.in_interrupt.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Mock hardware
// ---------------------------------------------------------------------------

/// Fake registers plus overlap detection.
///
/// Every primitive marks its resource busy for a short window. If another
/// primitive on the same resource starts inside that window the access was
/// not serialized and `overlaps` is bumped.
pub struct MockIo {
    levels: [AtomicBool; PINS],
    modes: [AtomicU8; PINS],
    analog: [AtomicU16; CHANNELS],
    touch: [AtomicU16; CHANNELS],
    pin_busy: [AtomicBool; PINS],
    analog_busy: AtomicBool,
    touch_busy: AtomicBool,
    pub writes: AtomicUsize,
    pub overlaps: AtomicUsize,
}

impl MockIo {
    pub fn new() -> Self {
        Self {
            levels: std::array::from_fn(|_| AtomicBool::new(false)),
            modes: std::array::from_fn(|_| AtomicU8::new(0)),
            analog: std::array::from_fn(|_| AtomicU16::new(0)),
            touch: std::array::from_fn(|_| AtomicU16::new(0)),
            pin_busy: std::array::from_fn(|_| AtomicBool::new(false)),
            analog_busy: AtomicBool::new(false),
            touch_busy: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            overlaps: AtomicUsize::new(0),
        }
    }

    pub fn set_analog(&self, channel: PinId, value: Sample) {
        self.analog[channel as usize % CHANNELS].store(value, Ordering::SeqCst);
    }

    pub fn set_touch(&self, channel: PinId, value: Sample) {
        self.touch[channel as usize % CHANNELS].store(value, Ordering::SeqCst);
    }

    pub fn mode(&self, pin: PinId) -> PinMode {
        match self.modes[pin as usize % PINS].load(Ordering::SeqCst) {
            0 => PinMode::Input,
            1 => PinMode::InputPullUp,
            2 => PinMode::InputPullDown,
            3 => PinMode::Output,
            _ => PinMode::OutputOpenDrain,
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    fn busy<R>(&self, flag: &AtomicBool, f: impl FnOnce() -> R) -> R {
        if flag.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let out = f();
        std::thread::sleep(StdDuration::from_micros(20));
        flag.store(false, Ordering::SeqCst);
        out
    }
}

impl PeripheralIo for MockIo {
    fn set_pin_mode(&self, pin: PinId, mode: PinMode) {
        let idx = pin as usize % PINS;
        let raw = match mode {
            PinMode::Input => 0,
            PinMode::InputPullUp => 1,
            PinMode::InputPullDown => 2,
            PinMode::Output => 3,
            PinMode::OutputOpenDrain => 4,
        };
        self.busy(&self.pin_busy[idx], || {
            self.modes[idx].store(raw, Ordering::SeqCst)
        });
    }

    fn write_pin(&self, pin: PinId, level: Level) {
        let idx = pin as usize % PINS;
        self.busy(&self.pin_busy[idx], || {
            self.levels[idx].store(level.into(), Ordering::SeqCst);
            self.writes.fetch_add(1, Ordering::SeqCst);
        });
    }

    fn read_pin(&self, pin: PinId) -> Level {
        let idx = pin as usize % PINS;
        self.busy(&self.pin_busy[idx], || {
            Level::from(self.levels[idx].load(Ordering::SeqCst))
        })
    }

    fn read_analog(&self, channel: PinId) -> Sample {
        self.busy(&self.analog_busy, || {
            self.analog[channel as usize % CHANNELS].load(Ordering::SeqCst)
        })
    }

    fn read_touch(&self, channel: PinId) -> Sample {
        self.busy(&self.touch_busy, || {
            self.touch[channel as usize % CHANNELS].load(Ordering::SeqCst)
        })
    }
}
