/// Pin (or analog/touch channel) number.
pub type PinId = u8;

/// Raw analog or touch reading.
pub type Sample = u16;

/// Digital pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// GPIO pin mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Input mode (high impedance)
    Input,
    /// Input mode with pull-up resistor
    InputPullUp,
    /// Input mode with pull-down resistor
    InputPullDown,
    /// Output mode (push-pull)
    Output,
    /// Output mode (open-drain)
    OutputOpenDrain,
}

/// Raw hardware primitives for the shared peripherals.
///
/// Each method is assumed to be atomic at the register level, but nothing
/// more: concurrent calls touching the same pin or peripheral may interleave
/// their register accesses. [`SharedPeripherals`](crate::SharedPeripherals)
/// is what serializes them, so implementors take `&self` and do no locking of
/// their own.
pub trait PeripheralIo {
    fn set_pin_mode(&self, pin: PinId, mode: PinMode);

    fn write_pin(&self, pin: PinId, level: Level);

    fn read_pin(&self, pin: PinId) -> Level;

    /// Sample an ADC channel.
    fn read_analog(&self, channel: PinId) -> Sample;

    /// Sample a capacitive touch channel.
    fn read_touch(&self, channel: PinId) -> Sample;
}

impl<T: PeripheralIo + ?Sized> PeripheralIo for &T {
    fn set_pin_mode(&self, pin: PinId, mode: PinMode) {
        (**self).set_pin_mode(pin, mode)
    }

    fn write_pin(&self, pin: PinId, level: Level) {
        (**self).write_pin(pin, level)
    }

    fn read_pin(&self, pin: PinId) -> Level {
        (**self).read_pin(pin)
    }

    fn read_analog(&self, channel: PinId) -> Sample {
        (**self).read_analog(channel)
    }

    fn read_touch(&self, channel: PinId) -> Sample {
        (**self).read_touch(channel)
    }
}
