//! Pluggable diagnostic output.

use core::fmt::Write as _;

use crate::backend::Backend;

/// Capacity of the line buffer used by [`LogSink::print_args`].
pub const MAX_LINE: usize = 128;

/// Text sink for optional diagnostic output.
///
/// Nothing in the locking core depends on a sink for correctness.
pub trait LogSink {
    fn print(&self, msg: &str);

    fn print_line(&self, msg: &str);

    /// Format `args` and print them as one line.
    ///
    /// Output past [`MAX_LINE`] bytes is cut at the last char boundary that
    /// fits.
    fn print_args(&self, args: core::fmt::Arguments<'_>) {
        let mut line = Truncating::<MAX_LINE>::new();
        // A full buffer only cuts the line short.
        let _ = line.write_fmt(args);
        self.print_line(&line.buf);
    }
}

/// Line buffer that keeps the prefix that fits and then stops formatting.
struct Truncating<const N: usize> {
    buf: heapless::String<N>,
}

impl<const N: usize> Truncating<N> {
    fn new() -> Self {
        Self { buf: heapless::String::new() }
    }
}

impl<const N: usize> core::fmt::Write for Truncating<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let room = N - self.buf.len();
        if s.len() <= room {
            return self.buf.push_str(s).map_err(|_| core::fmt::Error);
        }
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        // `cut <= room`, so this cannot fail.
        let _ = self.buf.push_str(&s[..cut]);
        Err(core::fmt::Error)
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn print(&self, msg: &str) {
        (**self).print(msg)
    }

    fn print_line(&self, msg: &str) {
        (**self).print_line(msg)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSink;

impl LogSink for NullSink {
    fn print(&self, _msg: &str) {}

    fn print_line(&self, _msg: &str) {}
}

/// Sink writing through `defmt` at info level.
///
/// `defmt` frames are line oriented, so `print` and `print_line` both emit
/// one frame.
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl LogSink for DefmtSink {
    fn print(&self, msg: &str) {
        defmt::info!("{=str}", msg);
    }

    fn print_line(&self, msg: &str) {
        defmt::info!("{=str}", msg);
    }
}

impl<A: LogSink> LogSink for Backend<A> {
    fn print(&self, msg: &str) {
        match self {
            Backend::Active(sink) => sink.print(msg),
            Backend::Null => NullSink.print(msg),
        }
    }

    fn print_line(&self, msg: &str) {
        match self {
            Backend::Active(sink) => sink.print_line(msg),
            Backend::Null => NullSink.print_line(msg),
        }
    }
}
