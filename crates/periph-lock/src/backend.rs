//! Choice between an active collaborator and its null stand-in.

/// Either the configured collaborator or the null implementation.
///
/// Built once at startup, typically from an `Option`: `None` selects the null
/// behaviour. [`LogSink`](crate::LogSink) and
/// [`TimeSource`](crate::TimeSource) are implemented for `Backend<A>` by
/// delegating to `A` or falling back to [`NullSink`](crate::NullSink) /
/// [`UptimeClock`](crate::UptimeClock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend<A> {
    Active(A),
    Null,
}

impl<A> Backend<A> {
    pub fn is_active(&self) -> bool {
        matches!(self, Backend::Active(_))
    }

    pub fn active(&self) -> Option<&A> {
        match self {
            Backend::Active(a) => Some(a),
            Backend::Null => None,
        }
    }
}

impl<A> From<Option<A>> for Backend<A> {
    fn from(value: Option<A>) -> Self {
        match value {
            Some(a) => Backend::Active(a),
            None => Backend::Null,
        }
    }
}

impl<A> Default for Backend<A> {
    fn default() -> Self {
        Backend::Null
    }
}
