//! Interrupt-context detection.
//!
//! Every acquisition path asks a [`ContextProbe`] first. The probe is a
//! best-effort check: code running in a genuine interrupt handler that goes
//! around the probe (or is given a probe that cannot see interrupts) must not
//! call into the locking API at all.

/// Reports whether the current execution context is an interrupt handler.
///
/// Implementations must be free of side effects and callable from any
/// context, including interrupt handlers.
pub trait ContextProbe {
    fn in_interrupt(&self) -> bool;
}

impl<P: ContextProbe + ?Sized> ContextProbe for &P {
    #[inline]
    fn in_interrupt(&self) -> bool {
        (**self).in_interrupt()
    }
}

/// Probe for targets where all callers run in thread mode (and host tests).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadOnly;

impl ContextProbe for ThreadOnly {
    #[inline]
    fn in_interrupt(&self) -> bool {
        false
    }
}

/// Exception or interrupt being serviced when a probe is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveVector {
    ThreadMode,
    /// A system exception (fault, SysTick, PendSV, ...).
    Exception,
    /// A device interrupt line.
    Interrupt { irqn: u16 },
}

/// Interrupt lines whose handlers run executor tasks.
///
/// An `InterruptExecutor` polls its tasks from inside a software interrupt
/// handler. Waiting on an async lock there only suspends the task and never
/// blocks the handler, so those lines are task context and must lock like
/// thread mode does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorVectors<'a> {
    irqs: &'a [u16],
}

impl<'a> ExecutorVectors<'a> {
    /// No executor runs in interrupt context.
    pub const fn none() -> Self {
        Self { irqs: &[] }
    }

    pub const fn new(irqs: &'a [u16]) -> Self {
        Self { irqs }
    }

    /// Returns `true` when `active` is a context where locking is illegal.
    pub fn in_interrupt(&self, active: ActiveVector) -> bool {
        match active {
            ActiveVector::ThreadMode => false,
            ActiveVector::Exception => true,
            ActiveVector::Interrupt { irqn } => !self.irqs.contains(&irqn),
        }
    }
}

/// Cortex-M probe reading the active exception number from the SCB.
///
/// With [`CortexM::new`] every active exception counts as interrupt context,
/// which is only right when all tasks run in thread mode. Firmware that also
/// runs tasks on `InterruptExecutor`s must list the executors' software
/// interrupt lines with [`CortexM::with_executor_irqs`]; otherwise every lock
/// taken by those tasks is elided and they race thread-mode tasks.
#[cfg(feature = "cortex-m")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CortexM {
    executors: ExecutorVectors<'static>,
}

#[cfg(feature = "cortex-m")]
impl CortexM {
    pub const fn new() -> Self {
        Self { executors: ExecutorVectors::none() }
    }

    /// Treat the handlers of `irqs` (e.g. the SWI lines driving
    /// `InterruptExecutor`s) as task context.
    pub const fn with_executor_irqs(irqs: &'static [u16]) -> Self {
        Self { executors: ExecutorVectors::new(irqs) }
    }
}

#[cfg(feature = "cortex-m")]
impl ContextProbe for CortexM {
    #[inline]
    fn in_interrupt(&self) -> bool {
        use cortex_m::peripheral::scb::VectActive;
        use cortex_m::peripheral::SCB;

        let active = match SCB::vect_active() {
            VectActive::ThreadMode => ActiveVector::ThreadMode,
            VectActive::Exception(_) => ActiveVector::Exception,
            VectActive::Interrupt { irqn } => {
                ActiveVector::Interrupt { irqn: u16::from(irqn) }
            }
        };
        self.executors.in_interrupt(active)
    }
}
