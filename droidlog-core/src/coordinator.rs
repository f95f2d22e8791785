use crate::{error::CoordinatorError, producer::Producer};
use lazy_static::lazy_static;
use std::{
    fmt,
    future::{Future, pending},
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

type InterruptFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

lazy_static! {
    static ref PROCESS_SLOT: InterruptSlot = InterruptSlot::new();
}

/// Holder of the single interrupt handler a process may have armed.
///
/// Cloning shares the slot. Production code uses [`InterruptSlot::process`];
/// tests create their own with [`InterruptSlot::new`] so they stay independent.
#[derive(Debug, Clone, Default)]
pub struct InterruptSlot {
    held: Arc<AtomicBool>,
}

impl InterruptSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// the slot shared by the whole process
    pub fn process() -> Self {
        PROCESS_SLOT.clone()
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    fn claim(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn free(&self) {
        self.held.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Armed,
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// ctrl-c (or SIGTERM) from the controlling terminal
    Interrupt,
    /// the producer exited cleanly
    ProducerExited,
    /// the producer exited with a failure or its streams broke
    ProducerFailed,
    /// the display could not be written to
    DisplayFailed,
    /// the session was dropped while still running
    Dropped,
}

impl fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Interrupt => "interrupted",
            Self::ProducerExited => "log producer exited",
            Self::ProducerFailed => "log producer failed",
            Self::DisplayFailed => "display closed",
            Self::Dropped => "session dropped",
        };
        f.write_str(text)
    }
}

/// Owns the liveness of one session and its interrupt registration.
///
/// State machine: `Idle -> Armed -> TornDown`. Teardown runs the producer's
/// release exactly once no matter how many exit paths trigger it.
pub struct Coordinator {
    phase: Phase,
    slot: InterruptSlot,
    interrupt: Option<InterruptFuture>,
    reason: Option<TeardownReason>,
}

impl Coordinator {
    pub fn new(slot: InterruptSlot) -> Self {
        Self {
            phase: Phase::Idle,
            slot,
            interrupt: None,
            reason: None,
        }
    }

    /// Register the interrupt handler. Fails if another session still holds the slot.
    pub fn arm<F>(&mut self, interrupt: F) -> Result<(), CoordinatorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.phase {
            Phase::Armed => return Err(CoordinatorError::AlreadyArmed),
            Phase::TornDown => return Err(CoordinatorError::TornDown),
            Phase::Idle => {}
        }
        if !self.slot.claim() {
            return Err(CoordinatorError::InterruptSlotTaken);
        }

        self.interrupt = Some(Box::pin(interrupt));
        self.phase = Phase::Armed;
        log::debug!("Coordinator: armed");
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// false once teardown has run
    pub fn is_live(&self) -> bool {
        self.phase != Phase::TornDown
    }

    /// reason of the teardown that actually ran
    pub fn teardown_reason(&self) -> Option<TeardownReason> {
        self.reason
    }

    /// Resolves when the armed interrupt fires. Never resolves when nothing is armed.
    ///
    /// Cancel-safe: the registration survives if this future is dropped.
    pub async fn interrupted(&mut self) {
        match self.interrupt.as_mut() {
            Some(interrupt) => {
                interrupt.await;
                self.interrupt = None;
            }
            None => pending::<()>().await,
        }
    }

    /// Release the producer and the interrupt slot. Returns false if teardown already happened.
    pub fn teardown<P>(&mut self, producer: &mut P, reason: TeardownReason) -> bool
    where
        P: Producer + ?Sized,
    {
        if self.phase == Phase::TornDown {
            log::debug!("Coordinator: teardown ({reason}) ignored, already torn down");
            return false;
        }

        log::debug!("Coordinator: tearing down ({reason})");
        producer.release();
        self.interrupt = None;
        if self.phase == Phase::Armed {
            self.slot.free();
        }
        self.phase = Phase::TornDown;
        self.reason = Some(reason);
        true
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        // the producer is released by its owner; only the slot is ours
        if self.phase == Phase::Armed {
            self.slot.free();
        }
    }
}
