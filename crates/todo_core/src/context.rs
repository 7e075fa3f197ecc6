//! Cancellable execution context shared by store operations.
//!
//! # Invariants
//! - Cancellation is one-way; a cancelled context never becomes live again.
//! - Store operations attach their connection's interrupt handle and then
//!   check the context before touching the database.
//! - Cancelling interrupts a statement already running on the attached
//!   connection.

use rusqlite::InterruptHandle;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CancelState {
    cancelled: AtomicBool,
    interrupt: Mutex<Option<InterruptHandle>>,
}

impl CancelState {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Ok(guard) = self.interrupt.lock() {
            if let Some(handle) = guard.as_ref() {
                handle.interrupt();
            }
        }
    }
}

/// Execution context passed to every store operation.
#[derive(Clone, Default)]
pub struct ExecContext {
    state: Arc<CancelState>,
}

/// Handle that cancels the context it was taken from, usable from other threads.
#[derive(Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl ExecContext {
    /// Creates a live, never-cancelled context.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Registers the connection a store operation is about to run on.
    ///
    /// Replaces any previously attached handle.
    pub fn attach_interrupt(&self, handle: InterruptHandle) {
        if let Ok(mut guard) = self.state.interrupt.lock() {
            *guard = Some(handle);
        }
    }
}

impl Debug for ExecContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancelHandle {
    /// Marks the context cancelled and interrupts any attached running statement.
    pub fn cancel(&self) {
        self.state.cancel();
    }
}

impl Debug for CancelHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field(
                "cancelled",
                &self.state.cancelled.load(Ordering::Acquire),
            )
            .finish()
    }
}
