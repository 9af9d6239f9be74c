// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Blocking facade over the async operations.
//!
//! [`wait`] drives a future to completion on the calling thread through a
//! tokio [`Handle`], so channels and resolvers may use tokio I/O and timers.
//! The wait can be cut short from any other thread through an
//! [`Interrupter`]; an interrupted wait reports [`UaError::Interrupted`],
//! never a service failure.
//!
//! Do not call the blocking forms from inside an async task: the calling
//! thread is parked until the operation finishes, and tokio rejects a
//! nested `block_on`.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::{select, Either};
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::Notify;
use tracing::debug;
use uanode_core::{ConfigurationError, UaError, UaResult};

// =============================================================================
// Interrupter
// =============================================================================

/// Cross-thread interruption signal for blocking waits.
///
/// Cloning shares the same signal.
#[derive(Debug, Clone, Default)]
pub struct Interrupter {
    inner: Arc<InterrupterInner>,
}

#[derive(Debug, Default)]
struct InterrupterInner {
    interrupted: AtomicBool,
    notify: Notify,
}

impl Interrupter {
    /// Creates a new, non-interrupted signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupts every current and future wait until [`reset`](Self::reset).
    pub fn interrupt(&self) {
        self.inner.interrupted.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Clears the signal.
    pub fn reset(&self) {
        self.inner.interrupted.store(false, Ordering::SeqCst);
    }

    /// Returns `true` if the signal is raised.
    pub fn is_interrupted(&self) -> bool {
        self.inner.interrupted.load(Ordering::SeqCst)
    }

    /// Completes once the signal is raised.
    pub async fn interrupted(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so an interrupt in between
            // is not missed.
            notified.as_mut().enable();
            if self.is_interrupted() {
                return;
            }
            notified.await;
        }
    }
}

// =============================================================================
// BlockingRuntime
// =============================================================================

/// The tokio runtime blocking calls are driven on.
///
/// Either borrows the runtime the context was built in or owns a small
/// dedicated one.
pub struct BlockingRuntime {
    handle: Handle,
    owned: Option<Runtime>,
}

impl BlockingRuntime {
    /// Drives blocking calls on an existing runtime.
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            handle,
            owned: None,
        }
    }

    /// Uses the current runtime, or starts a dedicated one when the caller
    /// is outside any runtime.
    ///
    /// # Errors
    ///
    /// Fails if the dedicated runtime cannot be started.
    pub fn current_or_dedicated() -> UaResult<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self::from_handle(handle));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("uanode-blocking")
            .enable_all()
            .build()
            .map_err(|e| ConfigurationError::runtime_unavailable(e.to_string()))?;
        debug!("Started dedicated runtime for blocking calls");

        Ok(Self {
            handle: runtime.handle().clone(),
            owned: Some(runtime),
        })
    }

    /// Returns the runtime handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Returns `true` if this owns a dedicated runtime.
    pub fn is_dedicated(&self) -> bool {
        self.owned.is_some()
    }
}

impl Drop for BlockingRuntime {
    fn drop(&mut self) {
        // The last context may be dropped from inside an async task.
        if let Some(runtime) = self.owned.take() {
            runtime.shutdown_background();
        }
    }
}

impl fmt::Debug for BlockingRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingRuntime")
            .field("dedicated", &self.is_dedicated())
            .finish()
    }
}

// =============================================================================
// wait
// =============================================================================

/// Blocks the calling thread until `future` completes on `runtime` or
/// `interrupter` fires.
///
/// # Errors
///
/// Returns the future's own error unchanged, or [`UaError::Interrupted`]
/// naming `operation` when interrupted.
///
/// # Panics
///
/// Panics when called from inside an async execution context.
pub fn wait<F, T>(
    runtime: &Handle,
    interrupter: &Interrupter,
    operation: &str,
    future: F,
) -> UaResult<T>
where
    F: Future<Output = UaResult<T>>,
{
    if interrupter.is_interrupted() {
        debug!(operation = operation, "Blocking wait skipped: already interrupted");
        return Err(UaError::interrupted(operation));
    }

    let interrupted = interrupter.interrupted();
    futures::pin_mut!(future);
    futures::pin_mut!(interrupted);

    match runtime.block_on(select(future, interrupted)) {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            debug!(operation = operation, "Blocking wait interrupted");
            Err(UaError::interrupted(operation))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
