//! Background eviction of expired leases.
//!
//! The sweeper is housekeeping only: the lock manager already treats expired
//! records as absent. Sweeping keeps `list_locked` free of dead entries and
//! bounds the size of the store.

use crate::clock::Clock;
use crate::error::{LeaseError, Result};
use crate::store::LockStore;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Remove every lease that has expired as of `clock.now()`.
pub fn sweep_once<S: LockStore + ?Sized>(store: &S, clock: &dyn Clock) -> Result<usize> {
    let removed = store.delete_expired_before(clock.now())?;
    if removed > 0 {
        info!(removed, "swept expired leases");
    } else {
        debug!("no expired leases to sweep");
    }
    Ok(removed)
}

/// Periodic sweeper running on its own thread.
pub struct Sweeper;

impl Sweeper {
    /// Start sweeping `store` every `interval`.
    ///
    /// The first sweep runs one `interval` after spawning.
    pub fn spawn<S: LockStore + ?Sized + 'static>(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Result<SweeperHandle> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name("lease-sweeper".to_string())
            .spawn(move || {
                info!(interval_ms = interval.as_millis() as u64, "lease sweeper started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if let Err(e) = sweep_once(store.as_ref(), clock.as_ref()) {
                                warn!(error = %e, "lease sweep failed");
                            }
                        }
                        // Explicit stop, or the handle was dropped.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("lease sweeper stopped");
            })
            .map_err(spawn_failure)?;

        Ok(SweeperHandle {
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

fn spawn_failure(err: std::io::Error) -> LeaseError {
    LeaseError::Resource(format!("failed to start lease sweeper thread: {}", err))
}

/// Owner of a running sweeper thread.
///
/// Dropping the handle stops the sweeper without waiting for it.
#[derive(Debug)]
pub struct SweeperHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for its thread to exit.
    pub fn shutdown(mut self) {
        self.signal_stop();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("lease sweeper thread panicked");
        }
    }

    /// Block until the sweeper exits, which only happens after a stop.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("lease sweeper thread panicked");
        }
    }

    fn signal_stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.signal_stop();
    }
}
