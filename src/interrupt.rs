// src/interrupt.rs
// =============================================================================
// A shared "stop now" signal for a run.
//
// The pipeline raises it when Ctrl-C arrives; the crawl loop and the archive
// writer check it at their own safe points instead of being dropped mid-step.
// That way a file that is half-way onto disk is always finished (or removed)
// before the scratch directory is cleaned up.
//
// Built on a tokio watch channel so it can be both awaited (the crawl races
// it against a network fetch) and read synchronously (the archive writer runs
// on a blocking thread and checks it between chunks).
// =============================================================================

use thiserror::Error;
use tokio::sync::watch;

/// Returned by a step that stopped because the run was interrupted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("interrupted by user")]
pub struct Interrupted;

/// Raises the signal; owned by whoever listens for Ctrl-C.
#[derive(Debug)]
pub struct InterruptHandle {
    tx: watch::Sender<bool>,
}

impl InterruptHandle {
    pub fn raise(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes the signal; cheap to clone into each step.
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

impl Interrupt {
    pub fn new() -> (InterruptHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (InterruptHandle { tx }, Self { rx })
    }

    pub fn is_raised(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal is raised. Never resolves if the handle was
    /// dropped without raising it.
    pub async fn raised(&mut self) {
        let raised = self.rx.wait_for(|raised| *raised).await.is_ok();
        if !raised {
            std::future::pending::<()>().await;
        }
    }

    /// Returns `Err(Interrupted)` if the signal is up.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_raised() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_starts_lowered() {
        let (_handle, interrupt) = Interrupt::new();
        assert!(!interrupt.is_raised());
        assert_eq!(interrupt.check(), Ok(()));
    }

    #[test]
    fn test_raise_is_seen_by_every_clone() {
        let (handle, interrupt) = Interrupt::new();
        let other = interrupt.clone();
        handle.raise();
        assert!(interrupt.is_raised());
        assert_eq!(other.check(), Err(Interrupted));
    }

    #[tokio::test]
    async fn test_raised_wakes_waiter() {
        let (handle, mut interrupt) = Interrupt::new();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.raise();
        });
        tokio::time::timeout(Duration::from_secs(5), interrupt.raised())
            .await
            .expect("waiter should wake once raised");
    }

    #[tokio::test]
    async fn test_dropped_handle_never_fires() {
        let (handle, mut interrupt) = Interrupt::new();
        drop(handle);
        let waited = tokio::time::timeout(Duration::from_millis(50), interrupt.raised()).await;
        assert!(waited.is_err());
    }
}
