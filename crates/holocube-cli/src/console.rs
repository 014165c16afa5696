//! Console input and Ctrl-C handling for the interactive apps

use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Read stdin lines on a background thread.
///
/// The thread ends at EOF or once the receiver is dropped; it is never
/// joined, so a blocked read does not hold up process exit.
pub fn spawn_line_reader(name: &str) -> Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            debug!("console reader finished");
        })
        .context("failed to spawn console reader")?;
    Ok(rx)
}

/// Latched Ctrl-C flag.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Start listening for Ctrl-C. Must be called inside the runtime.
    pub fn install() -> Self {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    debug!("interrupted");
                    let _ = tx.send(true);
                }
                Err(e) => {
                    warn!(error = %e, "cannot listen for Ctrl-C");
                    // keep the sender alive so waiters stay pending
                    tx.closed().await;
                }
            }
        });
        Self { rx }
    }

    pub fn is_set(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once Ctrl-C has been pressed.
    pub async fn wait(&mut self) {
        let listening = self.rx.wait_for(|stopped| *stopped).await.is_ok();
        if !listening {
            std::future::pending::<()>().await;
        }
    }

    /// Sleep for `duration`; returns `true` if interrupted instead.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if self.is_set() {
            return true;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => false,
            () = self.wait() => true,
        }
    }

    #[cfg(test)]
    pub fn manual() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_runs_to_completion_without_signal() {
        let (_tx, mut stop) = StopSignal::manual();
        assert!(!stop.sleep(Duration::from_millis(5)).await);
        assert!(!stop.is_set());
    }

    #[tokio::test]
    async fn test_sleep_is_cut_short_by_signal() {
        let (tx, mut stop) = StopSignal::manual();
        let waker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            tx.send(true).unwrap();
            tx
        });
        assert!(stop.sleep(Duration::from_secs(30)).await);
        assert!(stop.is_set());
        // latched: later sleeps return at once
        assert!(stop.sleep(Duration::from_secs(30)).await);
        drop(waker.await.unwrap());
    }
}
