use std::future;
use tokio::sync::watch;
use tracing::{debug, error};

/// Ctrl-C presses observed by the process, shared by everything that waits.
///
/// A single listener task owns the signal for the whole run, so presses are
/// seen whether the host is waiting on requests or on user input.
#[derive(Clone)]
pub struct Interrupts {
    presses: watch::Receiver<u64>,
}

impl Interrupts {
    /// Start the process-wide Ctrl-C listener. Call once, inside the runtime.
    pub fn listen() -> Self {
        let (trigger, interrupts) = Self::channel();
        tokio::spawn(async move {
            loop {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl-C: {}", err);
                    return;
                }
                debug!("Ctrl-C received");
                trigger.send_modify(|presses| *presses += 1);
            }
        });
        interrupts
    }

    /// Interrupts fed by hand instead of by the OS signal
    pub fn channel() -> (watch::Sender<u64>, Self) {
        let (trigger, presses) = watch::channel(0);
        (trigger, Self { presses })
    }

    /// Resolve on the next press not yet seen by this handle
    pub async fn next(&mut self) {
        if self.presses.changed().await.is_err() {
            future::pending::<()>().await;
        }
    }
}
