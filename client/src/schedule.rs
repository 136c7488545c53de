//! Cancelable repeating jobs.
//!
//! An [`Interval`] runs an async job once per period on its own tokio task.
//! The job is awaited before the next period starts, so runs never overlap;
//! missed periods are delayed rather than bursted. Cancelling is idempotent,
//! and dropping the handle cancels the task, so a schedule can never outlive
//! its owner.
//!
//! # Example
//!
//! ```no_run
//! use std::ops::ControlFlow;
//! use std::time::Duration;
//! use studyguard_client::schedule::Interval;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut heartbeat = Interval::spawn("heartbeat", Duration::from_secs(1), || async {
//!         println!("tick");
//!         ControlFlow::Continue(())
//!     });
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     heartbeat.cancel();
//! }
//! ```

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Handle to a repeating job.
#[derive(Debug)]
pub struct Interval {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl Interval {
    /// Spawns `job` to run every `period`, first after one full period.
    ///
    /// The job returns [`ControlFlow::Break`] to end the schedule on its own
    /// (typically because the event channel closed).
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Consume the immediate first tick.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                trace!(schedule = name, "Running scheduled job");
                if job().await.is_break() {
                    debug!(schedule = name, "Scheduled job ended itself");
                    break;
                }
            }
        });

        debug!(schedule = name, period_ms = period.as_millis(), "Schedule armed");
        Self {
            name,
            handle: Some(handle),
        }
    }

    /// Cancels the schedule. Cancelling twice is a no-op.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(schedule = self.name, "Schedule cancelled");
        }
    }

    /// Whether the job is still scheduled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
