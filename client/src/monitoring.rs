//! Monitoring lifecycle: the remote camera process and its video feed.
//!
//! [`start`] and [`stop`] perform the network side. [`MonitoringState`] is
//! the client's mirror of whether the feed is attached; it is owned by the
//! session controller and only changes on the dispatch loop.

use chrono::Utc;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};

/// An attached video feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFeed {
    /// Feed URL including the cache-busting query parameter.
    pub url: String,
    /// Timestamp (unix millis) used as the cache buster.
    pub attached_at_ms: i64,
}

/// Whether monitoring is active and which feed is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoringState {
    feed: Option<VideoFeed>,
}

impl MonitoringState {
    /// Attaches the feed, marking monitoring active.
    pub fn attach(&mut self, feed: VideoFeed) {
        self.feed = Some(feed);
    }

    /// Detaches the feed. Detaching twice is a no-op.
    pub fn detach(&mut self) {
        self.feed = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.feed.is_some()
    }

    #[must_use]
    pub fn feed(&self) -> Option<&VideoFeed> {
        self.feed.as_ref()
    }
}

/// Starts remote monitoring and builds the feed to attach.
///
/// Nothing is attached here; on failure there is no side effect at all.
///
/// # Errors
///
/// Returns the transport or service error that prevented the start.
pub async fn start(api: &ApiClient) -> Result<VideoFeed, ApiError> {
    api.start_monitoring().await?;

    let attached_at_ms = Utc::now().timestamp_millis();
    let feed = VideoFeed {
        url: api.video_feed_url(attached_at_ms),
        attached_at_ms,
    };
    info!(url = %feed.url, "Monitoring started");
    Ok(feed)
}

/// Stops remote monitoring, best effort.
///
/// The caller has already reset its own state; the result is only reported
/// so it can be logged.
pub async fn stop(api: &ApiClient) -> Result<(), ApiError> {
    match api.stop_monitoring().await {
        Ok(()) => {
            info!("Monitoring stopped");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Failed to stop monitoring");
            Err(e)
        }
    }
}
