//! Prometheus metrics for queue traffic.

use crate::handler::Disposition;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder.
///
/// Call once at startup. Later calls, or a recorder installed elsewhere,
/// leave the first one in place.
pub fn init_metrics() {
    if PROMETHEUS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            info!("Prometheus metrics initialized");
        }
        Err(e) => warn!(error = %e, "Metrics recorder already installed"),
    }
}

/// Render metrics in Prometheus text format (empty before `init_metrics`).
pub fn render_metrics() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_default()
}

/// Counters for one queue.
#[derive(Clone, Debug)]
pub struct QueueMetrics {
    queue: String,
}

impl QueueMetrics {
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
        }
    }

    pub fn published(&self) {
        counter!("queue_messages_published_total", "queue" => self.queue.clone()).increment(1);
    }

    pub fn publish_failed(&self) {
        counter!("queue_publish_failures_total", "queue" => self.queue.clone()).increment(1);
    }

    pub fn delivered(&self, disposition: Disposition) {
        counter!(
            "queue_messages_delivered_total",
            "queue" => self.queue.clone(),
            "disposition" => disposition.as_str()
        )
        .increment(1);
    }
}
