use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

const WORKSPACE_CRATES: &[&str] = &["haste_core", "haste_uploader"];

#[derive(Debug, Default)]
pub struct UploadMetrics {
    operations_total: AtomicU64,
    chunks_uploaded_total: AtomicU64,
    bytes_sent_total: AtomicU64,
    failures_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub operations_total: u64,
    pub chunks_uploaded_total: u64,
    pub bytes_sent_total: u64,
    pub failures_total: u64,
    pub avg_chunk_latency_millis: f64,
}

impl UploadMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_operation(&self) {
        self.operations_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chunk(&self, bytes: usize, latency: Duration) {
        self.chunks_uploaded_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent_total
            .fetch_add(bytes as u64, Ordering::Relaxed);
        self.total_latency_millis
            .fetch_add(latency.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn inc_failure(&self) {
        self.failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let chunks = self.chunks_uploaded_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            operations_total: self.operations_total.load(Ordering::Relaxed),
            chunks_uploaded_total: chunks,
            bytes_sent_total: self.bytes_sent_total.load(Ordering::Relaxed),
            failures_total: self.failures_total.load(Ordering::Relaxed),
            avg_chunk_latency_millis: if chunks == 0 {
                0.0
            } else {
                latency as f64 / chunks as f64
            },
        }
    }
}

/// `info` for the calling service and every workspace crate, `warn` for
/// dependencies such as reqwest and hyper.
pub fn default_directives(service_name: &str) -> String {
    std::iter::once("warn".to_string())
        .chain(std::iter::once(format!("{service_name}=info")))
        .chain(WORKSPACE_CRATES.iter().map(|name| format!("{name}=info")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the JSON subscriber once per process. Output goes to stderr so
/// stdout stays free for command results.
///
/// `HASTE_LOG` takes precedence over `RUST_LOG`.
pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env("HASTE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
