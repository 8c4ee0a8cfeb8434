use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::scan::ScanReport;

/// Per-run counters for structured logging and the final report.
///
/// Tracks what happened to every file and directory the scan touched, plus
/// oracle traffic. All operations are atomic and lock-free.
#[derive(Debug, Default)]
pub struct ScanMetrics {
    files_summarized: AtomicU64,
    files_cached: AtomicU64,
    files_skipped: AtomicU64,
    files_excluded: AtomicU64,
    files_failed: AtomicU64,
    directories_summarized: AtomicU64,
    directories_cached: AtomicU64,
    directories_failed: AtomicU64,
    oracle_calls: AtomicU64,
}

impl ScanMetrics {
    /// Create a new ScanMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// A file summary was generated by the oracle
    pub fn record_file_summarized(&self) {
        self.files_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// A file summary was served from the store
    pub fn record_file_cached(&self) {
        self.files_cached.fetch_add(1, Ordering::Relaxed);
    }

    /// A file passed classification but had no content
    pub fn record_file_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// A file was ignored or classified as binary
    pub fn record_file_excluded(&self) {
        self.files_excluded.fetch_add(1, Ordering::Relaxed);
    }

    /// A file could not be read or summarized
    pub fn record_file_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A directory rollup was generated by the oracle
    pub fn record_directory_summarized(&self) {
        self.directories_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// A directory rollup already existed
    pub fn record_directory_cached(&self) {
        self.directories_cached.fetch_add(1, Ordering::Relaxed);
    }

    /// A directory rollup could not be generated
    pub fn record_directory_failed(&self) {
        self.directories_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// The oracle was invoked
    pub fn record_oracle_call(&self) {
        self.oracle_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Oracle invocations so far
    pub fn oracle_calls(&self) -> u64 {
        self.oracle_calls.load(Ordering::Relaxed)
    }

    /// Records served from the store
    pub fn cache_hits(&self) -> u64 {
        self.files_cached.load(Ordering::Relaxed) + self.directories_cached.load(Ordering::Relaxed)
    }

    /// Records that had to be generated (successfully or not)
    pub fn cache_misses(&self) -> u64 {
        self.files_summarized.load(Ordering::Relaxed)
            + self.files_failed.load(Ordering::Relaxed)
            + self.directories_summarized.load(Ordering::Relaxed)
            + self.directories_failed.load(Ordering::Relaxed)
    }

    /// Get cache hit rate as a percentage (0.0-100.0)
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits();
        let total = hits + self.cache_misses();
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    /// Freeze the counters into a report
    pub fn snapshot(&self) -> ScanReport {
        ScanReport {
            files_summarized: self.files_summarized.load(Ordering::Relaxed),
            files_cached: self.files_cached.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_excluded: self.files_excluded.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            directories_summarized: self.directories_summarized.load(Ordering::Relaxed),
            directories_cached: self.directories_cached.load(Ordering::Relaxed),
            directories_failed: self.directories_failed.load(Ordering::Relaxed),
            oracle_calls: self.oracle_calls.load(Ordering::Relaxed),
        }
    }
}

/// Log scan metrics at debug level.
///
/// Usage:
/// ```rust,ignore
/// let metrics = ScanMetrics::new();
/// // ... run a scan ...
/// log_scan_metrics!(&metrics, "scan");
/// ```
#[macro_export]
macro_rules! log_scan_metrics {
    ($metrics:expr, $name:expr) => {
        tracing::debug!(
            operation = $name,
            oracle_calls = $metrics.oracle_calls(),
            cache_hits = $metrics.cache_hits(),
            cache_misses = $metrics.cache_misses(),
            cache_hit_rate = $metrics.cache_hit_rate(),
            "scan_metrics"
        );
    };
}

/// Helper macro for logging elapsed time at trace level.
///
/// Usage:
/// ```rust,ignore
/// let start = Instant::now();
/// // ... some work ...
/// trace_time!(start, "walk");
/// // Or with additional fields:
/// trace_time!(start, "walk", directories = summaries.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Initialize structured logging based on CLI arguments
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = match (verbose, log_level) {
        (true, None) => "treesum=debug",
        (false, None) => "treesum=info",
        (_, Some(level)) => return init_with_level(level, log_json),
    };

    init_with_level(level, log_json)
}

fn init_with_level(level: &str, log_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // TREESUM_LOG wins over RUST_LOG, both over the CLI level
    let filter = EnvFilter::try_from_env("TREESUM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            EnvFilter::new(if level.contains('=') {
                level.to_string()
            } else {
                format!("treesum={}", level)
            })
        });

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(
                        tracing_subscriber::fmt::format::FmtSpan::NEW
                            | tracing_subscriber::fmt::format::FmtSpan::CLOSE,
                    ),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
