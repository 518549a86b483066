/*!
 * Structured Tracing
 * Subscriber setup and wait spans using the tracing crate
 *
 * Features:
 * - JSON-formatted logs for structured parsing
 * - Span per blocking wait with its measured duration
 * - Slow-wait warnings
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Blocking waits longer than this are reported at warn level
pub const SLOW_WAIT_THRESHOLD: Duration = Duration::from_millis(500);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - RENDEZVOUS_TRACE_JSON: Enable JSON output (default: false)
///
/// # Panics
///
/// Panics if a global subscriber is already installed; use
/// [`try_init_tracing`] where that may happen.
pub fn init_tracing() {
    if let Err(e) = try_init_tracing() {
        panic!("failed to install tracing subscriber: {}", e);
    }
}

/// Initialize structured tracing unless a subscriber is already installed
pub fn try_init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Check if JSON output is requested
    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?;
        info!("Structured tracing initialized with JSON output");
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
        info!("Structured tracing initialized");
    }

    Ok(())
}

/// Span covering one blocking wait on a rendezvous primitive
///
/// The span stays entered while the guard lives, so events logged during
/// the wait nest under it. Records the wait duration on drop. The guard is
/// tied to the thread that created it.
pub struct WaitSpan {
    span: tracing::span::EnteredSpan,
    start: Instant,
    primitive: &'static str,
}

impl WaitSpan {
    pub fn new(primitive: &'static str) -> Self {
        let span = span!(
            Level::TRACE,
            "wait",
            primitive = primitive,
            duration_us = tracing::field::Empty,
        );

        Self {
            span: span.entered(),
            start: Instant::now(),
            primitive,
        }
    }

    /// Time spent waiting so far
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for WaitSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration > SLOW_WAIT_THRESHOLD {
            warn!(
                primitive = self.primitive,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow wait detected"
            );
        } else {
            debug!(
                primitive = self.primitive,
                duration_us = duration.as_micros() as u64,
                "wait completed"
            );
        }
    }
}
