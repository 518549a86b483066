/*!
 * Monitoring
 * Tracing setup and wait instrumentation
 */

mod tracer;

pub use tracer::{init_tracing, try_init_tracing, WaitSpan, SLOW_WAIT_THRESHOLD};
