use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::logging::LogSink;
use crate::process::{kill_process, KillOutcome, ProcessTable};

/// Result of the inter-cycle wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full poll interval elapsed; start the next cycle.
    Completed,
    /// Cancellation fired mid-wait; stop without another cycle.
    Cancelled,
}

/// Sleep for `interval`, aborting immediately if `token` fires.
async fn interruptible_wait(interval: Duration, token: &CancellationToken) -> WaitOutcome {
    tokio::select! {
        _ = token.cancelled() => WaitOutcome::Cancelled,
        _ = tokio::time::sleep(interval) => WaitOutcome::Completed,
    }
}

/// Strict greater-than: an instance exactly at the ceiling survives.
fn should_kill(lifetime_minutes: f64, max_lifetime_minutes: u64) -> bool {
    lifetime_minutes > max_lifetime_minutes as f64
}

/// One enumerate → evaluate → act pass over the process table.
fn run_cycle(config: &MonitorConfig, table: &mut ProcessTable, sink: &dyn LogSink) {
    let matches = table.processes_by_name(&config.process_name);
    let now_millis = Local::now().timestamp_millis();

    if matches.is_empty() {
        sink.log("No process found with this name.");
        return;
    }
    debug!(matches = matches.len(), "evaluating matched processes");

    for process in &matches {
        let lifetime = process.lifetime_minutes(now_millis);
        sink.log(&format!(
            "Process name: {}, ID: {}, Physical memory allocated: {}, Process lifetime {:.3} minutes.",
            process.name, process.pid, process.working_set_bytes, lifetime
        ));

        if should_kill(lifetime, config.max_lifetime_minutes) {
            // Logged before the kill lands; the line records the decision,
            // not a confirmed exit.
            sink.log(&format!(
                "Killed process {} (ID: {}) after {:.3} minutes.",
                process.name, process.pid, lifetime
            ));
            match kill_process(process.pid) {
                KillOutcome::Requested => {
                    debug!(pid = process.pid, "kill requested");
                }
                outcome => {
                    warn!(pid = process.pid, ?outcome, "kill request did not land");
                }
            }
        }
    }
}

/// Run the monitoring loop until `token` is cancelled.
///
/// Cancellation is cooperative and observed at two points: before a new
/// cycle begins, and during the inter-cycle wait. Enumeration and kill
/// failures never end the loop.
pub async fn run(config: MonitorConfig, sink: Arc<dyn LogSink>, token: CancellationToken) {
    let mut table = ProcessTable::new();

    while !token.is_cancelled() {
        run_cycle(&config, &mut table, sink.as_ref());

        match interruptible_wait(config.poll_interval, &token).await {
            WaitOutcome::Completed => {}
            WaitOutcome::Cancelled => break,
        }
    }
    debug!("monitor loop stopped");
}
