use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

pub const IMPORT_TICK: Duration = Duration::from_secs(1);
pub const EXPORT_TICK: Duration = Duration::from_secs(2);
pub const TIMEOUT_STATUS: u16 = 408;

/// One answer from a task status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub progress: i64,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeError {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub success: bool,
    pub status_code: u16,
    pub error: String,
    pub elapsed: Duration,
}

/// Poll `probe` once per tick until it reports 100, fails, or `timeout`
/// elapses. Each status call runs under the same deadline. A tick that
/// becomes ready together with the deadline may win either way.
pub async fn poll_task<F, Fut>(
    label: &str,
    tick: Duration,
    timeout: Duration,
    mut probe: F,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe, ProbeError>>,
{
    let started = Instant::now();
    let mut ticker = interval_at(started + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return timed_out(label, started),
            _ = ticker.tick() => {}
        }

        if deadline.is_elapsed() {
            return timed_out(label, started);
        }

        let result = tokio::select! {
            r = probe() => r,
            _ = &mut deadline => return timed_out(label, started),
        };

        match result {
            Ok(Probe { progress: 100, status }) => {
                let elapsed = started.elapsed();
                tracing::info!(task = label, ?elapsed, "Task completed");
                return PollOutcome {
                    success: true,
                    status_code: status,
                    error: String::new(),
                    elapsed,
                };
            }
            Ok(Probe { progress, .. }) => {
                tracing::debug!(task = label, progress, "Task in progress");
            }
            Err(e) => {
                let elapsed = started.elapsed();
                tracing::warn!(task = label, error = %e.message, "Task status check failed");
                return PollOutcome {
                    success: false,
                    status_code: e.status,
                    error: e.message,
                    elapsed,
                };
            }
        }
    }
}

fn timed_out(label: &str, started: Instant) -> PollOutcome {
    let elapsed = started.elapsed();
    tracing::warn!(task = label, ?elapsed, "Task polling timed out");
    PollOutcome {
        success: false,
        status_code: TIMEOUT_STATUS,
        error: format!("{} timed out after {:?}", label, elapsed),
        elapsed,
    }
}
