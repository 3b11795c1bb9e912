use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

struct Pending {
    handle: JoinHandle<()>,
    started: Arc<AtomicBool>,
}

/// Coalesces bursts of calls: only the last future scheduled within a quiet period
/// runs. Work that already started is never aborted.
pub struct Debouncer {
    quiet: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let quiet = self.quiet;
        let started = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&started);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            flag.store(true, Ordering::SeqCst);
            work.await;
        });
        self.pending = Some(Pending { handle, started });
    }

    /// Drops the scheduled call if it is still waiting out its quiet period.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.started.load(Ordering::SeqCst) {
                log::debug!("debounce: superseded pending call");
                pending.handle.abort();
            }
        }
    }

    /// Waits for the scheduled call, if any, to run to completion.
    pub async fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.handle.await;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(log: &Arc<Mutex<Vec<String>>>, term: &str) -> impl Future<Output = ()> + Send {
        let log = Arc::clone(log);
        let term = term.to_string();
        async move {
            log.lock().unwrap().push(term);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_inputs_collapse_into_one_call() {
        let calls = recorder();
        let mut debouncer = Debouncer::default();

        for term in ["m", "mi", "mil", "milk"] {
            debouncer.schedule(record(&calls, term));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        debouncer.flush().await;

        assert_eq!(*calls.lock().unwrap(), vec!["milk".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn inputs_separated_by_quiet_period_all_run() {
        let calls = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(record(&calls, "a"));
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.schedule(record(&calls, "b"));
        debouncer.flush().await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_waiting_call() {
        let calls = recorder();
        let mut debouncer = Debouncer::default();
        debouncer.schedule(record(&calls, "x"));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn started_work_is_not_aborted() {
        let calls = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let slow_calls = Arc::clone(&calls);
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            slow_calls.lock().unwrap().push("slow".to_string());
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        debouncer.schedule(record(&calls, "fast"));
        debouncer.flush().await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        let mut seen = calls.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["fast".to_string(), "slow".to_string()]);
    }
}
