// Per-widget refresh timers
use crate::domain::dashboard::DashboardEvent;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owns one independent timer task per auto-refreshing widget.
///
/// Each task only knows its widget id and an event sender; it never reads
/// the store. Timers are aborted exactly once: on `cancel`, on restart with
/// a new interval, or when the scheduler is dropped.
pub struct RefreshScheduler {
    timers: HashMap<String, JoinHandle<()>>,
    events: broadcast::Sender<DashboardEvent>,
}

impl RefreshScheduler {
    pub fn new(events: broadcast::Sender<DashboardEvent>) -> Self {
        Self {
            timers: HashMap::new(),
            events,
        }
    }

    /// (Re)start the timer for `widget_id`. An interval of 0 only cancels.
    pub fn start(&mut self, widget_id: &str, interval_ms: u64) {
        self.cancel(widget_id);
        if interval_ms == 0 {
            return;
        }

        let events = self.events.clone();
        let id = widget_id.to_string();
        let period = Duration::from_millis(interval_ms);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let _ = events.send(DashboardEvent::Refresh {
                    widget_id: id.clone(),
                });
            }
        });

        tracing::debug!("Started refresh timer for {} every {}ms", widget_id, interval_ms);
        self.timers.insert(widget_id.to_string(), handle);
    }

    /// Returns true if a timer was running for the widget.
    pub fn cancel(&mut self, widget_id: &str) -> bool {
        match self.timers.remove(widget_id) {
            Some(handle) => {
                handle.abort();
                tracing::debug!("Cancelled refresh timer for {}", widget_id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    pub fn is_scheduled(&self, widget_id: &str) -> bool {
        self.timers.contains_key(widget_id)
    }

    pub fn active(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
