//! Time-driven reminder scheduling.
//!
//! The scheduler scans the unified event set on a fixed cadence and
//! fires each enabled reminder at most once per (event, reminder) pair
//! per process lifetime: the triggered-set is the sole source of truth,
//! so overlapping manual and periodic scans stay idempotent. The set is
//! not persisted -- a restart inside a trigger window can re-fire, which
//! is an accepted approximation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::config::ReminderConfig;
use crate::event::{Event, EventStore, Reminder, ReminderChannel};

/// A fired reminder, emitted once per (event, reminder) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderNotification {
    pub event_id: String,
    pub event_title: String,
    pub reminder_id: String,
    pub channel: ReminderChannel,
    pub trigger_at: DateTime<Utc>,
}

/// A pending reminder returned by the pure upcoming query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingReminder {
    pub event_id: String,
    pub event_title: String,
    pub reminder: Reminder,
    pub trigger_at: DateTime<Utc>,
}

/// Wall-clock reminder scheduler. The caller drives the cadence, either
/// directly through [`scan_at`](Self::scan_at) or via [`run`](Self::run).
pub struct ReminderScheduler {
    /// Half-width of the tolerance band around a reminder's fire time.
    window: Duration,
    triggered: HashSet<(String, String)>,
}

impl ReminderScheduler {
    pub fn new(config: &ReminderConfig) -> Self {
        Self {
            window: Duration::seconds(config.trigger_window_secs),
            triggered: HashSet::new(),
        }
    }

    /// Scan with the current wall clock.
    pub fn scan(&mut self, events: &[Event]) -> Vec<ReminderNotification> {
        self.scan_at(events, Utc::now())
    }

    /// Fire every enabled reminder whose trigger time lies within the
    /// tolerance band around `now` and has not fired before.
    pub fn scan_at(&mut self, events: &[Event], now: DateTime<Utc>) -> Vec<ReminderNotification> {
        let mut fired = Vec::new();
        for event in events {
            for reminder in event.reminders.iter().filter(|r| r.enabled) {
                let trigger_at = event.start_at - Duration::minutes(reminder.offset_minutes);
                let delta = now - trigger_at;
                if delta < -self.window || delta > self.window {
                    continue;
                }
                let key = (event.id.clone(), reminder.id.clone());
                if self.triggered.insert(key) {
                    fired.push(ReminderNotification {
                        event_id: event.id.clone(),
                        event_title: event.title.clone(),
                        reminder_id: reminder.id.clone(),
                        channel: reminder.channel,
                        trigger_at,
                    });
                }
            }
        }
        fired
    }

    /// Pure read: reminders whose trigger time falls strictly in
    /// `(now, now + within]`, ascending. Does not touch trigger state.
    pub fn upcoming_at(
        &self,
        events: &[Event],
        now: DateTime<Utc>,
        within: Duration,
    ) -> Vec<UpcomingReminder> {
        let mut out: Vec<UpcomingReminder> = events
            .iter()
            .flat_map(|event| {
                event.reminders.iter().filter(|r| r.enabled).filter_map(|reminder| {
                    let trigger_at = event.start_at - Duration::minutes(reminder.offset_minutes);
                    (trigger_at > now && trigger_at <= now + within).then(|| UpcomingReminder {
                        event_id: event.id.clone(),
                        event_title: event.title.clone(),
                        reminder: reminder.clone(),
                        trigger_at,
                    })
                })
            })
            .collect();
        out.sort_by_key(|r| r.trigger_at);
        out
    }

    /// Re-arm a reminder, e.g. after the user pushed the event's start.
    pub fn clear_triggered(&mut self, event_id: &str, reminder_id: &str) {
        self.triggered
            .remove(&(event_id.to_string(), reminder_id.to_string()));
    }

    pub fn triggered_count(&self) -> usize {
        self.triggered.len()
    }

    /// Poll loop: scans once immediately, then on every interval tick,
    /// sending notifications until the receiver goes away.
    pub async fn run(
        mut self,
        store: Arc<Mutex<EventStore>>,
        interval: std::time::Duration,
        tx: mpsc::Sender<ReminderNotification>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let events = match store.lock() {
                Ok(store) => store.all(),
                Err(_) => return,
            };
            for notification in self.scan(&events) {
                if tx.send(notification).await.is_err() {
                    return;
                }
            }
        }
    }
}
