//! Countdown to the event start.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

use crate::fetch::lock;

const TICK: Duration = Duration::from_secs(1);

/// Time left until a target, clamped at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = (target - now).num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    pub fn is_elapsed(&self) -> bool {
        *self == Self::default()
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

/// Owned once-per-second countdown. The ticking task stops at zero and is
/// aborted when the handle is dropped.
pub struct Countdown {
    target: Mutex<DateTime<Utc>>,
    sender: Arc<watch::Sender<TimeRemaining>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Countdown {
    pub fn start(target: DateTime<Utc>) -> Self {
        let (sender, _) = watch::channel(TimeRemaining::until(target, Utc::now()));
        let countdown = Self {
            target: Mutex::new(target),
            sender: Arc::new(sender),
            task: Mutex::new(None),
        };
        countdown.spawn_ticker(target);
        countdown
    }

    /// Point the countdown at a new target, restarting the ticker
    pub fn retarget(&self, target: DateTime<Utc>) {
        {
            let mut current = lock(&self.target);
            if *current == target {
                return;
            }
            *current = target;
        }
        debug!(%target, "Countdown retargeted");
        self.sender
            .send_replace(TimeRemaining::until(target, Utc::now()));
        self.spawn_ticker(target);
    }

    fn spawn_ticker(&self, target: DateTime<Utc>) {
        let sender = Arc::clone(&self.sender);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let remaining = TimeRemaining::until(target, Utc::now());
                sender.send_replace(remaining);
                if remaining.is_elapsed() {
                    debug!("Countdown reached zero");
                    break;
                }
            }
        });

        if let Some(previous) = lock(&self.task).replace(handle) {
            previous.abort();
        }
    }

    pub fn target(&self) -> DateTime<Utc> {
        *lock(&self.target)
    }

    pub fn current(&self) -> TimeRemaining {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimeRemaining> {
        self.sender.subscribe()
    }

    /// Whether the ticking task is still running
    pub fn is_ticking(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_one_of_each_unit() {
        let now = Utc::now();
        let remaining = TimeRemaining::until(now + ChronoDuration::seconds(90_061), now);
        assert_eq!(
            remaining,
            TimeRemaining {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
        assert_eq!(remaining.total_seconds(), 90_061);
    }

    #[test]
    fn test_past_target_clamps_to_zero() {
        let now = Utc::now();
        let remaining = TimeRemaining::until(now - ChronoDuration::hours(3), now);
        assert!(remaining.is_elapsed());
        assert_eq!(remaining.total_seconds(), 0);
    }

    #[test]
    fn test_exact_target_is_elapsed() {
        let now = Utc::now();
        assert!(TimeRemaining::until(now, now).is_elapsed());
    }

    #[tokio::test]
    async fn test_ticker_stops_after_target_passes() {
        let countdown = Countdown::start(Utc::now() - ChronoDuration::seconds(5));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(countdown.current().is_elapsed());
        assert!(!countdown.is_ticking());
    }

    #[tokio::test]
    async fn test_ticker_publishes_updates() {
        let countdown = Countdown::start(Utc::now() + ChronoDuration::seconds(30));
        let mut updates = countdown.subscribe();
        updates.changed().await.unwrap();

        let remaining = *updates.borrow();
        assert!(remaining.total_seconds() <= 30);
        assert!(countdown.is_ticking());
    }

    #[tokio::test]
    async fn test_retarget_restarts_ticker() {
        let countdown = Countdown::start(Utc::now() - ChronoDuration::seconds(1));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!countdown.is_ticking());

        let target = Utc::now() + ChronoDuration::days(2);
        countdown.retarget(target);
        assert_eq!(countdown.target(), target);
        assert_eq!(countdown.current().days, 1);
        assert!(countdown.is_ticking());
    }

    #[tokio::test]
    async fn test_drop_aborts_ticker() {
        let countdown = Countdown::start(Utc::now() + ChronoDuration::hours(1));
        let updates = countdown.subscribe();
        drop(countdown);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(updates.has_changed().is_err());
    }
}
