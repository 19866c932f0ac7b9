//! Daily "did you log anything?" reminders.
//!
//! One `NagScheduler` is constructed by the composition root and handed to
//! whatever drives it. Each call reconstructs its decision from the
//! configuration and the freshly supplied "logged today" flag. At most one
//! batch of notifications is pending at a time, capped at
//! [`MAX_PENDING`] requests.

use logbook_core::entry::EntryQuery;
use logbook_core::{today_range, NagIntensity, NagTone, ReminderConfiguration, ReminderEvent};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::broadcast::{ChangeBroadcaster, NagChange};
use crate::clock::Clock;
use crate::history::HistoryLog;
use crate::messages::{pick_message, TITLE};
use crate::notifier::{new_notification_id, NotificationCenter, NotificationRequest};

/// Upper bound on notifications in one batch.
pub const MAX_PENDING: usize = 5;

/// Delay before the single Gentle notification fires.
pub const GENTLE_DELAY: Duration = Duration::seconds(60);

pub const DEFAULT_SNOOZE_MINUTES: u32 = 30;

/// Longest snooze honoured; larger requests are clamped to one week.
pub const MAX_SNOOZE_MINUTES: u32 = 7 * 24 * 60;

/// In-app banner. Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerState {
    pub visible: bool,
    pub message: String,
}

/// What `evaluate` decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NagDecision {
    Disabled,
    AlreadyLogged,
    /// Cutoff not reached; any earlier batch is left alone.
    BeforeCutoff,
    Scheduled { count: usize },
}

/// Offsets from "now" for each notification in a batch.
pub fn batch_offsets(intensity: NagIntensity) -> Vec<Duration> {
    let spacing = match intensity {
        NagIntensity::Gentle => return vec![GENTLE_DELAY],
        NagIntensity::Persistent => Duration::minutes(60),
        NagIntensity::BeastMode => Duration::minutes(30),
    };
    (1..=MAX_PENDING as i32).map(|i| spacing * i).collect()
}

pub struct NagScheduler {
    center: Arc<dyn NotificationCenter>,
    clock: Arc<dyn Clock>,
    history: HistoryLog,
    pending: Vec<String>,
    banner: BannerState,
    tone: NagTone,
    buddy_name: Option<String>,
    changes: ChangeBroadcaster,
}

impl NagScheduler {
    /// Build a scheduler, adopting whatever the center still has pending so
    /// a batch from an earlier session can be cancelled.
    pub fn new(
        center: Arc<dyn NotificationCenter>,
        history: HistoryLog,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut pending = center.pending();
        pending.truncate(MAX_PENDING);
        let defaults = ReminderConfiguration::default();
        Self {
            center,
            clock,
            history,
            pending,
            banner: BannerState::default(),
            tone: defaults.tone,
            buddy_name: defaults.buddy_name,
            changes: ChangeBroadcaster::default(),
        }
    }

    // ── Observable state ──

    pub fn banner(&self) -> &BannerState {
        &self.banner
    }

    /// Identifiers of the current batch.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn history(&self) -> &[ReminderEvent] {
        self.history.events()
    }

    /// Most recent reminder event, if any.
    pub fn last_event(&self) -> Option<&ReminderEvent> {
        self.history.latest()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NagChange> {
        self.changes.subscribe()
    }

    /// Remember the tone and buddy used for snooze messages.
    pub fn set_voice(&mut self, config: &ReminderConfiguration) {
        self.tone = config.tone;
        self.buddy_name = config.buddy_name.clone();
    }

    // ── Operations ──

    /// Decide whether to nag right now.
    pub fn evaluate(&mut self, today_has_entry: bool, config: &ReminderConfiguration) -> NagDecision {
        self.set_voice(config);

        if !config.enabled {
            self.cancel_all();
            self.clear_banner();
            return NagDecision::Disabled;
        }
        if today_has_entry {
            self.cancel_all();
            self.clear_banner();
            return NagDecision::AlreadyLogged;
        }

        let now = self.clock.now();
        if now.hour() < config.cutoff_hour {
            debug!(hour = now.hour(), cutoff = config.cutoff_hour, "before cutoff");
            return NagDecision::BeforeCutoff;
        }

        let count = self.schedule_batch(config.intensity, now);
        if config.in_app_enabled {
            let message = self.fresh_message();
            self.set_banner(message);
        } else {
            self.clear_banner();
        }
        self.record(ReminderEvent::shown(now));
        NagDecision::Scheduled { count }
    }

    /// Evaluate against an entry store, using today's local date range.
    /// A failing query takes no action.
    pub fn evaluate_with_entries(
        &mut self,
        entries: &dyn EntryQuery,
        config: &ReminderConfiguration,
    ) -> Option<NagDecision> {
        let (start, end) = today_range(self.clock.now());
        match entries.count_entries_in_range(start, end) {
            Ok(n) => Some(self.evaluate(n > 0, config)),
            Err(e) => {
                warn!(error = %e, "could not count today's entries, skipping reminder check");
                None
            }
        }
    }

    /// The user logged something, from anywhere in the app.
    pub fn user_logged_entry(&mut self) {
        self.cancel_all();
        self.clear_banner();
        let now = self.clock.now();
        self.record(ReminderEvent::logged_entry(now));
    }

    /// Hide the banner. The notification batch keeps running.
    pub fn user_dismissed_nag(&mut self) {
        self.clear_banner();
        let now = self.clock.now();
        self.record(ReminderEvent::dismissed(now));
    }

    /// Replace the batch with one notification `minutes` from now.
    /// Zero is treated as one minute, anything past [`MAX_SNOOZE_MINUTES`]
    /// as the maximum.
    pub fn user_snoozed_nag(&mut self, minutes: u32) {
        self.clear_banner();
        self.cancel_all();
        let now = self.clock.now();
        let delay = Duration::minutes(i64::from(minutes.clamp(1, MAX_SNOOZE_MINUTES)));
        match now.checked_add(delay) {
            Some(fire_at) => {
                let message = self.fresh_message();
                self.schedule_one(message, fire_at);
            }
            None => warn!(minutes, "snooze time out of range, nothing scheduled"),
        }
        self.changes.broadcast(NagChange::Pending(self.pending.len()));
        self.record(ReminderEvent::snoozed(now));
    }

    // ── Internals ──

    fn schedule_batch(&mut self, intensity: NagIntensity, now: OffsetDateTime) -> usize {
        self.cancel_all();
        let message = self.fresh_message();
        for offset in batch_offsets(intensity).into_iter().take(MAX_PENDING) {
            let Some(fire_at) = now.checked_add(offset) else {
                warn!(%offset, "reminder time out of range, skipped");
                continue;
            };
            self.schedule_one(message.clone(), fire_at);
        }
        debug!(count = self.pending.len(), %intensity, "scheduled reminder batch");
        self.changes.broadcast(NagChange::Pending(self.pending.len()));
        self.pending.len()
    }

    /// Track the id even when the center refuses, so cancellation stays consistent.
    fn schedule_one(&mut self, body: String, fire_at: OffsetDateTime) {
        let request = NotificationRequest {
            id: new_notification_id(),
            title: TITLE.to_string(),
            body,
            fire_at,
        };
        if let Err(e) = self.center.schedule(&request) {
            debug!(id = %request.id, error = %e, "notification not scheduled");
        }
        self.pending.push(request.id);
    }

    fn cancel_all(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if let Err(e) = self.center.cancel(&self.pending) {
            debug!(count = self.pending.len(), error = %e, "cancel failed");
        }
        self.pending.clear();
        self.changes.broadcast(NagChange::Pending(0));
    }

    fn fresh_message(&self) -> String {
        pick_message(self.tone, self.buddy_name.as_deref(), &mut rand::thread_rng())
    }

    fn set_banner(&mut self, message: String) {
        self.banner = BannerState {
            visible: true,
            message,
        };
        self.changes.broadcast(NagChange::Banner(self.banner.clone()));
    }

    fn clear_banner(&mut self) {
        if self.banner == BannerState::default() {
            return;
        }
        self.banner = BannerState::default();
        self.changes.broadcast(NagChange::Banner(self.banner.clone()));
    }

    fn record(&mut self, event: ReminderEvent) {
        self.history.record(event.clone());
        self.changes.broadcast(NagChange::Recorded(event));
    }
}
