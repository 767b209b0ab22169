//! Single-slot alert with timed auto-clear.
//!
//! The slot is either `Idle` or `Visible`. Each transition aborts the pending
//! expiry task and issues a new [`ExpiryToken`]; an expiry that arrives with a
//! token other than the current one is ignored, so an old timer can never
//! clear a newer alert.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use shared::domain::{Alert, Severity};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tracing::{debug, warn};

pub const DEFAULT_ALERT_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertState {
    Idle,
    Visible { alert: Alert, expiry: ExpiryToken },
}

struct Slot {
    state: AlertState,
    issued: u64,
    timer: Option<JoinHandle<()>>,
}

impl Slot {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[derive(Clone)]
pub struct NotificationCenter {
    slot: Arc<Mutex<Slot>>,
    updates: Arc<watch::Sender<Option<Alert>>>,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_TTL)
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state: AlertState::Idle,
                issued: 0,
                timer: None,
            })),
            updates: Arc::new(updates),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replaces whatever is visible and restarts the auto-clear timer.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) {
        let alert = Alert::new(message, severity);
        let mut slot = self.lock();
        slot.cancel_timer();
        slot.issued += 1;
        let expiry = ExpiryToken(slot.issued);
        debug!(severity = %alert.severity, message = %alert.message, "alert raised");
        slot.state = AlertState::Visible {
            alert: alert.clone(),
            expiry,
        };
        slot.timer = self.schedule_expiry(expiry);
        self.updates.send_replace(Some(alert));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(message, Severity::Warning);
    }

    pub fn danger(&self, message: impl Into<String>) {
        self.notify(message, Severity::Danger);
    }

    /// Clears the alert immediately and cancels its timer.
    pub fn dismiss(&self) {
        let mut slot = self.lock();
        slot.cancel_timer();
        slot.issued += 1;
        slot.state = AlertState::Idle;
        self.updates.send_replace(None);
    }

    pub fn current(&self) -> Option<Alert> {
        match &self.lock().state {
            AlertState::Idle => None,
            AlertState::Visible { alert, .. } => Some(alert.clone()),
        }
    }

    pub fn state(&self) -> AlertState {
        self.lock().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Alert>> {
        self.updates.subscribe()
    }

    /// Clears the slot only if `token` still identifies the visible alert.
    fn expire(&self, token: ExpiryToken) -> bool {
        let mut slot = self.lock();
        match &slot.state {
            AlertState::Visible { expiry, .. } if *expiry == token => {
                slot.state = AlertState::Idle;
                slot.timer = None;
                self.updates.send_replace(None);
                true
            }
            _ => false,
        }
    }

    fn schedule_expiry(&self, token: ExpiryToken) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime available; alert stays until dismissed");
            return None;
        };
        let center = self.clone();
        let ttl = self.ttl;
        Some(runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if center.expire(token) {
                debug!("alert expired");
            }
        }))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/notifications_tests.rs"]
mod tests;
