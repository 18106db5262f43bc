//! Leaves the open station after a period without user input.

use bridge_traits::time::Clock;
use chrono::{DateTime, Utc};
use core_runtime::config::Language;
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

pub struct InactivityWatchdog {
    clock: Arc<dyn Clock>,
    timeout: Duration,
    last_input: Mutex<DateTime<Utc>>,
    /// Set once the timeout was reported; reset by the next input
    fired: AtomicBool,
    event_bus: Option<EventBus>,
}

impl InactivityWatchdog {
    pub fn new(clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        let now = clock.now();
        Self {
            clock,
            timeout,
            last_input: Mutex::new(now),
            fired: AtomicBool::new(false),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Any touch, click or key press restarts the countdown.
    pub fn record_input(&self) {
        *self.last_input.lock().unwrap_or_else(|e| e.into_inner()) = self.clock.now();
        self.fired.store(false, Ordering::SeqCst);
        debug!("Input recorded");
    }

    pub fn idle_for(&self) -> Duration {
        let last_input = *self.last_input.lock().unwrap_or_else(|e| e.into_inner());
        (self.clock.now() - last_input)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn is_expired(&self) -> bool {
        self.idle_for() >= self.timeout
    }

    /// Returns `true` exactly once per idle period, when the timeout has
    /// passed. Emits [`SessionEvent::InactivityTimeout`] at that moment.
    pub fn check(&self) -> bool {
        if !self.is_expired() || self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }

        warn!(timeout_secs = self.timeout.as_secs(), "No input within the timeout");
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Session(SessionEvent::InactivityTimeout))
                .ok();
        }
        true
    }

    /// Notice shown while the station is left because of inactivity.
    pub fn timeout_message(&self, language: Language) -> String {
        let minutes = self.timeout.as_secs() / 60;
        match language {
            Language::German => format!(
                "Länger als {} Minuten keine Eingabe, Medienstation wird beendet und freigegeben.",
                minutes
            ),
            Language::English => format!(
                "No input for more than {} minutes, the media station is closed and released.",
                minutes
            ),
        }
    }
}
