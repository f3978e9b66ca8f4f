// ============================================================================
// ACCESS GATE - One editor at a time, released after a quiet period
// ============================================================================
// The gate is cooperative: it trusts whatever identity the request carries
// and only keeps two humans from editing the catalog at the same moment.

use crate::clock::Clock;
use std::{
    fmt,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Opaque identity of whoever is making a request (usually an IP address).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequesterId(String);

impl RequesterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// Someone else holds the session. Always at least 1.
    Denied { remaining_secs: u64 },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// Who holds the write session and since when.
#[derive(Debug, Clone)]
pub struct SessionState {
    holder: Option<RequesterId>,
    granted_at: Option<Instant>,
    window: Duration,
}

impl SessionState {
    pub fn new(window: Duration) -> Self {
        Self {
            holder: None,
            granted_at: None,
            window,
        }
    }

    pub fn holder(&self) -> Option<&RequesterId> {
        self.holder.as_ref()
    }

    pub fn check_admission(&self, requester: &RequesterId, now: Instant) -> Admission {
        if self.holder.as_ref() == Some(requester) {
            return Admission::Allowed;
        }

        let Some(granted_at) = self.granted_at else {
            return Admission::Allowed;
        };

        let elapsed = now.saturating_duration_since(granted_at);
        if elapsed >= self.window {
            return Admission::Allowed;
        }

        Admission::Denied {
            remaining_secs: ceil_secs(self.window - elapsed),
        }
    }

    pub fn grant(&mut self, requester: &RequesterId, now: Instant) {
        self.holder = Some(requester.clone());
        self.granted_at = Some(now);
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Process-wide gate shared by every request handler.
pub struct AccessGate {
    clock: Arc<dyn Clock>,
    state: Mutex<SessionState>,
}

impl AccessGate {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(SessionState::new(window)),
        }
    }

    /// Check and, when allowed, hand the session to `requester` under one lock.
    ///
    /// An unknown requester is let through without being granted anything.
    pub fn admit(&self, requester: Option<&RequesterId>) -> Admission {
        let Some(requester) = requester else {
            debug!("Requester identity unknown, letting request through");
            return Admission::Allowed;
        };

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();
        let admission = state.check_admission(requester, now);
        if admission.is_allowed() {
            if state.holder() != Some(requester) {
                info!("Session granted to {}", requester);
            }
            state.grant(requester, now);
        }
        admission
    }

    /// Same decision as [`AccessGate::admit`] but leaves the session untouched.
    pub fn probe(&self, requester: Option<&RequesterId>) -> Admission {
        let Some(requester) = requester else {
            return Admission::Allowed;
        };

        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.check_admission(requester, self.clock.now())
    }

    pub fn holder(&self) -> Option<RequesterId> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.holder().cloned()
    }
}
