//! Link liveness monitoring
//!
//! A local check, independent of protocol ping/pong: any inbound frame
//! counts as activity. If nothing arrives for the timeout the link is
//! considered dead and gets torn down.

use atlink_hal::clock::elapsed_ms;

/// Liveness condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LivenessStatus {
    /// Not monitoring (no connection)
    Idle,
    /// Activity seen within the timeout
    Alive,
    /// Silent for at least the timeout
    TimedOut,
}

/// Inbound-activity watchdog
#[derive(Debug, Clone)]
pub struct LivenessMonitor {
    timeout_ms: u32,
    /// Time of the last activity, `None` while disarmed
    last_activity_ms: Option<u32>,
}

impl LivenessMonitor {
    /// Create a disarmed monitor
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            last_activity_ms: None,
        }
    }

    /// Start monitoring from `now`
    pub fn arm(&mut self, now_ms: u32) {
        self.last_activity_ms = Some(now_ms);
    }

    /// Stop monitoring
    pub fn disarm(&mut self) {
        self.last_activity_ms = None;
    }

    /// Record inbound activity (no-op while disarmed)
    pub fn record_activity(&mut self, now_ms: u32) {
        if self.last_activity_ms.is_some() {
            self.last_activity_ms = Some(now_ms);
        }
    }

    /// Time of the last recorded activity
    pub fn last_activity_ms(&self) -> Option<u32> {
        self.last_activity_ms
    }

    /// Configured timeout
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Check the liveness condition at `now`
    pub fn check(&self, now_ms: u32) -> LivenessStatus {
        match self.last_activity_ms {
            None => LivenessStatus::Idle,
            Some(last) if elapsed_ms(now_ms, last) > self.timeout_ms => LivenessStatus::TimedOut,
            Some(_) => LivenessStatus::Alive,
        }
    }
}
