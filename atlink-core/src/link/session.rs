//! Per-connection session data

use heapless::String;

use super::heartbeat::LivenessMonitor;

/// Maximum length of an Engine.IO session id
pub const MAX_SID_LEN: usize = 64;

/// Maximum length of an auth token
pub const MAX_TOKEN_LEN: usize = 512;

/// Session state for one transport connection
///
/// The auth token is injected before the first connect and survives
/// disconnects so reconnects can reuse it. Everything else is cleared by
/// [`Session::reset`].
#[derive(Debug, Clone)]
pub struct Session {
    sid: String<MAX_SID_LEN>,
    token: String<MAX_TOKEN_LEN>,
    reconnect_interval_ms: u32,
    liveness: LivenessMonitor,
}

impl Session {
    /// Create an empty session
    pub const fn new(reconnect_interval_ms: u32, heartbeat_timeout_ms: u32) -> Self {
        Self {
            sid: String::new(),
            token: String::new(),
            reconnect_interval_ms,
            liveness: LivenessMonitor::new(heartbeat_timeout_ms),
        }
    }

    /// Session id assigned by the server (empty before the open packet)
    pub fn sid(&self) -> &str {
        self.sid.as_str()
    }

    /// Store the session id; ids longer than [`MAX_SID_LEN`] are rejected
    pub fn set_sid(&mut self, sid: &str) -> bool {
        self.sid.clear();
        self.sid.push_str(sid).is_ok()
    }

    /// Auth token sent in the connect packet
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Check if a token has been supplied
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Store the auth token; tokens longer than [`MAX_TOKEN_LEN`] are rejected
    pub fn set_token(&mut self, token: &str) -> bool {
        self.token.clear();
        if self.token.push_str(token).is_ok() {
            true
        } else {
            self.token.clear();
            false
        }
    }

    /// Delay between a disconnect and the next connection attempt
    pub fn reconnect_interval_ms(&self) -> u32 {
        self.reconnect_interval_ms
    }

    /// Time of the last inbound frame, `None` while not connected
    pub fn last_inbound_activity_ms(&self) -> Option<u32> {
        self.liveness.last_activity_ms()
    }

    /// Liveness monitor
    pub fn liveness(&self) -> &LivenessMonitor {
        &self.liveness
    }

    /// Mutable liveness monitor
    pub fn liveness_mut(&mut self) -> &mut LivenessMonitor {
        &mut self.liveness
    }

    /// Clear connection data, keeping the credentials
    pub fn reset(&mut self) {
        self.sid.clear();
        self.liveness.disarm();
    }
}
