//! Events that trigger link state transitions

/// Events that can trigger link state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    // Lifecycle events
    /// Application asked to connect (or a scheduled reconnect fired)
    Begin,
    /// Application asked to stop for good
    End,

    // Transport events
    /// Transport reports the connection is up
    TransportUp,
    /// Transport dropped, errored, or the server closed the session
    TransportDown,

    // Handshake events
    /// Engine.IO open packet with a session id
    OpenReceived,
    /// Socket.IO connect acknowledgment
    ConnectAcked,

    // Liveness events
    /// No inbound frame within the heartbeat timeout
    Timeout,
}
