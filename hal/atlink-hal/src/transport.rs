//! Cloud transport abstraction
//!
//! A transport delivers whole text frames over an already secured
//! connection (TLS + WebSocket on the device). Framing and encryption
//! below the frame level are the implementation's business.

use alloc::string::String;

/// Something that happened on the transport since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportEvent {
    /// Connection established, frames can flow
    Connected,
    /// Connection lost or closed by the peer
    Disconnected,
    /// A complete inbound text frame
    Text(String),
    /// Transport-level failure (handled like a disconnect)
    Error,
}

/// Reliable, ordered text-frame transport
///
/// All methods must return promptly. `open` only starts a connection
/// attempt; its outcome is reported later through [`Transport::poll`].
pub trait Transport {
    /// Error type for transport operations
    type Error;

    /// Start connecting to the configured endpoint
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Tear the connection down (idempotent)
    fn close(&mut self);

    /// Send one text frame
    fn send_text(&mut self, frame: &str) -> Result<(), Self::Error>;

    /// Take the next buffered event, if any
    ///
    /// Never blocks; returns `None` when nothing is buffered.
    fn poll(&mut self) -> Option<TransportEvent>;
}
