//! Link notifications

use atlink_protocol::{Command, Packet};

/// Receiver for link notifications
///
/// Injected into [`Link`](crate::link::Link) at construction. Callbacks run
/// synchronously inside `Link::service` on the control-loop thread and
/// must return promptly; work with side effects on the link (emitting
/// data, rebooting) is queued and carried out by the caller afterwards.
pub trait Listener {
    /// Handshake completed, the link is ready
    fn on_connect(&mut self) {}

    /// Connection lost or closed
    fn on_disconnect(&mut self) {}

    /// Every successfully decoded inbound packet, before it is handled
    fn on_packet(&mut self, _packet: &Packet<'_>) {}

    /// A decoded `app-cmd` instruction
    fn on_command(&mut self, command: Command);
}
