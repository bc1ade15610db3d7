//! Link state definition

use super::events::LinkEvent;

/// Link states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No transport; a reconnect may be scheduled
    #[default]
    Disconnected,
    /// Transport asked to open, waiting for it to come up
    TransportConnecting,
    /// Transport up, waiting for the Engine.IO open packet
    AwaitingOpen,
    /// Connect packet with the token sent, waiting for the acknowledgment
    AwaitingAck,
    /// Handshake complete; application packets may flow
    Ready,
}

impl ConnectionState {
    /// Check if application packets may be sent
    pub fn can_emit(&self) -> bool {
        matches!(self, ConnectionState::Ready)
    }

    /// Check if a transport connection exists or is being set up
    pub fn is_active(&self) -> bool {
        !matches!(self, ConnectionState::Disconnected)
    }

    /// Check if the transport is up (frames can be sent)
    pub fn is_transport_up(&self) -> bool {
        matches!(
            self,
            ConnectionState::AwaitingOpen | ConnectionState::AwaitingAck | ConnectionState::Ready
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use ConnectionState::*;
        use LinkEvent::*;

        match (self, event) {
            // Handshake, in order
            (Disconnected, Begin) => TransportConnecting,
            (TransportConnecting, TransportUp) => AwaitingOpen,
            (AwaitingOpen, OpenReceived) => AwaitingAck,
            (AwaitingAck, ConnectAcked) => Ready,

            // Teardown from anywhere
            (_, TransportDown) => Disconnected,
            (_, End) => Disconnected,
            (_, Timeout) => Disconnected,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_sequence() {
        let state = ConnectionState::Disconnected
            .transition(LinkEvent::Begin)
            .transition(LinkEvent::TransportUp)
            .transition(LinkEvent::OpenReceived)
            .transition(LinkEvent::ConnectAcked);
        assert_eq!(state, ConnectionState::Ready);
        assert!(state.can_emit());
    }

    #[test]
    fn test_out_of_order_events_ignored() {
        assert_eq!(
            ConnectionState::Disconnected.transition(LinkEvent::OpenReceived),
            ConnectionState::Disconnected
        );
        assert_eq!(
            ConnectionState::AwaitingOpen.transition(LinkEvent::ConnectAcked),
            ConnectionState::AwaitingOpen
        );
        assert_eq!(
            ConnectionState::Ready.transition(LinkEvent::Begin),
            ConnectionState::Ready
        );
    }

    #[test]
    fn test_teardown_from_any_state() {
        let states = [
            ConnectionState::TransportConnecting,
            ConnectionState::AwaitingOpen,
            ConnectionState::AwaitingAck,
            ConnectionState::Ready,
        ];

        for state in states {
            assert_eq!(
                state.transition(LinkEvent::TransportDown),
                ConnectionState::Disconnected
            );
            assert_eq!(
                state.transition(LinkEvent::Timeout),
                ConnectionState::Disconnected
            );
            assert_eq!(state.transition(LinkEvent::End), ConnectionState::Disconnected);
        }
    }

    #[test]
    fn test_only_ready_can_emit() {
        assert!(!ConnectionState::Disconnected.can_emit());
        assert!(!ConnectionState::TransportConnecting.can_emit());
        assert!(!ConnectionState::AwaitingOpen.can_emit());
        assert!(!ConnectionState::AwaitingAck.can_emit());
        assert!(ConnectionState::Ready.can_emit());
    }

    #[test]
    fn test_transport_up_states() {
        assert!(!ConnectionState::TransportConnecting.is_transport_up());
        assert!(ConnectionState::AwaitingOpen.is_transport_up());
        assert!(ConnectionState::Ready.is_transport_up());
        assert!(ConnectionState::TransportConnecting.is_active());
        assert!(!ConnectionState::Disconnected.is_active());
    }
}
