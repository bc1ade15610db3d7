//! Link owner
//!
//! [`Link`] owns the transport, the session and the connection state and is
//! driven by the control loop through [`Link::service`]. Nothing else
//! mutates link state.

use atlink_hal::clock::elapsed_ms;
use atlink_hal::{Transport, TransportEvent};
use atlink_protocol::event::{STATUS_BOOTUP, STATUS_RECONNECTED};
use atlink_protocol::packet::encode;
use atlink_protocol::{
    connect_frame, dev_data_frame, dev_status_frame, InboundEvent, MessageKind, OpenPayload,
    Packet, PacketError, PacketKind,
};

use super::events::LinkEvent;
use super::heartbeat::LivenessStatus;
use super::session::Session;
use super::state::ConnectionState;
use crate::config::{LinkConfig, ReconnectStatus};
use crate::traits::Listener;

/// Upper bound on transport events handled by one [`Link::service`] call
pub const MAX_FRAMES_PER_SERVICE: usize = 8;

/// Errors reported to the caller of a link operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// `begin` called before an auth token was supplied
    MissingToken,
    /// Auth token does not fit the session buffer
    TokenTooLong,
    /// Application packet offered while the link is not ready
    NotReady,
    /// Transport refused the frame; the link has been torn down
    Transport,
    /// Outbound frame could not be encoded
    Encode(PacketError),
}

/// Socket.IO device link
pub struct Link<T: Transport, L: Listener> {
    transport: T,
    listener: L,
    config: LinkConfig,
    state: ConnectionState,
    session: Session,
    /// Completed handshakes since construction
    handshakes: u32,
    /// Start of the current reconnect delay, `None` when none is scheduled
    disconnected_at_ms: Option<u32>,
    /// Timestamp of the latest `begin`/`service` call
    now_ms: u32,
}

impl<T: Transport, L: Listener> Link<T, L> {
    /// Create a disconnected link
    pub fn new(transport: T, listener: L, config: LinkConfig) -> Self {
        Self {
            transport,
            listener,
            config,
            state: ConnectionState::Disconnected,
            session: Session::new(config.reconnect_interval_ms, config.heartbeat_timeout_ms),
            handshakes: 0,
            disconnected_at_ms: None,
            now_ms: 0,
        }
    }

    /// Supply the auth token obtained from the token exchange
    pub fn set_token(&mut self, token: &str) -> Result<(), LinkError> {
        if self.session.set_token(token) {
            Ok(())
        } else {
            Err(LinkError::TokenTooLong)
        }
    }

    /// Start connecting
    ///
    /// Does nothing if a connection exists or is being set up. A transport
    /// that fails to open is handled like a dropped connection: a reconnect
    /// is scheduled and `Ok` is returned.
    pub fn begin(&mut self, now_ms: u32) -> Result<(), LinkError> {
        if !self.session.has_token() {
            error!("begin called without an auth token");
            return Err(LinkError::MissingToken);
        }
        self.now_ms = now_ms;
        if self.state.is_active() {
            return Ok(());
        }
        self.connect(now_ms);
        Ok(())
    }

    /// Close the connection for good (no reconnect)
    pub fn end(&mut self) {
        let was_active = self.state.is_active();
        if was_active {
            self.transport.close();
        }
        self.state = self.state.transition(LinkEvent::End);
        self.session.reset();
        self.disconnected_at_ms = None;
        if was_active {
            info!("link closed");
            self.listener.on_disconnect();
        }
    }

    /// Run one cooperative step
    ///
    /// Handles at most [`MAX_FRAMES_PER_SERVICE`] buffered transport events
    /// in arrival order, then checks liveness and a due reconnect. Never
    /// blocks.
    pub fn service(&mut self, now_ms: u32) {
        self.now_ms = now_ms;

        for _ in 0..MAX_FRAMES_PER_SERVICE {
            let Some(event) = self.transport.poll() else {
                break;
            };
            self.handle_transport_event(event, now_ms);
        }

        if self.state.is_active() && self.session.liveness().check(now_ms) == LivenessStatus::TimedOut
        {
            warn!(
                "no inbound frame for {} ms, dropping connection",
                self.config.heartbeat_timeout_ms
            );
            self.drop_connection(LinkEvent::Timeout, now_ms);
        }

        if let Some(since) = self.disconnected_at_ms {
            if !self.state.is_active()
                && elapsed_ms(now_ms, since) >= self.session.reconnect_interval_ms()
            {
                info!("reconnecting");
                self.connect(now_ms);
            }
        }
    }

    /// Send the channel states as a `dev-data` event
    pub fn emit_data(&mut self, states: &[bool]) -> Result<(), LinkError> {
        if !self.state.can_emit() {
            debug!("dev-data dropped, link is {:?}", self.state);
            return Err(LinkError::NotReady);
        }
        let frame = dev_data_frame(states).map_err(LinkError::Encode)?;
        self.send(&frame)
    }

    /// Send a free-text `dev-status` event
    pub fn emit_status(&mut self, status: &str) -> Result<(), LinkError> {
        if !self.state.can_emit() {
            debug!("dev-status dropped, link is {:?}", self.state);
            return Err(LinkError::NotReady);
        }
        let frame = dev_status_frame(status).map_err(LinkError::Encode)?;
        self.send(&frame)
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Check if application packets may be sent
    pub fn is_ready(&self) -> bool {
        self.state.can_emit()
    }

    /// Current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Number of completed handshakes since construction
    pub fn handshake_count(&self) -> u32 {
        self.handshakes
    }

    /// Time the next reconnect attempt is due, if one is scheduled
    pub fn next_reconnect_ms(&self) -> Option<u32> {
        self.disconnected_at_ms
            .map(|since| since.wrapping_add(self.session.reconnect_interval_ms()))
    }

    /// Injected listener
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the injected listener
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn connect(&mut self, now_ms: u32) {
        self.disconnected_at_ms = None;
        self.state = self.state.transition(LinkEvent::Begin);
        self.session.liveness_mut().arm(now_ms);

        if self.transport.open().is_err() {
            warn!("transport failed to open");
            self.transport.close();
            self.state = self.state.transition(LinkEvent::TransportDown);
            self.session.reset();
            self.disconnected_at_ms = Some(now_ms);
            return;
        }
        debug!("transport opening");
    }

    fn handle_transport_event(&mut self, event: TransportEvent, now_ms: u32) {
        match event {
            TransportEvent::Connected => {
                if self.state == ConnectionState::TransportConnecting {
                    self.state = self.state.transition(LinkEvent::TransportUp);
                    self.session.liveness_mut().record_activity(now_ms);
                    debug!("transport up, awaiting open packet");
                }
            }
            TransportEvent::Disconnected | TransportEvent::Error => {
                if self.state.is_active() {
                    warn!("transport lost in {:?}", self.state);
                    self.drop_connection(LinkEvent::TransportDown, now_ms);
                }
            }
            TransportEvent::Text(raw) => self.handle_frame(&raw, now_ms),
        }
    }

    fn handle_frame(&mut self, raw: &str, now_ms: u32) {
        if !self.state.is_transport_up() {
            trace!("frame ignored in {:?}", self.state);
            return;
        }
        self.session.liveness_mut().record_activity(now_ms);

        let packet = match Packet::decode(raw) {
            Ok(packet) => packet,
            Err(e) => {
                warn!("discarding frame: {:?}", e);
                return;
            }
        };
        self.listener.on_packet(&packet);

        match (self.state, packet.kind) {
            (ConnectionState::AwaitingOpen, PacketKind::Open) => {
                self.handle_open(packet.payload, now_ms)
            }
            (ConnectionState::AwaitingAck, PacketKind::Message(MessageKind::Connect)) => {
                self.handle_connect_ack()
            }
            (ConnectionState::AwaitingAck, PacketKind::Message(MessageKind::Error)) => {
                warn!("server rejected the connect packet");
                self.drop_connection(LinkEvent::TransportDown, now_ms);
            }
            (_, PacketKind::Ping) => {
                if let Ok(pong) = encode(PacketKind::Pong, "") {
                    let _ = self.send(&pong);
                }
            }
            (_, PacketKind::Pong) => {}
            (_, PacketKind::Close) | (_, PacketKind::Message(MessageKind::Disconnect)) => {
                info!("server closed the session");
                self.drop_connection(LinkEvent::TransportDown, now_ms);
            }
            (ConnectionState::Ready, PacketKind::Message(MessageKind::Event)) => {
                self.handle_event(packet.payload)
            }
            (state, kind) => {
                debug!("ignoring {:?} in {:?}", kind, state);
            }
        }
    }

    fn handle_open(&mut self, payload: &str, now_ms: u32) {
        let open = match OpenPayload::parse(payload) {
            Ok(open) => open,
            Err(e) => {
                warn!("bad open packet: {:?}", e);
                return;
            }
        };
        if !self.session.set_sid(&open.sid) {
            warn!("session id too long");
            return;
        }
        self.state = self.state.transition(LinkEvent::OpenReceived);
        debug!("open received, sid {}", self.session.sid());

        match connect_frame(self.session.token()) {
            Ok(frame) => {
                let _ = self.send(&frame);
            }
            Err(e) => {
                error!("cannot encode connect packet: {:?}", e);
                self.drop_connection(LinkEvent::TransportDown, now_ms);
            }
        }
    }

    fn handle_connect_ack(&mut self) {
        self.state = self.state.transition(LinkEvent::ConnectAcked);
        self.handshakes = self.handshakes.saturating_add(1);
        info!("link ready (handshake {})", self.handshakes);
        self.listener.on_connect();

        let status = if self.handshakes == 1 {
            Some(STATUS_BOOTUP)
        } else {
            match self.config.reconnect_status {
                ReconnectStatus::Announce => Some(STATUS_RECONNECTED),
                ReconnectStatus::Silent => None,
            }
        };
        if let Some(status) = status {
            let _ = self.emit_status(status);
        }
    }

    fn handle_event(&mut self, payload: &str) {
        match InboundEvent::parse(payload) {
            Ok(InboundEvent::Command(command)) => {
                debug!("command {}", command.name());
                self.listener.on_command(command);
            }
            Ok(InboundEvent::Connected) => info!("server confirmed the connection"),
            Ok(InboundEvent::Other(_name)) => debug!("ignoring event {}", _name.as_str()),
            Err(e) => warn!("discarding event: {:?}", e),
        }
    }

    fn send(&mut self, frame: &str) -> Result<(), LinkError> {
        if self.transport.send_text(frame).is_err() {
            warn!("send failed, dropping connection");
            self.drop_connection(LinkEvent::TransportDown, self.now_ms);
            return Err(LinkError::Transport);
        }
        Ok(())
    }

    fn drop_connection(&mut self, event: LinkEvent, now_ms: u32) {
        self.transport.close();
        self.state = self.state.transition(event);
        self.session.reset();
        self.disconnected_at_ms = Some(now_ms);
        info!(
            "disconnected, reconnect in {} ms",
            self.session.reconnect_interval_ms()
        );
        self.listener.on_disconnect();
    }
}
