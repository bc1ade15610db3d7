//! TLS WebSocket transport
//!
//! The ESP-IDF websocket client runs its own task and reports through a
//! callback. The callback only converts events into owned
//! [`TransportEvent`]s and pushes them into a channel; the control loop
//! drains the channel through [`Transport::poll`] and stays the single
//! owner of the link.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use atlink_core::config::DeviceConfig;
use atlink_hal::{Transport, TransportEvent};
use atlink_protocol::handshake::{host_of, sensor_ids, socket_path};
use atlink_protocol::FrameAssembler;
use embedded_svc::ws::FrameType;
use esp_idf_svc::io::EspIOError;
use esp_idf_svc::ws::client::{
    EspWebSocketClient, EspWebSocketClientConfig, WebSocketEvent, WebSocketEventType,
};
use log::{debug, warn};

/// Time allowed for one blocking send
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive buffer of the websocket task; larger frames arrive in chunks
/// of this size and are rejoined by [`FrameAssembler`]
const WS_BUFFER_SIZE: usize = 2048;

/// `wss://` endpoint for a device configuration
pub fn endpoint_uri(config: &DeviceConfig) -> String {
    let path = socket_path(
        &config.server.path,
        &config.device.serial,
        sensor_ids(
            config.device.base_sensor_id,
            usize::from(config.device.channel_count),
        ),
    );
    format!(
        "wss://{}:{}{}",
        host_of(&config.server.url),
        config.server.port,
        path
    )
}

/// Transport failures
#[derive(Debug)]
pub enum WsError {
    /// Send attempted with no client
    NotOpen,
    Esp(EspIOError),
}

impl From<EspIOError> for WsError {
    fn from(e: EspIOError) -> Self {
        WsError::Esp(e)
    }
}

/// [`Transport`] over `EspWebSocketClient`
pub struct WsTransport {
    uri: String,
    client: Option<EspWebSocketClient<'static>>,
    events: Option<Receiver<TransportEvent>>,
}

impl WsTransport {
    pub fn new(uri: String) -> Self {
        Self {
            uri,
            client: None,
            events: None,
        }
    }
}

fn forward(
    tx: &Sender<TransportEvent>,
    assembler: &mut FrameAssembler,
    event: &Result<WebSocketEvent<'_>, EspIOError>,
) {
    let event = match event {
        Ok(event) => match event.event_type {
            WebSocketEventType::Connected => {
                assembler.reset();
                TransportEvent::Connected
            }
            WebSocketEventType::Disconnected
            | WebSocketEventType::Close(_)
            | WebSocketEventType::Closed => {
                assembler.reset();
                TransportEvent::Disconnected
            }
            WebSocketEventType::Text(chunk) => match assembler.push(chunk) {
                Ok(Some(frame)) => TransportEvent::Text(frame),
                Ok(None) => return,
                Err(e) => {
                    warn!(target: "socket", "inbound frame dropped: {e:?}");
                    return;
                }
            },
            _ => return,
        },
        Err(e) => {
            warn!(target: "socket", "websocket error: {e:?}");
            assembler.reset();
            TransportEvent::Error
        }
    };
    // The receiver is gone once the connection has been replaced
    let _ = tx.send(event);
}

impl Transport for WsTransport {
    type Error = WsError;

    fn open(&mut self) -> Result<(), WsError> {
        self.close();

        // A fresh channel per connection keeps late events of the previous
        // client out of the new session.
        let (tx, rx) = mpsc::channel();
        let mut assembler = FrameAssembler::new(WS_BUFFER_SIZE);
        let config = EspWebSocketClientConfig {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            disable_auto_reconnect: true,
            buffer_size: WS_BUFFER_SIZE,
            ..Default::default()
        };

        debug!(target: "socket", "opening {}", self.uri);
        let client = EspWebSocketClient::new(&self.uri, &config, SEND_TIMEOUT, move |event| {
            forward(&tx, &mut assembler, event)
        })?;

        self.client = Some(client);
        self.events = Some(rx);
        Ok(())
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(target: "socket", "websocket closed");
        }
        self.events = None;
    }

    fn send_text(&mut self, frame: &str) -> Result<(), WsError> {
        let client = self.client.as_mut().ok_or(WsError::NotOpen)?;
        client
            .send(FrameType::Text(false), frame.as_bytes())
            .map_err(|e| WsError::Esp(EspIOError(e)))
    }

    fn poll(&mut self) -> Option<TransportEvent> {
        self.events.as_ref()?.try_recv().ok()
    }
}
