//! atCloud365 device link protocol
//!
//! The device talks to the platform with Socket.IO (protocol v5) carried
//! over Engine.IO v4 text frames on a TLS WebSocket. This crate covers
//! everything above the WebSocket frame:
//!
//! ```text
//! ┌──────────────┬─────────────────┬──────────────────────────────┐
//! │ ENGINE.IO    │ SOCKET.IO       │ PAYLOAD                      │
//! │ 1 digit 0–4  │ 1 digit 0–6     │ JSON (object / array)        │
//! │              │ (only after 4)  │                              │
//! └──────────────┴─────────────────┴──────────────────────────────┘
//! ```
//!
//! - [`packet`]: the two-level packet codec (pure, stateless)
//! - [`handshake`]: open payload, connect auth frame, socket path
//! - [`event`]: inbound event classification and outbound device events
//! - [`command`]: typed `app-cmd` decoding
//! - [`auth`]: HTTPS token-exchange bodies
//! - [`assembler`]: rejoining frames split by the websocket receive buffer

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod assembler;
pub mod auth;
pub mod command;
pub mod event;
pub mod handshake;
pub mod packet;

pub use assembler::{AssemblyError, FrameAssembler};
pub use command::{Command, NO_VALUE};
pub use event::{dev_data_frame, dev_status_frame, InboundEvent};
pub use handshake::{connect_frame, OpenPayload};
pub use packet::{Frame, MessageKind, Packet, PacketError, PacketKind, MAX_FRAME_LEN};

/// Errors raised while interpreting a JSON payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// Payload is not valid JSON
    Json,
    /// JSON is valid but has the wrong shape (e.g. object where an array was expected)
    Shape,
    /// A required field is absent or has the wrong type
    MissingField(&'static str),
    /// A string field does not fit its fixed-capacity buffer
    TooLong,
}
