//! Packet encoding and decoding
//!
//! Frame format:
//! - KIND (1 char): Engine.IO packet type, `'0'..='4'`
//! - SUBTYPE (1 char, message packets only): Socket.IO packet type, `'0'..='6'`
//! - PAYLOAD (rest): passed through untouched
//!
//! The codec never inspects the payload. JSON is interpreted by the
//! [`handshake`](crate::handshake), [`event`](crate::event) and
//! [`command`](crate::command) modules.

use core::fmt::Write;

use heapless::String;

/// Maximum outbound frame length in bytes
pub const MAX_FRAME_LEN: usize = 1024;

/// An encoded outbound frame
pub type Frame = String<MAX_FRAME_LEN>;

// Engine.IO packet type characters
pub const KIND_OPEN: u8 = b'0';
pub const KIND_CLOSE: u8 = b'1';
pub const KIND_PING: u8 = b'2';
pub const KIND_PONG: u8 = b'3';
pub const KIND_MESSAGE: u8 = b'4';

/// Errors that can occur during packet decoding or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Empty frame
    Empty,
    /// First character is not a known Engine.IO packet type
    UnknownPacket(u8),
    /// Message packet without a Socket.IO type character
    MissingMessageType,
    /// Second character is not a known Socket.IO packet type
    UnknownMessage(u8),
    /// Encoded frame exceeds [`MAX_FRAME_LEN`]
    FrameTooLarge,
    /// Payload could not be serialized
    Json,
}

/// Socket.IO packet type carried inside an Engine.IO message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    Connect,
    Disconnect,
    Event,
    Ack,
    Error,
    BinaryEvent,
    BinaryAck,
}

impl MessageKind {
    /// Parse from the wire character
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(MessageKind::Connect),
            b'1' => Some(MessageKind::Disconnect),
            b'2' => Some(MessageKind::Event),
            b'3' => Some(MessageKind::Ack),
            b'4' => Some(MessageKind::Error),
            b'5' => Some(MessageKind::BinaryEvent),
            b'6' => Some(MessageKind::BinaryAck),
            _ => None,
        }
    }

    /// Wire character
    pub fn to_byte(self) -> u8 {
        match self {
            MessageKind::Connect => b'0',
            MessageKind::Disconnect => b'1',
            MessageKind::Event => b'2',
            MessageKind::Ack => b'3',
            MessageKind::Error => b'4',
            MessageKind::BinaryEvent => b'5',
            MessageKind::BinaryAck => b'6',
        }
    }
}

/// Engine.IO packet type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketKind {
    /// Handshake; payload is a JSON object carrying `sid`
    Open,
    /// Transport close requested by the server
    Close,
    /// Keep-alive probe, must be answered with [`PacketKind::Pong`]
    Ping,
    /// Keep-alive answer
    Pong,
    /// Socket.IO packet
    Message(MessageKind),
}

impl PacketKind {
    /// Engine.IO type character
    pub fn kind_byte(self) -> u8 {
        match self {
            PacketKind::Open => KIND_OPEN,
            PacketKind::Close => KIND_CLOSE,
            PacketKind::Ping => KIND_PING,
            PacketKind::Pong => KIND_PONG,
            PacketKind::Message(_) => KIND_MESSAGE,
        }
    }
}

/// A decoded frame, borrowing its payload from the raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet<'a> {
    pub kind: PacketKind,
    pub payload: &'a str,
}

impl<'a> Packet<'a> {
    /// Create a packet
    pub const fn new(kind: PacketKind, payload: &'a str) -> Self {
        Self { kind, payload }
    }

    /// Decode a raw text frame
    ///
    /// Never panics; unknown or truncated input yields an error and the
    /// caller discards the frame.
    pub fn decode(raw: &'a str) -> Result<Self, PacketError> {
        let bytes = raw.as_bytes();
        let first = *bytes.first().ok_or(PacketError::Empty)?;

        // Type characters are ASCII, so byte offsets 1 and 2 are char boundaries
        let kind = match first {
            KIND_OPEN => PacketKind::Open,
            KIND_CLOSE => PacketKind::Close,
            KIND_PING => PacketKind::Ping,
            KIND_PONG => PacketKind::Pong,
            KIND_MESSAGE => {
                let second = *bytes.get(1).ok_or(PacketError::MissingMessageType)?;
                let message =
                    MessageKind::from_byte(second).ok_or(PacketError::UnknownMessage(second))?;
                return Ok(Self::new(PacketKind::Message(message), &raw[2..]));
            }
            other => return Err(PacketError::UnknownPacket(other)),
        };

        Ok(Self::new(kind, &raw[1..]))
    }

    /// Encode into an outbound frame
    pub fn encode(&self) -> Result<Frame, PacketError> {
        encode(self.kind, self.payload)
    }
}

/// Decode a raw text frame (see [`Packet::decode`])
pub fn decode(raw: &str) -> Result<Packet<'_>, PacketError> {
    Packet::decode(raw)
}

/// Encode a packet: type prefix followed by the payload verbatim
///
/// The payload is not validated; event payloads must already be a JSON
/// array literal.
pub fn encode(kind: PacketKind, payload: &str) -> Result<Frame, PacketError> {
    let mut frame = Frame::new();
    frame
        .push(kind.kind_byte() as char)
        .map_err(|_| PacketError::FrameTooLarge)?;
    if let PacketKind::Message(message) = kind {
        frame
            .push(message.to_byte() as char)
            .map_err(|_| PacketError::FrameTooLarge)?;
    }
    frame
        .push_str(payload)
        .map_err(|_| PacketError::FrameTooLarge)?;
    Ok(frame)
}

/// Encode a packet whose payload is produced by formatting
///
/// Used by the event builders to write JSON straight into the frame.
pub(crate) fn encode_fmt(
    kind: PacketKind,
    args: core::fmt::Arguments<'_>,
) -> Result<Frame, PacketError> {
    let mut frame = encode(kind, "")?;
    frame
        .write_fmt(args)
        .map_err(|_| PacketError::FrameTooLarge)?;
    Ok(frame)
}
