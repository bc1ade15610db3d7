//! Socket.IO events
//!
//! Event payloads are JSON arrays whose first element is the event name:
//! `["dev-data",{"content":[1,0,1]}]`.

use alloc::string::{String, ToString};

use serde_json::Value;

use crate::command::Command;
use crate::packet::{encode, encode_fmt, Frame, MessageKind, PacketError, PacketKind};
use crate::PayloadError;

/// Inbound: platform → device command channel
pub const EVENT_APP_CMD: &str = "app-cmd";
/// Inbound: legacy spelling of [`EVENT_APP_CMD`] still sent by older servers
pub const EVENT_APP_CMD_LEGACY: &str = "appcmd";
/// Inbound: diagnostic confirmation sent after the handshake
pub const EVENT_CONNECTED: &str = "connected";
/// Outbound: channel states
pub const EVENT_DEV_DATA: &str = "dev-data";
/// Outbound: free-text device status
pub const EVENT_DEV_STATUS: &str = "dev-status";

/// Status sent after the first handshake since power-on
pub const STATUS_BOOTUP: &str = "Bootup & Ready";
/// Status sent after a later handshake (when the reconnect policy announces it)
pub const STATUS_RECONNECTED: &str = "Reconnected";
/// Status sent right before a commanded restart
pub const STATUS_REBOOTING: &str = "Rebooting";

/// A classified inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `app-cmd` with its decoded operation
    Command(Command),
    /// `connected` confirmation
    Connected,
    /// Any other event name
    Other(String),
}

impl InboundEvent {
    /// Classify the payload of a Message/Event packet
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        let value: Value =
            serde_json::from_str(skip_header(payload)).map_err(|_| PayloadError::Json)?;
        let items = value.as_array().ok_or(PayloadError::Shape)?;
        let name = items
            .first()
            .and_then(Value::as_str)
            .ok_or(PayloadError::MissingField("name"))?;

        match name {
            EVENT_APP_CMD | EVENT_APP_CMD_LEGACY => {
                let arg = items.get(1).ok_or(PayloadError::MissingField("args"))?;
                Command::from_value(arg).map(InboundEvent::Command)
            }
            EVENT_CONNECTED => Ok(InboundEvent::Connected),
            other => Ok(InboundEvent::Other(other.to_string())),
        }
    }
}

/// Skip an optional `/namespace,` and ack id in front of the JSON array
pub(crate) fn skip_header(payload: &str) -> &str {
    let mut rest = payload;
    if rest.starts_with('/') {
        rest = match rest.find(',') {
            Some(comma) => &rest[comma + 1..],
            None => "",
        };
    }
    rest.trim_start_matches(|c: char| c.is_ascii_digit())
}

/// `42["dev-data",{"content":[..]}]`, one `0`/`1` per channel in declared order
pub fn dev_data_frame(states: &[bool]) -> Result<Frame, PacketError> {
    let mut frame = encode(PacketKind::Message(MessageKind::Event), "[\"")?;
    let push = |frame: &mut Frame, s: &str| frame.push_str(s).map_err(|_| PacketError::FrameTooLarge);

    push(&mut frame, EVENT_DEV_DATA)?;
    push(&mut frame, "\",{\"content\":[")?;
    for (i, &on) in states.iter().enumerate() {
        if i > 0 {
            push(&mut frame, ",")?;
        }
        push(&mut frame, if on { "1" } else { "0" })?;
    }
    push(&mut frame, "]}]")?;
    Ok(frame)
}

/// `42["dev-status","<text>"]`
pub fn dev_status_frame(status: &str) -> Result<Frame, PacketError> {
    let text = serde_json::to_string(status).map_err(|_| PacketError::Json)?;
    encode_fmt(
        PacketKind::Message(MessageKind::Event),
        format_args!("[\"{EVENT_DEV_STATUS}\",{text}]"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_app_cmd() {
        let event = InboundEvent::parse(
            r#"["app-cmd",{"operation":{"customCmd":"clear-call-bell","fieldIndex":2,"fieldValue":0}}]"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::Command(Command::new("clear-call-bell", 2, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_legacy_name() {
        let event = InboundEvent::parse(r#"["appcmd",{"operation":{"customCmd":"sync"}}]"#).unwrap();
        assert!(matches!(event, InboundEvent::Command(cmd) if cmd.name() == "sync"));
    }

    #[test]
    fn test_parse_connected_and_other() {
        assert_eq!(
            InboundEvent::parse(r#"["connected","ok"]"#).unwrap(),
            InboundEvent::Connected
        );
        assert_eq!(
            InboundEvent::parse(r#"["weather",{}]"#).unwrap(),
            InboundEvent::Other("weather".to_string())
        );
    }

    #[test]
    fn test_parse_with_namespace_and_ack_id() {
        assert_eq!(
            InboundEvent::parse(r#"/dev,12["connected"]"#).unwrap(),
            InboundEvent::Connected
        );
        assert_eq!(
            InboundEvent::parse(r#"7["connected"]"#).unwrap(),
            InboundEvent::Connected
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(InboundEvent::parse("[\"app-cmd\""), Err(PayloadError::Json));
        assert_eq!(InboundEvent::parse("{}"), Err(PayloadError::Shape));
        assert_eq!(
            InboundEvent::parse("[42]"),
            Err(PayloadError::MissingField("name"))
        );
        assert_eq!(
            InboundEvent::parse(r#"["app-cmd"]"#),
            Err(PayloadError::MissingField("args"))
        );
        assert_eq!(
            InboundEvent::parse(r#"["app-cmd","text"]"#),
            Err(PayloadError::Shape)
        );
    }

    #[test]
    fn test_dev_data_frame() {
        let frame = dev_data_frame(&[true, false, true]).unwrap();
        assert_eq!(frame.as_str(), r#"42["dev-data",{"content":[1,0,1]}]"#);
    }

    #[test]
    fn test_dev_data_frame_empty() {
        let frame = dev_data_frame(&[]).unwrap();
        assert_eq!(frame.as_str(), r#"42["dev-data",{"content":[]}]"#);
    }

    #[test]
    fn test_dev_status_frame() {
        let frame = dev_status_frame(STATUS_BOOTUP).unwrap();
        assert_eq!(frame.as_str(), r#"42["dev-status","Bootup & Ready"]"#);
    }

    #[test]
    fn test_dev_status_frame_escapes() {
        let frame = dev_status_frame("say \"hi\"").unwrap();
        assert_eq!(frame.as_str(), r#"42["dev-status","say \"hi\""]"#);
    }
}
