//! Connection handshake
//!
//! ```text
//! server → 0{"sid":"…","pingInterval":25000,"pingTimeout":20000,…}
//! device → 40{"token":"<auth token>"}
//! server → 40{"sid":"…"}
//! ```

use alloc::format;
use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::packet::{encode, Frame, MessageKind, PacketError, PacketKind};
use crate::PayloadError;

/// Engine.IO protocol revision requested in the socket path
pub const ENGINE_IO_VERSION: u8 = 4;

/// Client version reported to the platform
pub const CLIENT_VERSION: &str = "V4";

/// Engine.IO open packet payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPayload {
    /// Session id assigned by the server
    pub sid: String,
    /// Server ping period in ms
    pub ping_interval: Option<u32>,
    /// Time the server waits for a pong, in ms
    pub ping_timeout: Option<u32>,
    /// Largest payload the server accepts, in bytes
    pub max_payload: Option<u32>,
}

impl OpenPayload {
    /// Parse the JSON that follows the `0` type character
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            #[serde(default)]
            sid: Option<String>,
            #[serde(default)]
            ping_interval: Option<u32>,
            #[serde(default)]
            ping_timeout: Option<u32>,
            #[serde(default)]
            max_payload: Option<u32>,
        }

        let raw: Raw = serde_json::from_str(payload).map_err(|_| PayloadError::Json)?;
        let sid = raw.sid.ok_or(PayloadError::MissingField("sid"))?;
        Ok(Self {
            sid,
            ping_interval: raw.ping_interval,
            ping_timeout: raw.ping_timeout,
            max_payload: raw.max_payload,
        })
    }
}

#[derive(Serialize)]
struct ConnectAuth<'a> {
    token: &'a str,
}

/// Socket.IO connect packet carrying the auth token
pub fn connect_frame(token: &str) -> Result<Frame, PacketError> {
    let auth = serde_json::to_string(&ConnectAuth { token }).map_err(|_| PacketError::Json)?;
    encode(PacketKind::Message(MessageKind::Connect), &auth)
}

/// Sensor ids announced to the platform: `count` consecutive ids from `base`
pub fn sensor_ids(base: u32, count: usize) -> impl Iterator<Item = u32> {
    (0..count as u32).map(move |i| base.wrapping_add(i))
}

/// WebSocket request path with the query the platform expects
///
/// `/api/dev/io/?sn=<sn>&clientType=device&clientVersion=V4&sensorIds=[1,2]&EIO=4&transport=websocket`
pub fn socket_path(api_path: &str, serial: &str, sensor_ids: impl Iterator<Item = u32>) -> String {
    let mut ids = String::from("[");
    for (i, id) in sensor_ids.enumerate() {
        if i > 0 {
            ids.push(',');
        }
        ids.push_str(&format!("{id}"));
    }
    ids.push(']');

    format!(
        "{api_path}?sn={serial}&clientType=device&clientVersion={CLIENT_VERSION}\
         &sensorIds={ids}&EIO={ENGINE_IO_VERSION}&transport=websocket"
    )
}

/// Strip the scheme from a server URL (`https://host` → `host`)
pub fn host_of(server_url: &str) -> &str {
    server_url
        .strip_prefix("https://")
        .or_else(|| server_url.strip_prefix("http://"))
        .unwrap_or(server_url)
        .trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_parse_open() {
        let open = OpenPayload::parse(
            r#"{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .unwrap();
        assert_eq!(open.sid, "abc");
        assert_eq!(open.ping_interval, Some(25000));
        assert_eq!(open.ping_timeout, Some(20000));
        assert_eq!(open.max_payload, Some(1_000_000));
    }

    #[test]
    fn test_parse_open_minimal() {
        let open = OpenPayload::parse(r#"{"sid":"abc"}"#).unwrap();
        assert_eq!(open.sid, "abc");
        assert_eq!(open.ping_interval, None);
    }

    #[test]
    fn test_parse_open_missing_sid() {
        assert_eq!(
            OpenPayload::parse(r#"{"pingInterval":25000}"#),
            Err(PayloadError::MissingField("sid"))
        );
        assert_eq!(OpenPayload::parse("not json"), Err(PayloadError::Json));
    }

    #[test]
    fn test_connect_frame() {
        let frame = connect_frame("tok").unwrap();
        assert_eq!(frame.as_str(), r#"40{"token":"tok"}"#);
    }

    #[test]
    fn test_connect_frame_escapes_token() {
        let frame = connect_frame("a\"b").unwrap();
        assert_eq!(frame.as_str(), r#"40{"token":"a\"b"}"#);
    }

    #[test]
    fn test_sensor_ids() {
        let ids: Vec<u32> = sensor_ids(0x0f1234, 3).collect();
        assert_eq!(ids, [0x0f1234, 0x0f1235, 0x0f1236]);
    }

    #[test]
    fn test_socket_path() {
        let path = socket_path("/api/dev/io/", "SN1", sensor_ids(10, 2));
        assert_eq!(
            path,
            "/api/dev/io/?sn=SN1&clientType=device&clientVersion=V4&sensorIds=[10,11]&EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://atcloud365.com"), "atcloud365.com");
        assert_eq!(host_of("http://example.org/"), "example.org");
        assert_eq!(host_of("example.org"), "example.org");
    }
}
