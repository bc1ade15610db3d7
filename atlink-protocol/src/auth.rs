//! Device token exchange bodies
//!
//! Before opening the socket the device trades its serial number and
//! client secret for a session token:
//!
//! ```text
//! POST <server>/api/v3/devices/auth
//! {"sn":"…","client_secret_key":"…","sensorIds":[987700,987701]}
//! → 200 {"token":"…"}
//! ```
//!
//! The HTTPS exchange itself belongs to the platform layer.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::PayloadError;

/// Path of the token endpoint, relative to the server URL
pub const AUTH_ENDPOINT: &str = "/api/v3/devices/auth";

/// Token endpoint for a server URL (`https://host` → `https://host/api/v3/devices/auth`)
pub fn auth_url(server_url: &str) -> String {
    format!("{}{}", server_url.trim_end_matches('/'), AUTH_ENDPOINT)
}

/// Token request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest<'a> {
    pub sn: &'a str,
    pub client_secret_key: &'a str,
    #[serde(rename = "sensorIds")]
    pub sensor_ids: Vec<u32>,
}

impl<'a> AuthRequest<'a> {
    /// Serialize to the JSON request body
    pub fn to_json(&self) -> Result<String, PayloadError> {
        serde_json::to_string(self).map_err(|_| PayloadError::Json)
    }
}

/// Extract the session token from a successful response body
pub fn parse_token(body: &str) -> Result<String, PayloadError> {
    #[derive(Deserialize)]
    struct AuthResponse {
        #[serde(default)]
        token: Option<String>,
    }

    let response: AuthResponse = serde_json::from_str(body).map_err(|_| PayloadError::Json)?;
    response
        .token
        .filter(|token| !token.is_empty())
        .ok_or(PayloadError::MissingField("token"))
}
