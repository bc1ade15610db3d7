//! HTTPS token exchange

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use atlink_protocol::auth::{auth_url, parse_token, AuthRequest};
use atlink_protocol::handshake::sensor_ids;
use embedded_svc::http::client::Client as HttpClient;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::client::{Configuration as HttpClientConfiguration, EspHttpConnection};
use log::{debug, info};

use crate::config::Settings;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest response body accepted from the token endpoint
const MAX_RESPONSE_BODY: usize = 2048;

/// Trade the device serial and client secret for a session token
pub fn request_token(settings: &Settings) -> Result<String> {
    let device = &settings.device;
    let url = auth_url(&device.server.url);
    let body = AuthRequest {
        sn: device.device.serial.as_str(),
        client_secret_key: &settings.auth.client_secret_key,
        sensor_ids: sensor_ids(
            device.device.base_sensor_id,
            usize::from(device.device.channel_count),
        )
        .collect(),
    }
    .to_json()
    .map_err(|e| anyhow!("request body: {e:?}"))?;

    info!(target: "auth", "authenticating {} at {url}", device.device.serial);

    let connection = EspHttpConnection::new(&HttpClientConfiguration {
        timeout: Some(HTTP_TIMEOUT),
        crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
        ..Default::default()
    })?;
    let mut client = HttpClient::wrap(connection);

    let content_length = body.len().to_string();
    let headers = [
        ("content-type", "application/json"),
        ("content-length", content_length.as_str()),
    ];
    let mut request = client
        .post(&url, &headers)
        .map_err(|e| anyhow!("{e:?}"))?;
    request
        .write_all(body.as_bytes())
        .map_err(|e| anyhow!("{e:?}"))?;
    request.flush().map_err(|e| anyhow!("{e:?}"))?;
    let mut response = request.submit().map_err(|e| anyhow!("{e:?}"))?;

    let status = response.status();
    let mut received = Vec::new();
    let mut chunk = [0u8; 256];
    loop {
        let read = response.read(&mut chunk).map_err(|e| anyhow!("{e:?}"))?;
        if read == 0 {
            break;
        }
        received.extend_from_slice(&chunk[..read]);
        if received.len() > MAX_RESPONSE_BODY {
            bail!("response body larger than {MAX_RESPONSE_BODY} bytes");
        }
    }

    if status != 200 {
        bail!("HTTP {status}");
    }

    let text = String::from_utf8(received).map_err(|_| anyhow!("response is not UTF-8"))?;
    debug!(target: "auth", "response: {text}");
    let token = parse_token(&text).map_err(|e| anyhow!("invalid response: {e:?}"))?;
    info!(target: "auth", "token received");
    Ok(token)
}
