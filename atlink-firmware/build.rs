//! Build script for atlink-firmware
//!
//! - Exports the ESP-IDF environment for esp-idf-sys
//! - Validates device.toml at compile time
//! - Generates the board constants the firmware is sized by

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on channels, mirrors `atlink_core::config::MAX_CHANNELS`
const MAX_CHANNELS: i64 = 8;

fn main() {
    embuild::espidf::sysenv::output();

    let config = validate_config();
    write_board_constants(&config);
}

/// Parse and check device.toml, failing the build with every problem found
fn validate_config() -> toml::Value {
    println!("cargo:rerun-if-changed=device.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("device.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail(&[format!("cannot read device.toml: {e}")]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(&[format!("invalid TOML in device.toml: {e}")]),
    };

    let mut errors = Vec::new();
    validate_required(&config, &mut errors);
    validate_channels(&config, &mut errors);
    validate_panel(&config, &mut errors);
    validate_pins_unique(&config, &mut errors);

    if !errors.is_empty() {
        fail(&errors);
    }

    println!("cargo:warning=device.toml validated successfully");
    config
}

fn fail(errors: &[String]) -> ! {
    let lines = errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n");
    panic!("\n\ndevice.toml is not usable:\n{lines}\n\nSee the comments in device.toml for the expected layout.\n");
}

fn get<'a>(config: &'a toml::Value, path: &[&str]) -> Option<&'a toml::Value> {
    path.iter().try_fold(config, |value, key| value.get(key))
}

fn validate_required(config: &toml::Value, errors: &mut Vec<String>) {
    const REQUIRED_STRINGS: [&[&str]; 4] = [
        &["wifi", "ssid"],
        &["auth", "client_secret_key"],
        &["device", "serial"],
        &["link", "reconnect_status"],
    ];

    for path in REQUIRED_STRINGS {
        match get(config, path) {
            Some(toml::Value::String(s)) if !s.is_empty() => {}
            _ => errors.push(format!("'{}' must be a non-empty string", path.join("."))),
        }
    }

    match config.get("role").and_then(toml::Value::as_str) {
        Some("sensor" | "output") => {}
        _ => errors.push("'role' must be \"sensor\" or \"output\"".to_string()),
    }

    if let Some(status) = get(config, &["link", "reconnect_status"]).and_then(toml::Value::as_str) {
        if !["announce", "silent"].contains(&status) {
            errors.push("'link.reconnect_status' must be \"announce\" or \"silent\"".to_string());
        }
    }

    if let Some(timing) = config.get("timing").and_then(toml::Value::as_table) {
        for key in ["gpio_scan_ms", "data_send_ms", "blink_ms"] {
            if let Some(value) = timing.get(key).and_then(toml::Value::as_integer) {
                if value <= 0 {
                    errors.push(format!("'timing.{key}' must be positive"));
                }
            }
        }
    }
}

fn channel_count(config: &toml::Value) -> i64 {
    get(config, &["device", "channel_count"])
        .and_then(toml::Value::as_integer)
        .unwrap_or(3)
}

fn validate_channels(config: &toml::Value, errors: &mut Vec<String>) {
    let count = channel_count(config);
    if !(1..=MAX_CHANNELS).contains(&count) {
        errors.push(format!("'device.channel_count' must be 1-{MAX_CHANNELS}"));
    }

    match config.get("channel_pins").and_then(toml::Value::as_array) {
        Some(pins) => {
            if pins.len() as i64 != count {
                errors.push(format!(
                    "'channel_pins' lists {} pins but 'device.channel_count' is {count}",
                    pins.len()
                ));
            }
            if pins.iter().any(|pin| !matches!(pin.as_integer(), Some(0..=39))) {
                errors.push("'channel_pins' entries must be GPIO numbers 0-39".to_string());
            }
        }
        None => errors.push("'channel_pins' must be an array of GPIO numbers".to_string()),
    }
}

fn validate_panel(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(panel) = config.get("panel").and_then(toml::Value::as_table) else {
        return;
    };

    if let Some(controller) = panel.get("controller").and_then(toml::Value::as_str) {
        if !["st7789", "ili9341"].contains(&controller) {
            errors.push("'panel.controller' must be \"st7789\" or \"ili9341\"".to_string());
        }
    }
    if let Some(rotation) = panel.get("rotation").and_then(toml::Value::as_integer) {
        if !(0..=3).contains(&rotation) {
            errors.push("'panel.rotation' must be 0-3".to_string());
        }
    }
}

/// Every GPIO may be claimed once; the firmware relies on this
fn validate_pins_unique(config: &toml::Value, errors: &mut Vec<String>) {
    let mut pins = Vec::new();
    if let Some(channel_pins) = config.get("channel_pins").and_then(toml::Value::as_array) {
        pins.extend(channel_pins.iter().filter_map(toml::Value::as_integer));
    }
    if let Some(panel) = config.get("panel").and_then(toml::Value::as_table) {
        pins.extend(
            panel
                .iter()
                .filter(|(key, _)| key.ends_with("_pin"))
                .filter_map(|(_, value)| value.as_integer()),
        );
    }

    let mut seen = HashSet::new();
    for pin in pins {
        if !seen.insert(pin) {
            errors.push(format!("GPIO {pin} is assigned more than once"));
        }
    }
}

fn write_board_constants(config: &toml::Value) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let source = format!(
        "/// Channels on this board (from device.toml)\npub const CHANNEL_COUNT: usize = {};\n",
        channel_count(config)
    );
    fs::write(out_dir.join("board.rs"), source).expect("failed to write board.rs");
}
