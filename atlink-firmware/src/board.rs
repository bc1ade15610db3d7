//! Board resources named by device.toml

use esp_idf_hal::gpio::AnyIOPin;

include!(concat!(env!("OUT_DIR"), "/board.rs"));

/// Claim a GPIO by number
///
/// build.rs rejects a device.toml that assigns a GPIO twice, and no pin
/// named there is taken from `Peripherals::pins`, so each number is
/// claimed at most once.
pub fn gpio(num: u8) -> AnyIOPin {
    // SAFETY: see above; the pin is owned by exactly one driver.
    unsafe { AnyIOPin::new(i32::from(num)) }
}
