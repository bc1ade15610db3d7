//! Channel bank for the configured role

use anyhow::{anyhow, Result};
use atlink_core::config::TimingConfig;
use atlink_core::device::{Channels, CommandOutcome, InputBank, OutputBank};
use atlink_drivers::{InputAdapter, OutputAdapter};
use atlink_protocol::Command;
use esp_idf_hal::gpio::{AnyIOPin, Input, Output, PinDriver, Pull};
use log::info;

use crate::board::{gpio, CHANNEL_COUNT};
use crate::config::Role;

type SensorPin = InputAdapter<PinDriver<'static, AnyIOPin, Input>>;
type ActuatorPin = OutputAdapter<PinDriver<'static, AnyIOPin, Output>>;

/// Either device variant, chosen at boot
pub enum Bank {
    Sensors(InputBank<SensorPin, CHANNEL_COUNT>),
    Actuators(OutputBank<ActuatorPin, CHANNEL_COUNT>),
}

impl Bank {
    /// Claim the channel GPIOs and build the bank
    pub fn build(role: Role, pins: &[u8], timing: &TimingConfig) -> Result<Self> {
        let bank = match role {
            Role::Sensor => {
                let pins = pins
                    .iter()
                    .map(|&num| -> Result<SensorPin> {
                        let mut pin = PinDriver::input(gpio(num))?;
                        pin.set_pull(Pull::Up)?;
                        Ok(InputAdapter::new(pin))
                    })
                    .collect::<Result<Vec<SensorPin>>>()?;
                Bank::Sensors(InputBank::new(into_array(pins)?, timing.gpio_scan_ms))
            }
            Role::Output => {
                let pins = pins
                    .iter()
                    .map(|&num| -> Result<ActuatorPin> {
                        Ok(OutputAdapter::new(PinDriver::output(gpio(num))?))
                    })
                    .collect::<Result<Vec<ActuatorPin>>>()?;
                Bank::Actuators(OutputBank::new(into_array(pins)?, timing.blink_ms))
            }
        };
        info!(target: "gpio", "{role:?} bank on GPIO {pins:?}, states {:?}", bank.states());
        Ok(bank)
    }
}

fn into_array<P>(pins: Vec<P>) -> Result<[P; CHANNEL_COUNT]> {
    let len = pins.len();
    pins.try_into()
        .map_err(|_| anyhow!("expected {CHANNEL_COUNT} channel pins, got {len}"))
}

impl Channels for Bank {
    fn len(&self) -> usize {
        CHANNEL_COUNT
    }

    fn states(&self) -> &[bool] {
        match self {
            Bank::Sensors(bank) => bank.states(),
            Bank::Actuators(bank) => bank.states(),
        }
    }

    fn tick(&mut self, now_ms: u32) -> bool {
        match self {
            Bank::Sensors(bank) => bank.tick(now_ms),
            Bank::Actuators(bank) => bank.tick(now_ms),
        }
    }

    fn apply(&mut self, command: &Command, now_ms: u32) -> CommandOutcome {
        match self {
            Bank::Sensors(bank) => bank.apply(command, now_ms),
            Bank::Actuators(bank) => bank.apply(command, now_ms),
        }
    }
}
