//! `embedded-hal` pin adapters
//!
//! The channel banks in atlink-core drive infallible pins. These wrap any
//! `embedded-hal` 1.0 digital pin; a failed write leaves the recorded level
//! untouched and a failed read reports the idle (pulled-up) level.

use atlink_hal::gpio;
use embedded_hal::digital;

/// Actuator output built on an `embedded-hal` output pin
pub struct OutputAdapter<P> {
    pin: P,
    high: bool,
}

impl<P: digital::OutputPin> OutputAdapter<P> {
    /// Wrap a pin, driving it low
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self { pin, high: false }
    }

    /// Release the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: digital::OutputPin> gpio::OutputPin for OutputAdapter<P> {
    fn set_high(&mut self) {
        if self.pin.set_high().is_ok() {
            self.high = true;
        }
    }

    fn set_low(&mut self) {
        if self.pin.set_low().is_ok() {
            self.high = false;
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Sensor input built on an `embedded-hal` input pin
pub struct InputAdapter<P> {
    pin: P,
}

impl<P: digital::InputPin> InputAdapter<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: digital::InputPin> gpio::InputPin for InputAdapter<P> {
    fn is_high(&mut self) -> bool {
        self.pin.is_high().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlink_hal::gpio::{InputPin as _, OutputPin as _};
    use digital::ErrorKind;

    struct MockOutput {
        level: bool,
        fail: bool,
    }

    impl digital::ErrorType for MockOutput {
        type Error = ErrorKind;
    }

    impl digital::OutputPin for MockOutput {
        fn set_low(&mut self) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.level = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.level = true;
            Ok(())
        }
    }

    struct MockInput {
        level: Result<bool, ErrorKind>,
    }

    impl digital::ErrorType for MockInput {
        type Error = ErrorKind;
    }

    impl digital::InputPin for MockInput {
        fn is_high(&mut self) -> Result<bool, ErrorKind> {
            self.level
        }

        fn is_low(&mut self) -> Result<bool, ErrorKind> {
            self.level.map(|high| !high)
        }
    }

    #[test]
    fn test_output_starts_low() {
        let out = OutputAdapter::new(MockOutput { level: true, fail: false });
        assert!(!out.is_set_high());
        assert!(!out.into_inner().level);
    }

    #[test]
    fn test_output_tracks_level() {
        let mut out = OutputAdapter::new(MockOutput { level: false, fail: false });
        out.set_state(true);
        assert!(out.is_set_high());
        out.set_low();
        assert!(!out.is_set_high());
    }

    #[test]
    fn test_failed_write_keeps_level() {
        let mut out = OutputAdapter::new(MockOutput { level: false, fail: false });
        out.pin.fail = true;
        out.set_high();
        assert!(!out.is_set_high());
    }

    #[test]
    fn test_input_reads_level() {
        let mut input = InputAdapter::new(MockInput { level: Ok(false) });
        assert!(input.is_low());
        input.pin.level = Ok(true);
        assert!(input.is_high());
    }

    #[test]
    fn test_failed_read_is_idle() {
        let mut input = InputAdapter::new(MockInput {
            level: Err(ErrorKind::Other),
        });
        assert!(input.is_high());
    }
}
