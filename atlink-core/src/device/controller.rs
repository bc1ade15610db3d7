//! Cooperative control loop step
//!
//! One [`Controller::step`] call does, in order:
//!
//! 1. Service the link (bounded, non-blocking)
//! 2. Apply commands queued by the link
//! 3. Tick the channel bank (input scan or blink step)
//! 4. Emit `dev-data` if anything changed, after a (re)connect, or when
//!    the periodic report is due
//!
//! The caller owns the loop, the panel and the restart.

use atlink_hal::Transport;
use atlink_protocol::event::STATUS_REBOOTING;

use super::interval::Interval;
use super::queue::CommandQueue;
use crate::config::TimingConfig;
use crate::link::Link;
use crate::traits::{Channels, CommandOutcome};

/// What the caller should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Something visible changed or the refresh period elapsed
    pub refresh_ui: bool,
    /// A `dev-data` event went out
    pub data_sent: bool,
    /// A restart was commanded (`"Rebooting"` has been sent if possible)
    pub reboot: bool,
}

/// Drives a channel bank and the link from one loop
pub struct Controller<T: Transport, C: Channels> {
    link: Link<T, CommandQueue>,
    channels: C,
    data_interval: Interval,
    ui_interval: Interval,
    data_due: bool,
}

impl<T: Transport, C: Channels> Controller<T, C> {
    /// Create a controller around a link and a bank
    pub fn new(link: Link<T, CommandQueue>, channels: C, timing: &TimingConfig) -> Self {
        Self {
            link,
            channels,
            data_interval: Interval::new(timing.data_send_ms),
            ui_interval: Interval::new(timing.ui_refresh_ms),
            data_due: false,
        }
    }

    /// Run one loop iteration
    pub fn step(&mut self, now_ms: u32) -> StepReport {
        let mut report = StepReport::default();

        let was_ready = self.link.is_ready();
        self.link.service(now_ms);
        if self.link.is_ready() != was_ready {
            report.refresh_ui = true;
        }

        if self.link.listener_mut().take_connected() {
            self.data_due = true;
        }

        while let Some(command) = self.link.listener_mut().pop() {
            match self.channels.apply(&command, now_ms) {
                CommandOutcome::Changed => {
                    self.data_due = true;
                    report.refresh_ui = true;
                }
                CommandOutcome::Sync => self.data_due = true,
                CommandOutcome::Accepted | CommandOutcome::Ignored => {}
                CommandOutcome::Reboot => {
                    info!("restart requested");
                    if let Err(_e) = self.link.emit_status(STATUS_REBOOTING) {
                        warn!("could not announce restart: {:?}", _e);
                    }
                    report.reboot = true;
                    return report;
                }
            }
        }

        if self.channels.tick(now_ms) {
            self.data_due = true;
            report.refresh_ui = true;
        }

        if self.link.is_ready() {
            if self.data_interval.poll(now_ms) {
                self.data_due = true;
            }
            if self.data_due {
                self.data_due = false;
                self.data_interval.reset(now_ms);
                match self.link.emit_data(self.channels.states()) {
                    Ok(()) => report.data_sent = true,
                    Err(_e) => warn!("dev-data not sent: {:?}", _e),
                }
            }
        }

        if self.ui_interval.poll(now_ms) {
            report.refresh_ui = true;
        }

        report
    }

    /// The link
    pub fn link(&self) -> &Link<T, CommandQueue> {
        &self.link
    }

    /// Mutable access to the link (for `begin`/`end`)
    pub fn link_mut(&mut self) -> &mut Link<T, CommandQueue> {
        &mut self.link
    }

    /// The channel bank
    pub fn channels(&self) -> &C {
        &self.channels
    }

    /// Mutable access to the channel bank
    pub fn channels_mut(&mut self) -> &mut C {
        &mut self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LinkConfig, ReconnectStatus};
    use crate::device::outputs::OutputBank;
    use alloc::collections::VecDeque;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use atlink_hal::{OutputPin, TransportEvent};

    #[derive(Default)]
    struct MockTransport {
        sent: Vec<String>,
        inbox: VecDeque<TransportEvent>,
    }

    impl MockTransport {
        fn push(&mut self, frame: &str) {
            self.inbox.push_back(TransportEvent::Text(frame.to_string()));
        }
    }

    impl Transport for MockTransport {
        type Error = ();

        fn open(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn close(&mut self) {}

        fn send_text(&mut self, frame: &str) -> Result<(), ()> {
            self.sent.push(frame.to_string());
            Ok(())
        }

        fn poll(&mut self) -> Option<TransportEvent> {
            self.inbox.pop_front()
        }
    }

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    type TestController = Controller<MockTransport, OutputBank<MockPin, 3>>;

    fn controller() -> TestController {
        let mut link = Link::new(
            MockTransport::default(),
            CommandQueue::new(),
            LinkConfig::new(ReconnectStatus::Silent),
        );
        link.set_token("tok").unwrap();
        let bank = OutputBank::new(
            [
                MockPin { high: false },
                MockPin { high: false },
                MockPin { high: false },
            ],
            500,
        );
        Controller::new(link, bank, &TimingConfig::default())
    }

    fn transport(c: &mut TestController) -> &mut MockTransport {
        c.link_mut().transport_mut()
    }

    /// Connected controller at t=10 with the outbound log cleared
    fn ready() -> TestController {
        let mut c = controller();
        c.link_mut().begin(0).unwrap();
        transport(&mut c).inbox.push_back(TransportEvent::Connected);
        transport(&mut c).push(r#"0{"sid":"abc"}"#);
        transport(&mut c).push("40");
        c.step(10);
        transport(&mut c).sent.clear();
        c
    }

    #[test]
    fn test_data_sent_after_connect() {
        let mut c = controller();
        c.link_mut().begin(0).unwrap();
        transport(&mut c).inbox.push_back(TransportEvent::Connected);
        transport(&mut c).push(r#"0{"sid":"abc"}"#);
        transport(&mut c).push("40");

        let report = c.step(10);

        assert!(report.data_sent);
        assert!(report.refresh_ui);
        assert_eq!(
            c.link().transport().sent,
            [
                r#"40{"token":"tok"}"#,
                r#"42["dev-status","Bootup & Ready"]"#,
                r#"42["dev-data",{"content":[0,0,0]}]"#
            ]
        );
    }

    #[test]
    fn test_command_applied_and_reported() {
        let mut c = ready();
        transport(&mut c).push(
            r#"42["app-cmd",{"operation":{"customCmd":"output","fieldIndex":1,"fieldValue":1}}]"#,
        );

        let report = c.step(20);

        assert!(report.data_sent);
        assert!(report.refresh_ui);
        assert_eq!(c.channels().states(), [false, true, false]);
        assert_eq!(
            c.link().transport().sent,
            [r#"42["dev-data",{"content":[0,1,0]}]"#]
        );
    }

    #[test]
    fn test_sync_resends_states() {
        let mut c = ready();
        transport(&mut c).push(r#"42["app-cmd",{"operation":{"customCmd":"sync"}}]"#);
        assert!(c.step(20).data_sent);
        assert_eq!(c.link().transport().sent.len(), 1);
    }

    #[test]
    fn test_periodic_report() {
        let mut c = ready();
        assert!(!c.step(60_009).data_sent);
        assert!(c.step(60_010).data_sent);
        assert!(!c.step(60_011).data_sent);
    }

    #[test]
    fn test_reboot_announced() {
        let mut c = ready();
        transport(&mut c).push(r#"42["app-cmd",{"operation":{"customCmd":"reboot"}}]"#);

        let report = c.step(20);

        assert!(report.reboot);
        assert_eq!(
            c.link().transport().sent,
            [r#"42["dev-status","Rebooting"]"#]
        );
    }

    #[test]
    fn test_blink_changes_are_reported() {
        let mut c = ready();
        transport(&mut c)
            .push(r#"42["app-cmd",{"operation":{"customCmd":"blinkLed","fieldIndex":0,"fieldValue":1}}]"#);

        // First blink toggle happens in the same step as the command
        assert!(c.step(20).data_sent);
        assert_eq!(c.channels().states(), [true, false, false]);

        assert!(!c.step(519).data_sent);
        assert!(c.step(520).data_sent);
        assert_eq!(c.channels().states(), [false; 3]);
    }

    #[test]
    fn test_nothing_sent_while_disconnected() {
        let mut c = controller();
        c.channels_mut().set(0, true);
        c.channels_mut().blink(1, 1);
        let report = c.step(0);
        assert!(!report.data_sent);
        assert!(c.link().transport().sent.is_empty());
    }

    #[test]
    fn test_ui_refresh_period() {
        let mut c = ready();
        assert!(!c.step(500).refresh_ui);
        assert!(c.step(1_010).refresh_ui);
    }
}
