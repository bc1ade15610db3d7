//! Listener that hands link notifications to the control loop

use heapless::Deque;

use atlink_protocol::Command;

use crate::traits::Listener;

/// Commands buffered between two controller steps
pub const COMMAND_QUEUE_LEN: usize = 8;

/// [`Listener`] that records notifications instead of acting on them
///
/// The link calls back while it is borrowed by `service`, so anything that
/// needs the link again (emitting data, rebooting) is picked up from here
/// by the [`Controller`](super::Controller) afterwards.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Deque<Command, COMMAND_QUEUE_LEN>,
    connected: bool,
    /// Set on every connect, cleared by [`CommandQueue::take_connected`]
    connect_pending: bool,
    dropped: u32,
}

impl CommandQueue {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            commands: Deque::new(),
            connected: false,
            connect_pending: false,
            dropped: 0,
        }
    }

    /// Take the oldest queued command
    pub fn pop(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands are queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Check if the link reported ready and has not dropped since
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Return `true` once after each completed handshake
    pub fn take_connected(&mut self) -> bool {
        core::mem::take(&mut self.connect_pending)
    }

    /// Commands discarded because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Listener for CommandQueue {
    fn on_connect(&mut self) {
        self.connected = true;
        self.connect_pending = true;
    }

    fn on_disconnect(&mut self) {
        self.connected = false;
        self.connect_pending = false;
    }

    fn on_command(&mut self, command: Command) {
        if self.commands.push_back(command).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("command queue full, dropping command");
        }
    }
}
