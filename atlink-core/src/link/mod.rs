//! Socket.IO device link
//!
//! Owns the connection lifecycle: transport open, Engine.IO handshake,
//! auth acknowledgment, keep-alive, liveness timeout, reconnect and
//! command dispatch. The state machine is explicit, finite, and
//! deterministic; [`Link`] is the only thing that mutates it.

pub mod client;
pub mod events;
pub mod heartbeat;
pub mod session;
pub mod state;

pub use client::{Link, LinkError, MAX_FRAMES_PER_SERVICE};
pub use events::LinkEvent;
pub use heartbeat::{LivenessMonitor, LivenessStatus};
pub use session::{Session, MAX_SID_LEN, MAX_TOKEN_LEN};
pub use state::ConnectionState;
