//! Live delivery: connection ownership, fan-out, heartbeats and background suggestions.

pub mod connection;
pub mod dispatcher;
pub mod heartbeat;
pub mod registry;
pub mod scheduler;
pub mod suggestions;

pub use connection::{ConnectionId, LiveConnection};
pub use dispatcher::{ActionOutcome, AlertDispatcher, DispatchReport, UserAction};
pub use heartbeat::{HeartbeatHandle, HeartbeatMonitor};
pub use registry::ConnectionRegistry;
pub use scheduler::{SchedulerHandle, SuggestionScheduler, TickReport};
