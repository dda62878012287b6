//! [`EventSink`](crate::core::EventSink) implementations.

pub mod channel;
pub mod logging;
pub mod memory;

pub use channel::ChannelEventSink;
pub use logging::TracingEventSink;
pub use memory::InMemoryEventSink;
