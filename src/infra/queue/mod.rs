//! Queue storage primitives.

pub mod ring;

pub use ring::RingBuffer;
