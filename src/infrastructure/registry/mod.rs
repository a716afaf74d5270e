//! Registry implementations.
//!
//! Currently only the in-memory implementation exists; the whole design
//! assumes a single process holding all room state in memory.

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
