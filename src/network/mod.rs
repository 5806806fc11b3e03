//! Network Module
//!
//! TCP connection to a bloomd server.
//!
//! ## Model
//! - Blocking I/O, one socket per `Connection`
//! - One command in flight per connection, no pipelining
//! - Share across threads with `SharedConnection` (mutex per exchange)
//!   or open one connection per thread

mod connection;

pub use connection::{Connection, InterruptHandle, SharedConnection};
