//! Error types for the bloomd client
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

use crate::protocol::FILTER_NOT_FOUND;

/// Result type alias using BloomdError
pub type Result<T> = std::result::Result<T, BloomdError>;

/// Unified error type for bloomd client operations
#[derive(Debug, Error)]
pub enum BloomdError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Dial failure, write failure, read failure or timeout, premature EOF
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// A block never reached its END sentinel, or a line did not have the
    /// expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server answered with text the caller could not interpret.
    /// Always carries the response line verbatim.
    #[error("Remote error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    /// Precondition violated before any I/O happened
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl BloomdError {
    /// True if the server reported that the named filter does not exist
    pub fn is_filter_not_found(&self) -> bool {
        matches!(self, BloomdError::Remote(text) if text == FILTER_NOT_FOUND)
    }

    /// True if a socket read or write hit its configured timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            // Unix reports WouldBlock for SO_RCVTIMEO, Windows reports TimedOut
            BloomdError::Connection(e) => matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// True if the peer closed the stream before a full line arrived
    pub(crate) fn is_eof(&self) -> bool {
        matches!(self, BloomdError::Connection(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }

    /// The raw server text carried by a remote error
    pub fn remote_text(&self) -> Option<&str> {
        match self {
            BloomdError::Remote(text) => Some(text),
            _ => None,
        }
    }
}
