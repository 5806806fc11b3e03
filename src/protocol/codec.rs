//! Protocol codec
//!
//! Encoding of commands and decoding of response lines and blocks.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! ┌────────┬───┬────────┬───┬─────┬────┐
//! │  verb  │ ␠ │  arg1  │ ␠ │ ... │ \n │
//! └────────┴───┴────────┴───┴─────┴────┘
//! ```
//!
//! ### Response
//! ```text
//! single line:  <text>\n
//! block:        START\n <line>\n ... END\n
//! ```

use std::io::{self, BufRead, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};
use sha2::{Digest, Sha256};

use crate::error::{BloomdError, Result};
use super::{Block, Command, Status, BLOCK_END, BLOCK_START, TERMINATOR};

/// Longest response line accepted, terminator excluded (1 MB)
pub const MAX_LINE_LEN: usize = 1024 * 1024;

// =============================================================================
// Command Encoding
// =============================================================================

/// Render a command to the exact bytes sent on the wire
///
/// Format: verb and arguments joined by single spaces, then `\n`
pub fn render(command: &Command) -> Bytes {
    let verb = command.verb().as_str();
    let args_len: usize = command.args().iter().map(|arg| arg.len() + 1).sum();

    let mut buf = BytesMut::with_capacity(verb.len() + args_len + TERMINATOR.len());
    buf.put_slice(verb.as_bytes());
    for arg in command.args() {
        buf.put_u8(b' ');
        buf.put_slice(arg.as_bytes());
    }
    buf.put_slice(TERMINATOR.as_bytes());

    buf.freeze()
}

/// Check that a token can travel as a single space-delimited argument
pub fn validate_token(kind: &str, token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(BloomdError::InvalidArgument(format!("{} must not be empty", kind)));
    }

    if let Some(c) = token.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(BloomdError::InvalidArgument(format!(
            "{} {:?} contains forbidden character {:?}",
            kind, token, c
        )));
    }

    Ok(())
}

/// Transform a key into a wire-safe token
///
/// SHA-256 of the key bytes, lowercase hex. Always 64 characters from
/// `[0-9a-f]`, whatever the input.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

// =============================================================================
// Response Classification
// =============================================================================

/// Classify a response line against the known status tokens
pub fn classify_status(line: &str) -> Status {
    Status::TOKENS
        .iter()
        .find(|(text, _)| *text == line)
        .map(|(_, status)| *status)
        .unwrap_or(Status::Unrecognized)
}

/// Classify a response line, failing unless it is one of `allowed`
///
/// The error carries the raw line so callers can tell known remote
/// conditions apart from unexpected server text.
pub fn expect_status(line: &str, allowed: &[Status]) -> Result<Status> {
    match classify_status(line) {
        Status::Unrecognized => Err(BloomdError::Remote(line.to_string())),
        status if allowed.contains(&status) => Ok(status),
        _ => Err(BloomdError::Remote(line.to_string())),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&render(command))?;
    writer.flush()?;
    Ok(())
}

/// Read one line with its terminator stripped
///
/// Blocks until a full line arrives. End of stream, including a partial
/// line without terminator, is reported as `UnexpectedEof`. A line that is
/// not UTF-8 or runs past [`MAX_LINE_LEN`] is a protocol error.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    decode_line(read_raw_line(reader)?)
}

/// Read a complete START/END block
///
/// The first line must be the START sentinel; any other line is the
/// server answering with a single line instead and is returned as a
/// remote error. Sentinels are not part of the result.
///
/// A data line that is not UTF-8 fails the block, but only after the
/// rest of it has been consumed up to END.
pub fn read_block<R: BufRead>(reader: &mut R) -> Result<Block> {
    let first = decode_line(read_block_line(reader, 0)?)?;
    if first != BLOCK_START {
        return Err(BloomdError::Remote(first));
    }

    let mut lines = Vec::new();
    let mut bad_line = None;
    loop {
        let raw = read_block_line(reader, lines.len())?;
        if raw == BLOCK_END.as_bytes() {
            break;
        }

        match decode_line(raw) {
            Ok(line) => lines.push(line),
            Err(e) => {
                // Keep the first failure, drain the block to stay in step
                if bad_line.is_none() {
                    bad_line = Some(e);
                }
            }
        }
    }

    match bad_line {
        Some(e) => Err(e),
        None => Ok(Block::new(lines)),
    }
}

/// Read one line as bytes, terminator stripped
fn read_raw_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let limit = (MAX_LINE_LEN + TERMINATOR.len()) as u64;
    let n = reader.by_ref().take(limit).read_until(b'\n', &mut line)?;

    if n == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed by server").into());
    }
    if line.last() != Some(&b'\n') {
        if n as u64 == limit {
            return Err(BloomdError::Protocol(format!(
                "response line longer than {} bytes",
                MAX_LINE_LEN
            )));
        }
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("connection closed mid-line after {} bytes", n),
        )
        .into());
    }

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }

    Ok(line)
}

fn decode_line(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| {
        BloomdError::Protocol(format!(
            "response line is not valid UTF-8: {:?}",
            String::from_utf8_lossy(e.as_bytes())
        ))
    })
}

/// Read a line inside a block; end of stream becomes a protocol error
fn read_block_line<R: BufRead>(reader: &mut R, lines_read: usize) -> Result<Vec<u8>> {
    read_raw_line(reader).map_err(|e| {
        if e.is_eof() {
            tracing::warn!("Block cut short after {} lines: {}", lines_read, e);
            BloomdError::Protocol(format!(
                "stream ended after {} block lines without {} sentinel",
                lines_read, BLOCK_END
            ))
        } else {
            e
        }
    })
}
