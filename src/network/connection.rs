//! Protocol Connection
//!
//! Owns the TCP socket to one bloomd server and runs the line-based
//! request/response exchange over it.

use std::io::{self, BufReader, BufWriter};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{read_block, read_line, write_command, Block, Command};

/// A connection shared between a client and the filters it hands out
///
/// Hold the lock for a whole send + receive exchange, never for one half.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Buffered halves of an open socket
#[derive(Debug)]
struct Stream {
    /// TCP stream reader (buffered for line reads)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered so a command goes out in one write)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Stream {
    /// Sets up buffered I/O and configures timeouts
    fn new(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| config.server_addr.clone());

        // Commands are single small writes; don't let Nagle hold them back
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }
}

/// A connection to a single bloomd server
///
/// At most one command may be outstanding: a caller must consume the full
/// response (line or block) before sending the next command, otherwise the
/// response stream is desynchronized for good. The connection is never
/// re-established behind the caller's back.
///
/// After any read error (timeout, I/O failure, a malformed line) the
/// position in the response stream is unknown: bytes of a partly read line
/// may already be gone. Call `close()` and then `connect()` before issuing
/// the next command. A block with a non UTF-8 data line is the exception;
/// it is drained through END before the error is returned.
#[derive(Debug)]
pub struct Connection {
    config: Config,
    stream: Option<Stream>,

    /// Set by `close()`; stops lazy dialing until `connect()` is called
    closed: bool,
}

impl Connection {
    /// Create a connection that dials on first send
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stream: None,
            closed: false,
        }
    }

    /// Create a connection and dial immediately
    pub fn open(config: Config) -> Result<Self> {
        let mut conn = Self::new(config);
        conn.connect()?;
        Ok(conn)
    }

    /// Wrap this connection for sharing between facades
    pub fn into_shared(self) -> SharedConnection {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The configured server address
    pub fn server(&self) -> &str {
        &self.config.server_addr
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Dial the server, replacing any open socket
    ///
    /// Each resolved address is tried once. There is no retry.
    pub fn connect(&mut self) -> Result<()> {
        let stream = dial(&self.config)?;
        let stream = Stream::new(stream, &self.config)?;

        tracing::debug!("Connected to {}", stream.peer_addr);

        self.stream = Some(stream);
        self.closed = false;
        Ok(())
    }

    /// Shut the socket down
    ///
    /// Later operations fail until `connect()` is called again.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            tracing::debug!("Closing connection to {}", stream.peer_addr);
            let _ = stream.writer.get_ref().shutdown(Shutdown::Both);
        }
        self.closed = true;
    }

    /// Write a command without waiting for the response
    pub fn send(&mut self, command: &Command) -> Result<()> {
        let stream = self.dialed_stream()?;
        tracing::trace!("{} <- {}", stream.peer_addr, command);
        write_command(&mut stream.writer, command)
    }

    /// Read one response line, terminator stripped
    pub fn read_line(&mut self) -> Result<String> {
        let stream = self.open_stream()?;
        let line = read_line(&mut stream.reader)?;
        tracing::trace!("{} -> {}", stream.peer_addr, line);
        Ok(line)
    }

    /// Read one START/END block, sentinels excluded
    pub fn read_block(&mut self) -> Result<Block> {
        let stream = self.open_stream()?;
        let block = read_block(&mut stream.reader)?;
        tracing::trace!("{} -> block of {} lines", stream.peer_addr, block.len());
        Ok(block)
    }

    /// Send a command and read its single-line response
    pub fn send_and_receive(&mut self, command: &Command) -> Result<String> {
        self.send(command)?;
        self.read_line()
    }

    /// Send a command and read its block response
    pub fn send_and_read_block(&mut self, command: &Command) -> Result<Block> {
        self.send(command)?;
        self.read_block()
    }

    /// A handle another thread can use to abort a blocked read or write
    pub fn interrupt_handle(&mut self) -> Result<InterruptHandle> {
        let stream = self.dialed_stream()?;
        Ok(InterruptHandle {
            stream: stream.writer.get_ref().try_clone()?,
            peer_addr: stream.peer_addr.clone(),
        })
    }

    /// The open stream, dialing first if this connection was created lazily
    fn dialed_stream(&mut self) -> Result<&mut Stream> {
        if self.stream.is_none() && !self.closed {
            self.connect()?;
        }
        self.open_stream()
    }

    fn open_stream(&mut self) -> Result<&mut Stream> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("not connected to {}", self.config.server_addr),
            )
            .into()),
        }
    }
}

/// Aborts blocked I/O on a connection from another thread
///
/// The blocked call returns a connection error.
#[derive(Debug)]
pub struct InterruptHandle {
    stream: TcpStream,
    peer_addr: String,
}

impl InterruptHandle {
    pub fn interrupt(&self) -> Result<()> {
        tracing::debug!("Interrupting connection to {}", self.peer_addr);
        self.stream.shutdown(Shutdown::Both)?;
        Ok(())
    }
}

/// Open a socket to the configured server
fn dial(config: &Config) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = config.server_addr.to_socket_addrs()?.collect();

    let mut last_err = None;
    for addr in addrs {
        let attempt = match config.connect_timeout() {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };

        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Dial {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    let err = last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{} resolved to no addresses", config.server_addr),
        )
    });
    Err(err.into())
}
