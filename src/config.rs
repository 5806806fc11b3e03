//! Configuration for the bloomd client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

/// Default bloomd TCP port
pub const DEFAULT_PORT: u16 = 8673;

/// Main configuration for a bloomd connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub server_addr: String,

    // -------------------------------------------------------------------------
    // Timeouts (0 disables the timeout)
    // -------------------------------------------------------------------------
    /// Dial timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Key Handling
    // -------------------------------------------------------------------------
    /// Hash keys client-side before they are put on the wire
    pub hash_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: format!("127.0.0.1:{}", DEFAULT_PORT),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            hash_keys: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address (host:port)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the dial timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set connect, read and write timeouts at once (in milliseconds)
    pub fn timeout_ms(self, ms: u64) -> Self {
        self.connect_timeout_ms(ms)
            .read_timeout_ms(ms)
            .write_timeout_ms(ms)
    }

    /// Hash keys with SHA-256 before sending them
    pub fn hash_keys(mut self, enabled: bool) -> Self {
        self.config.hash_keys = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
