//! Client Module
//!
//! Server-level commands: create, list, inspect and flush filters.

use crate::config::Config;
use crate::error::{BloomdError, Result};
use crate::filter::Filter;
use crate::network::{Connection, SharedConnection};
use crate::protocol::{expect_status, validate_token, Command, FilterInfo, Mapping, Status, Verb};

/// Parameters for creating a filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub name: String,

    /// Initial capacity
    pub capacity: Option<u64>,

    /// Target false positive probability, requires a capacity
    pub probability: Option<f64>,

    /// Keep the filter in memory only
    pub in_memory: bool,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: None,
            probability: None,
            in_memory: false,
        }
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Check caller-side preconditions
    pub fn validate(&self) -> Result<()> {
        validate_token("filter name", &self.name)?;

        if self.capacity == Some(0) {
            return Err(BloomdError::InvalidArgument("capacity must be positive".to_string()));
        }

        if let Some(prob) = self.probability {
            if self.capacity.is_none() {
                return Err(BloomdError::InvalidArgument(
                    "probability requires a capacity".to_string(),
                ));
            }
            if !(prob > 0.0 && prob < 1.0) {
                return Err(BloomdError::InvalidArgument(format!(
                    "probability must be in (0, 1), got {}",
                    prob
                )));
            }
        }

        Ok(())
    }

    /// `create <name> [capacity=N] [prob=P] [in_memory=1]`
    pub fn to_command(&self) -> Result<Command> {
        self.validate()?;

        let mut command = Command::new(Verb::Create).arg(self.name.as_str());
        if let Some(capacity) = self.capacity {
            command = command.arg(format!("capacity={}", capacity));
        }
        if let Some(prob) = self.probability {
            command = command.arg(format!("prob={}", prob));
        }
        if self.in_memory {
            command = command.arg("in_memory=1");
        }

        Ok(command)
    }
}

/// Client for one bloomd server
///
/// ```no_run
/// use bloomd::{Client, Config, FilterSpec};
///
/// # fn main() -> bloomd::Result<()> {
/// let client = Client::new(Config::builder().server_addr("10.0.0.30:8673").build());
/// let filter = client.create_filter(&FilterSpec::new("coolfilter").capacity(100_000))?;
/// filter.set("alice")?;
///
/// let filters = client.list_filters()?;
/// println!("{:?}", filters.get("coolfilter"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    conn: SharedConnection,
    hash_keys: bool,
}

impl Client {
    /// A client that dials on first use
    pub fn new(config: Config) -> Self {
        let hash_keys = config.hash_keys;
        Self {
            conn: Connection::new(config).into_shared(),
            hash_keys,
        }
    }

    /// A client with its connection already open
    pub fn connect(config: Config) -> Result<Self> {
        let hash_keys = config.hash_keys;
        Ok(Self {
            conn: Connection::open(config)?.into_shared(),
            hash_keys,
        })
    }

    pub fn with_connection(conn: SharedConnection, hash_keys: bool) -> Self {
        Self { conn, hash_keys }
    }

    pub fn connection(&self) -> SharedConnection {
        SharedConnection::clone(&self.conn)
    }

    pub fn hash_keys(&self) -> bool {
        self.hash_keys
    }

    /// Create a filter. An already existing filter counts as success.
    pub fn create_filter(&self, spec: &FilterSpec) -> Result<Filter> {
        let command = spec.to_command()?;
        let line = self.conn.lock().send_and_receive(&command)?;

        match expect_status(&line, &[Status::Done, Status::Exists])? {
            Status::Exists => tracing::debug!("Filter {} already exists", spec.name),
            _ => tracing::debug!("Created filter {}", spec.name),
        }

        Ok(self
            .filter(&spec.name)
            .with_params(spec.capacity, spec.probability, spec.in_memory))
    }

    /// Look a filter up and return a handle carrying its parameters
    pub fn get_filter(&self, name: &str) -> Result<Filter> {
        validate_token("filter name", name)?;

        let command = Command::new(Verb::Info).arg(name);
        let block = self.conn.lock().send_and_read_block(&command)?;
        let info = FilterInfo::from_block(&block)?;

        Ok(self
            .filter(name)
            .with_params(Some(info.capacity), Some(info.probability), info.in_memory))
    }

    /// A handle on `name` without asking the server
    pub fn filter(&self, name: &str) -> Filter {
        Filter::new(name, self.connection()).with_hash_keys(self.hash_keys)
    }

    /// Filter name to the rest of its `list` line
    pub fn list_filters(&self) -> Result<Mapping> {
        let block = self
            .conn
            .lock()
            .send_and_read_block(&Command::new(Verb::List))?;
        block.to_mapping()
    }

    /// Flush every filter to disk
    pub fn flush(&self) -> Result<()> {
        let line = self.conn.lock().send_and_receive(&Command::new(Verb::Flush))?;
        expect_status(&line, &[Status::Done])?;
        Ok(())
    }

    /// Close the underlying connection
    pub fn close(&self) {
        self.conn.lock().close();
    }
}
