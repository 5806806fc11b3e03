//! Filter Module
//!
//! A handle on one named filter on the server. Every method formats one
//! command, runs it over the shared connection, and maps the response
//! tokens onto typed values.

use crate::error::{BloomdError, Result};
use crate::network::SharedConnection;
use crate::protocol::{
    classify_status, expect_status, hash_key, validate_token, Block, Command, FilterInfo,
    Mapping, Status, Verb,
};

/// A named bloom filter on a bloomd server
///
/// Cloning is cheap; clones share the same connection.
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    conn: SharedConnection,

    /// Send SHA-256 hex digests instead of raw keys
    hash_keys: bool,

    // Creation parameters, when known
    capacity: Option<u64>,
    probability: Option<f64>,
    in_memory: bool,
}

impl Filter {
    /// A handle on `name`. No I/O happens until a command is issued.
    pub fn new(name: impl Into<String>, conn: SharedConnection) -> Self {
        Self {
            name: name.into(),
            conn,
            hash_keys: false,
            capacity: None,
            probability: None,
            in_memory: false,
        }
    }

    pub fn with_hash_keys(mut self, enabled: bool) -> Self {
        self.hash_keys = enabled;
        self
    }

    pub(crate) fn with_params(
        mut self,
        capacity: Option<u64>,
        probability: Option<f64>,
        in_memory: bool,
    ) -> Self {
        self.capacity = capacity;
        self.probability = probability;
        self.in_memory = in_memory;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash_keys(&self) -> bool {
        self.hash_keys
    }

    pub fn capacity(&self) -> Option<u64> {
        self.capacity
    }

    pub fn probability(&self) -> Option<f64> {
        self.probability
    }

    pub fn in_memory(&self) -> bool {
        self.in_memory
    }

    // =========================================================================
    // Key Operations
    // =========================================================================

    /// Add a key. Returns true if the key was not present before.
    pub fn set(&self, key: &str) -> Result<bool> {
        self.single_key(Verb::Set, key)
    }

    /// Test a key. Returns true if the key may be present.
    pub fn check(&self, key: &str) -> Result<bool> {
        self.single_key(Verb::Check, key)
    }

    /// Add several keys in one round trip
    ///
    /// Results are aligned with `keys`.
    pub fn bulk<K: AsRef<str>>(&self, keys: &[K]) -> Result<Vec<bool>> {
        self.group(Verb::Bulk, keys)
    }

    /// Test several keys in one round trip
    ///
    /// Results are aligned with `keys`.
    pub fn multi<K: AsRef<str>>(&self, keys: &[K]) -> Result<Vec<bool>> {
        self.group(Verb::Multi, keys)
    }

    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    /// Delete the filter permanently from the server
    pub fn drop(&self) -> Result<()> {
        self.admin(Verb::Drop)
    }

    /// Unload the filter from server memory, keeping it on disk
    pub fn close(&self) -> Result<()> {
        self.admin(Verb::Close)
    }

    /// Remove the filter from the server's list without deleting its data
    pub fn clear(&self) -> Result<()> {
        self.admin(Verb::Clear)
    }

    /// Force the filter to disk
    pub fn flush(&self) -> Result<()> {
        self.admin(Verb::Flush)
    }

    /// The raw info dictionary
    pub fn info(&self) -> Result<Mapping> {
        self.info_block()?.to_mapping()
    }

    /// The info dictionary parsed into typed fields
    pub fn stats(&self) -> Result<FilterInfo> {
        FilterInfo::from_block(&self.info_block()?)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// `<verb> <name>` with the name checked
    fn command(&self, verb: Verb) -> Result<Command> {
        validate_token("filter name", &self.name)?;
        Ok(Command::new(verb).arg(self.name.as_str()))
    }

    /// The token sent for `key`
    fn wire_key(&self, key: &str) -> Result<String> {
        if self.hash_keys {
            return Ok(hash_key(key));
        }
        validate_token("key", key)?;
        Ok(key.to_string())
    }

    fn info_block(&self) -> Result<Block> {
        let command = self.command(Verb::Info)?;
        self.conn.lock().send_and_read_block(&command)
    }

    fn exchange(&self, command: &Command) -> Result<String> {
        self.conn.lock().send_and_receive(command)
    }

    fn single_key(&self, verb: Verb, key: &str) -> Result<bool> {
        let command = self.command(verb)?.arg(self.wire_key(key)?);
        let line = self.exchange(&command)?;
        parse_yes_no(&line)
    }

    fn group<K: AsRef<str>>(&self, verb: Verb, keys: &[K]) -> Result<Vec<bool>> {
        if keys.is_empty() {
            return Err(BloomdError::InvalidArgument(format!(
                "{} needs at least one key",
                verb
            )));
        }

        let mut command = self.command(verb)?;
        for key in keys {
            command = command.arg(self.wire_key(key.as_ref())?);
        }

        let line = self.exchange(&command)?;
        parse_yes_no_list(&line, keys.len())
    }

    fn admin(&self, verb: Verb) -> Result<()> {
        let command = self.command(verb)?;
        let line = self.exchange(&command)?;
        expect_status(&line, &[Status::Done])?;
        Ok(())
    }
}

/// `Yes` / `No` as a boolean
fn parse_yes_no(line: &str) -> Result<bool> {
    Ok(expect_status(line, &[Status::Yes, Status::No])? == Status::Yes)
}

/// A space separated run of `Yes` / `No`, one per key
fn parse_yes_no_list(line: &str, expected: usize) -> Result<Vec<bool>> {
    let results = line
        .split(' ')
        .map(|token| match classify_status(token) {
            Status::Yes => Ok(true),
            Status::No => Ok(false),
            _ => Err(BloomdError::Remote(line.to_string())),
        })
        .collect::<Result<Vec<bool>>>()?;

    if results.len() != expected {
        return Err(BloomdError::Protocol(format!(
            "expected {} results, got {}: {:?}",
            expected,
            results.len(),
            line
        )));
    }

    Ok(results)
}
