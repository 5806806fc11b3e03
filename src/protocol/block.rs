//! Block parsing
//!
//! Turns the lines of a START/END block into the shapes callers need:
//! an ordered key/value [`Mapping`] or a typed [`FilterInfo`].

use std::collections::HashMap;

use crate::error::{BloomdError, Result};

// =============================================================================
// Block
// =============================================================================

/// Lines received between the START and END sentinels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Split every line into a (key, value) pair, in order
    pub fn pairs(&self) -> Result<Vec<(&str, &str)>> {
        self.lines.iter().map(|line| split_pair(line)).collect()
    }

    /// Build an ordered mapping from the block lines
    pub fn to_mapping(&self) -> Result<Mapping> {
        to_mapping(&self.lines)
    }
}

impl IntoIterator for Block {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

/// Split a line on its first space into key and value
///
/// The value keeps any further spaces. A line without a space is malformed.
pub fn split_pair(line: &str) -> Result<(&str, &str)> {
    line.split_once(' ').ok_or_else(|| {
        BloomdError::Protocol(format!("block line has no key/value separator: {:?}", line))
    })
}

/// Build a mapping from block lines
///
/// Fails on the first malformed line. A repeated key overwrites the
/// earlier value.
pub fn to_mapping<S: AsRef<str>>(lines: &[S]) -> Result<Mapping> {
    let mut mapping = Mapping::with_capacity(lines.len());
    for line in lines {
        let (key, value) = split_pair(line.as_ref())?;
        mapping.insert(key, value);
    }
    Ok(mapping)
}

// =============================================================================
// Mapping
// =============================================================================

/// Insertion-ordered string map
///
/// Overwriting an existing key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a pair, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl IntoIterator for Mapping {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

// =============================================================================
// Filter Info
// =============================================================================

/// Extract the value of a `<name> <value>` or `<name>:<value>` line
///
/// Fails if the line is for a different field or carries no value.
pub fn parse_field<'a>(line: &'a str, name: &str) -> Result<&'a str> {
    let value = line
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(' ').or_else(|| rest.strip_prefix(':')))
        .map(str::trim)
        .ok_or_else(|| {
            BloomdError::Protocol(format!("expected {} field, got {:?}", name, line))
        })?;

    if value.is_empty() {
        return Err(BloomdError::Protocol(format!("{} field has no value", name)));
    }

    Ok(value)
}

/// Typed view of an `info` block
#[derive(Debug, Clone, PartialEq)]
pub struct FilterInfo {
    pub capacity: u64,
    pub probability: f64,
    pub in_memory: bool,

    // Counters reported by bloomd, kept when present
    pub size: Option<u64>,
    pub storage: Option<u64>,
    pub sets: Option<u64>,
    pub checks: Option<u64>,
}

impl FilterInfo {
    pub const CAPACITY: &'static str = "capacity";
    pub const PROBABILITY: &'static str = "probability";
    pub const IN_MEMORY: &'static str = "in_memory";
    pub const SIZE: &'static str = "size";
    pub const STORAGE: &'static str = "storage";
    pub const SETS: &'static str = "sets";
    pub const CHECKS: &'static str = "checks";

    /// Parse the lines of an `info` block
    ///
    /// Fields are located by name. `capacity`, `probability` and
    /// `in_memory` are required.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let capacity = parse_number(Self::CAPACITY, required_field(lines, Self::CAPACITY)?)?;
        let probability = parse_probability(required_field(lines, Self::PROBABILITY)?)?;
        let in_memory = parse_flag(Self::IN_MEMORY, required_field(lines, Self::IN_MEMORY)?)?;

        Ok(Self {
            capacity,
            probability,
            in_memory,
            size: optional_number(lines, Self::SIZE)?,
            storage: optional_number(lines, Self::STORAGE)?,
            sets: optional_number(lines, Self::SETS)?,
            checks: optional_number(lines, Self::CHECKS)?,
        })
    }

    pub fn from_block(block: &Block) -> Result<Self> {
        Self::from_lines(block.lines())
    }
}

/// Locate the line whose leading token is `name` and return its value
fn find_field<'a, S: AsRef<str>>(lines: &'a [S], name: &str) -> Result<Option<&'a str>> {
    let line = lines.iter().map(|line| line.as_ref()).find(|line| {
        line.split(|c: char| c == ' ' || c == ':')
            .next()
            .map_or(false, |token| token == name)
    });

    line.map(|line| parse_field(line, name)).transpose()
}

fn required_field<'a, S: AsRef<str>>(lines: &'a [S], name: &str) -> Result<&'a str> {
    find_field(lines, name)?
        .ok_or_else(|| BloomdError::Protocol(format!("info block has no {} field", name)))
}

fn optional_number<S: AsRef<str>>(lines: &[S], name: &str) -> Result<Option<u64>> {
    find_field(lines, name)?
        .map(|value| parse_number(name, value))
        .transpose()
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|e| {
        BloomdError::Protocol(format!("{} field {:?} is not an integer: {}", name, value, e))
    })
}

fn parse_probability(value: &str) -> Result<f64> {
    value.parse().map_err(|e| {
        BloomdError::Protocol(format!("probability field {:?} is not a number: {}", value, e))
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(BloomdError::Protocol(format!("{} field must be 0 or 1, got {:?}", name, value))),
    }
}
