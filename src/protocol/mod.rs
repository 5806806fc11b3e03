//! Protocol Module
//!
//! Defines the line-based text protocol spoken by bloomd.
//!
//! ## Request Format
//! ```text
//! <verb> <name> [<arg> ...]\n
//! ```
//! Tokens are separated by a single space and never contain whitespace.
//!
//! ### Commands
//! - `create <name> [capacity=<int>] [prob=<float>] [in_memory=1]`
//! - `list`
//! - `info <name>`
//! - `flush [<name>]`
//! - `set <name> <key>`, `check <name> <key>`
//! - `bulk <name> <key>...`, `multi <name> <key>...`
//! - `drop <name>`, `close <name>`, `clear <name>`
//!
//! ## Response Format
//!
//! ### Single line
//! One of the status tokens `Done`, `Exists`, `Yes`, `No`,
//! `Filter does not exist`, a space separated run of `Yes`/`No` for group
//! commands, or free text reporting a server side error.
//!
//! ### Block
//! ```text
//! START\n
//! <line>\n      (zero or more)
//! END\n
//! ```

mod command;
mod response;
mod codec;
mod block;

pub use command::{Command, Verb};
pub use response::{Status, BLOCK_END, BLOCK_START, FILTER_NOT_FOUND, TERMINATOR};
pub use codec::{
    classify_status, expect_status, hash_key, render, validate_token, MAX_LINE_LEN,
    read_block, read_line, write_command,
};
pub use block::{parse_field, split_pair, to_mapping, Block, FilterInfo, Mapping};
