//! # bloomd
//!
//! A blocking client for the bloomd bloom-filter server:
//! - Line-based text protocol over one persistent TCP connection
//! - Single-line and START/END block responses
//! - One command in flight per connection
//! - Optional client-side key hashing
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────┐   ┌─────────────────────────┐
//! │         Client          │   │         Filter          │
//! │ create/list/info/flush  │   │ set/check/bulk/multi... │
//! └────────────┬────────────┘   └────────────┬────────────┘
//!              │       SharedConnection      │
//!              └──────────────┬──────────────┘
//!                             ▼
//!                ┌─────────────────────────┐
//!                │       Connection        │
//!                │ send / read_line /      │
//!                │ read_block              │
//!                └────────────┬────────────┘
//!                             │
//!              ┌──────────────┴──────────────┐
//!              ▼                             ▼
//!      ┌───────────────┐            ┌───────────────┐
//!      │     Codec     │            │ Block Parser  │
//!      │ render/status │            │ mapping/info  │
//!      └───────────────┘            └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod filter;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BloomdError, Result};
pub use config::Config;
pub use network::{Connection, SharedConnection};
pub use filter::Filter;
pub use client::{Client, FilterSpec};
pub use protocol::{FilterInfo, Mapping};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the bloomd client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
