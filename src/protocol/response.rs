//! Response definitions
//!
//! Status tokens and sentinels returned by the server.

/// Line terminator for requests and responses
pub const TERMINATOR: &str = "\n";

/// First line of a block response
pub const BLOCK_START: &str = "START";

/// Last line of a block response
pub const BLOCK_END: &str = "END";

/// Text sent when a command names a filter the server does not know
pub const FILTER_NOT_FOUND: &str = "Filter does not exist";

/// Known single-line status tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Command applied
    Done,

    /// Filter already exists (create)
    Exists,

    /// Key present / newly added
    Yes,

    /// Key absent / already present
    No,

    /// Named filter does not exist
    FilterNotFound,

    /// Anything else, surfaced to the caller as an error
    Unrecognized,
}

impl Status {
    /// Recognized tokens and their wire text
    pub const TOKENS: [(&'static str, Status); 5] = [
        ("Done", Status::Done),
        ("Exists", Status::Exists),
        ("Yes", Status::Yes),
        ("No", Status::No),
        (FILTER_NOT_FOUND, Status::FilterNotFound),
    ];

    /// Wire text for a recognized status
    pub fn as_str(self) -> Option<&'static str> {
        Self::TOKENS
            .iter()
            .find(|(_, status)| *status == self)
            .map(|(text, _)| *text)
    }
}
