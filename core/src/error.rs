//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Generation is all-or-nothing: any variant returned from the generator
//! aborts the whole document.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A member's field tag could not be parsed.
    #[from(ignore)]
    #[display("Malformed tag on member '{member}': {reason}")]
    MalformedTag {
        /// Name of the offending member (or the raw tag when unknown).
        member: String,
        /// What went wrong.
        reason: String,
    },

    /// A textual type expression could not be turned into a descriptor.
    #[from(ignore)]
    #[display("Malformed type '{input}': {reason}")]
    MalformedType {
        /// The raw type expression.
        input: String,
        /// What went wrong.
        reason: String,
    },

    /// A struct embeds itself, directly or through other inline members.
    #[from(ignore)]
    #[display("Cyclic embedding detected: {}", chain.join(" -> "))]
    CyclicEmbed {
        /// The embedding chain, starting and ending with the same struct.
        chain: Vec<String>,
    },

    /// A type name that does not match any known struct.
    #[from(ignore)]
    #[display("Unresolved reference '{name}' ({context})")]
    UnresolvedReference {
        /// The missing type name.
        name: String,
        /// Where the reference was found (route or member).
        context: String,
    },

    /// Failure while serializing or deserializing documents.
    #[from(ignore)]
    #[display("Serialization Error: {_0}")]
    Serialization(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
