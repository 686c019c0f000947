//! Error types for the Agenda MCP Server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Business-rule violations detected before any SQL runs.
///
/// The `Display` text of each variant is the body of the sentence the MCP
/// edge returns (prefixed with `Error: `); the exact wording is part of the
/// observable contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Contact name is empty or whitespace-only after trimming
    #[error("Contact name cannot be empty.")]
    EmptyContactName,

    /// Event heading is empty or whitespace-only after trimming
    #[error("Event heading cannot be empty.")]
    EmptyEventHeading,

    /// Event end time is strictly before its start time
    #[error("End time cannot be before start time.")]
    EndBeforeStart,

    /// Partial update was called with no fields to change
    #[error("No fields provided to update.")]
    NoUpdateFields,

    /// Contact search referenced a field outside the allow-list
    #[error("Invalid search field specified. Allowed fields are: id, name, email, phone.")]
    InvalidSearchField,
}

/// Driver-level storage faults.
///
/// Single-statement operations propagate these raw to the MCP dispatch layer,
/// which converts them into an internal error response. The two transactional
/// units (event create/delete) catch them at the transaction boundary instead
/// and collapse them into a generic database-failure outcome.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite driver error
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
