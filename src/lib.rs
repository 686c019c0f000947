//! Agenda MCP Server - a Model Context Protocol server over a small
//! SQLite-backed personal contacts-and-calendar store.
//!
//! This library exposes tool-style CRUD and search operations for two
//! related entities, contacts and events, including a many-to-many link
//! between them and interval-overlap search over events.
//!
//! # Architecture
//!
//! - **models**: Data structures for contacts and events
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **db**: The shared SQLite connection handle and embedded schema
//! - **services**: The contact and event services owning all SQL
//! - **server**: MCP protocol server collapsing outcomes to wire text

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod services;

pub use config::Config;
pub use db::{Database, SortOrder};
pub use error::{ConfigError, StoreError, ValidationError};
pub use models::{Contact, ContactField, Event};
pub use server::AgendaMcpServer;
pub use services::{
    ContactService, CreateOutcome, DeleteOutcome, EventCreateOutcome, EventDeleteOutcome,
    EventService, SearchOutcome, UpdateOutcome,
};
