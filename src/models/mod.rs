//! Data models for contacts and events.

mod contact;
mod event;

pub use contact::{Contact, ContactField};
pub use event::Event;
