//! Core domain types shared across the crate.

pub mod error;
pub mod event;

pub use error::{Result, ScopeError};
pub use event::{Broker, EventRecord};
