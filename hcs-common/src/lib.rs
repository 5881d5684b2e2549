//! # HCS Common Library
//!
//! Shared code for the Home Console Shell crates:
//! - Error type
//! - Configuration file resolution and TOML loading
//! - Event types (HomeEvent enum) and the EventBus
//! - Clock and time helpers

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
pub use events::{EventBus, HomeEvent, Section};
