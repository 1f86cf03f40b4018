//! Core logic for the homework status bot.
//!
//! This crate is framework-agnostic. The homework API and the chat transport
//! live behind ports (traits); Telegram is implemented in an adapter crate.

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod poller;
pub mod validation;

pub use errors::{Error, ErrorKind, Result};
