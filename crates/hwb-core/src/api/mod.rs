//! Homework review API: the port the poll loop talks to and its HTTP client.

pub mod client;
pub mod port;
