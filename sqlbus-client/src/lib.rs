//! # sqlbus-client
//!
//! Client library for sqlbus.
//!
//! This crate provides:
//! - A TCP client speaking the length-framed JSON protocol
//! - Response demultiplexing (command responses vs. pub/sub events)
//! - A row cursor that transparently follows multi-batch result sets
//!
//! The client is single-caller by construction: every operation takes
//! `&mut self` and runs on the caller's task. At most one request is
//! outstanding at any time.

pub mod client;
pub mod connection;
pub mod error;

pub use client::Client;
pub use connection::{Connection, ConnectionConfig};
pub use error::ClientError;

pub use sqlbus_protocol::{Action, Response};
