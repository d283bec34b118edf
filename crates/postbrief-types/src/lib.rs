//! Shared types for the postbrief pipeline.
//!
//! This is the leaf crate of the workspace: configuration, the email data
//! model, the connector error type, and the [`SecretString`] wrapper used
//! to keep credentials out of logs. It has no knowledge of HTTP or of any
//! particular provider.

pub mod config;
pub mod email;
pub mod error;
pub mod secret;

pub use config::Config;
pub use email::{EmailMessage, NoteRef, TickReport};
pub use error::{ConfigError, ConnectorError};
pub use secret::SecretString;
