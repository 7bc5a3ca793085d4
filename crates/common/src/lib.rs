//! Common types and utilities for the webhook validator

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, WebhookConfig};
pub use error::{Error, Result, ValidationError};
pub use models::{KeyDictionary, KeyFileEntry, DEFAULT_KEY_LABEL};
