//! Storage layer for bleau
//!
//! Handles the TOML profile file and lookup of the token secret, which is
//! only ever taken from the environment or a prompt.

use crate::error::StorageError;

pub mod config;
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
