//! Shopping List Core - Shared value types.
//!
//! This crate provides the types shared by the shopping list components:
//! - `web` - Server-rendered shopping list site
//! - `cli` - Command-line tools for migrations and user management
//!
//! The core crate contains only types - no I/O, no database access and no
//! HTTP. The optional `postgres` feature adds `sqlx` encode/decode impls.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, user names and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
