//! Shopping List web library.
//!
//! This crate provides the web application as a library so the router can be
//! driven from tests and the store reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod telemetry;
