//! Spacemarks: a typed query/mutate contract for organizing bookmarks into
//! spaces and groups, plus a reference SQLite-backed server.
//!
//! This library crate exposes all modules for use by the `spacemarks-rpc`
//! binary, the typed client and integration tests.

pub mod app;
pub mod client;
pub mod contract;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
