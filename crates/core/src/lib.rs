//! Jewelry Orders Core - Shared domain types.
//!
//! This crate provides the types used across all components:
//! - `server` - HTTP service for customers and admins
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no database access,
//! no HTTP clients. The order lifecycle (status vocabulary, buckets, mutable
//! fields) and the admin allow-list live here so every component applies the
//! same rules.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, order statuses, orders and the admin directory

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
