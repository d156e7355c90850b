//! Core types for the jewelry order service.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod admin;
pub mod email;
pub mod id;
pub mod order;
pub mod status;

pub use admin::AdminDirectory;
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{
    JEWELRY_TYPES, MATERIALS, NewOrder, Order, OrderPatch, OrderSummary, PatchError, blank_to_none,
};
pub use status::OrderStatus;
