//! Business logic services.
//!
//! # Services
//!
//! - `customers` - Customer lookup and account provisioning via the identity provider
//! - `orders` - Customer listing with first-visit seeding, admin list/create/update

pub mod customers;
pub mod orders;

pub use customers::CustomerDirectory;
pub use orders::{AdminOrderService, CustomerOrderService};
