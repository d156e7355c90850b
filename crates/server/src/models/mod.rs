//! Request, response, and session models.

pub mod order_view;
pub mod session;

pub use order_view::{AdminOrderView, CreateOrderRequest, CustomerOrders, OrderView, ValidCreateOrder};
pub use session::{SessionTokens, keys as session_keys};
