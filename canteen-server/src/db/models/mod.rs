//! Database models
//!
//! Plain data records mapped 1:1 onto SQLite rows, plus the create/update
//! payload types consumed by the repositories and handlers.

pub mod menu_item;
pub mod order;
pub mod user;

pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{
    Order, OrderDetail, OrderItemLine, OrderLineRequest, OrderStatus, PlaceOrderRequest,
};
pub use user::{Role, User};
