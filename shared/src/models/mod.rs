//! Wire models shared between server and client

pub mod account;
pub mod order;
pub mod product;

pub use account::{Profile, SignInResponse};
pub use order::{DeleteOrderResponse, Order, OrderDetails, PendingOrdersResponse};
pub use product::{Product, ProductInfo};
