//! comanda-client: client-side workflow controller
//!
//! Orchestrates the checkout and order-tracking sequences against the
//! comanda-server REST API:
//!
//! - checkout: check pending, submit order, confirm (no order is created when
//!   one is already in flight)
//! - orders view: history and active order fetched independently, tolerating
//!   partial failures
//! - cancel / receive: idempotent from the controller's perspective; a stale
//!   order id reports staleness instead of crashing the caller
//!
//! The HTTP transport sits behind the [`OrderApi`] trait so the workflow can
//! be exercised against an in-memory backend in tests.

pub mod api;
pub mod error;
pub mod http;
pub mod workflow;

pub use api::{OrderApi, Session};
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use workflow::{CheckoutOutcome, MutateOutcome, OrdersView, WorkflowController};
