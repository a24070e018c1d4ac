//! Shared types for the comanda workspace
//!
//! Wire models and the unified error system used by both the server and the
//! client workflow crate. Database derives are feature-gated behind `db` so
//! the client does not pull in sqlx.

pub mod error;
pub mod models;
pub mod util;
