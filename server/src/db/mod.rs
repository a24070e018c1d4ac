//! Database access layer
//!
//! The only module tree allowed to touch order rows; handlers go through
//! these functions and never issue order SQL themselves.

pub mod orders;
pub mod products;
pub mod users;
