//! Authentication for comanda-server

pub mod session;
