//! Database query implementations.

pub mod questions;
pub mod responses;
pub mod users;
