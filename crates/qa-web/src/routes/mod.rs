//! Route handlers.

pub mod health;
pub mod questions;
pub mod responses;
pub mod users;
