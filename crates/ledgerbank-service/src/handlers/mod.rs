//! API handlers.

pub mod accounts;
pub mod balance;
pub mod health;
pub mod transactions;
