pub mod actions;
pub mod alloy;
pub mod balances;
pub mod block;
pub mod chain;
pub mod config;
pub mod connection;
pub mod erc20;
pub mod error;
pub mod explorer;
pub mod log;
pub mod reqwest;
pub mod serde;
pub mod token_list;
pub mod traits;
pub mod units;

#[cfg(test)]
mod testutils;

pub use error::{Error, Result};
