pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::*;
pub use config::*;
pub use error::*;
pub use response::{AddressResponse, AddressWrapper, Meta, Response, TransactionsResponse};
