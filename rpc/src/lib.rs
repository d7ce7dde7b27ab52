//! Typed JSON-RPC client for the Phantasma node API.
//!
//! Every remote call is described once in [`methods::CATALOGUE`] and executed
//! by one generic routine ([`PhantasmaClient::call`]); the typed methods on
//! [`PhantasmaClient`] are thin wrappers over that catalogue.
//!
//! ```no_run
//! # async fn run() -> Result<(), phantasma_rpc::ClientError> {
//! let client = phantasma_rpc::PhantasmaClient::new("http://localhost:7077")?;
//! let block = client.get_block_by_height("main", 1).await?;
//! println!("{} has {} transactions", block.hash, block.txs.len());
//! # Ok(())
//! # }
//! ```

pub mod address;
mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod methods;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use address::{is_valid_address, is_valid_private_key};
pub use client::PhantasmaClient;
pub use config::{ClientConfig, ConfigError};
pub use envelope::Paginated;
pub use error::{ClientError, TransportError};
pub use methods::{MethodDescriptor, Param, ParamType, ResultShape, ReturnType};
pub use transport::{HttpTransport, Transport};
pub use types::*;
