//! Development node for the Phantasma JSON-RPC API.
//!
//! Serves the full method catalogue from an in-memory [`Ledger`] so the
//! client can be exercised end to end without a real node.

pub mod handlers;
pub mod ledger;
pub mod server;

pub use ledger::{Ledger, LedgerError, NftEntry};
pub use server::{DevNode, NodeState};
