//! Chain facade for the gridwalk client.
//!
//! Everything the UI needs from the chain lives behind this crate: burner
//! account management, deterministic entity-id derivation, the JSON-RPC
//! transport, and a background connection worker that dispatches writes and
//! answers component refreshes over channels.

pub mod account;
pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod rpc;

pub use account::{BurnerAccount, BurnerManager};
pub use config::{ChainConfig, DEFAULT_RPC_URL, resolve_burners_file, resolve_rpc_url};
pub use connection::{ChainConnection, ChainEvent, ChainRequest, TxOp};
pub use entity::{EntityId, entity_id_from_address};
pub use error::ChainError;
pub use rpc::{JsonRpcTransport, Transport};
