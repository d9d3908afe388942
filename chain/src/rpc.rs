//! JSON-RPC transport.
//!
//! The connection worker talks to the node through the [`Transport`] trait
//! so tests can substitute an in-memory implementation. The wire contract,
//! client side:
//!
//! - `spawn`     params `[address]`
//! - `move`      params `[address, direction_code]`
//! - `component` params `[entity_id, component_name]`, `null` result when
//!   the entity has not spawned yet

use std::time::Duration;

use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde_json::Value;

use crate::error::ChainError;

pub const METHOD_SPAWN: &str = "spawn";
pub const METHOD_MOVE: &str = "move";
pub const METHOD_COMPONENT: &str = "component";

/// Component names served by the `component` method.
pub const COMPONENT_POSITION: &str = "Position";
pub const COMPONENT_MOVES: &str = "Moves";
pub const COMPONENT_DIRECTIONS: &str = "DirectionsAvailable";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One positional-params call against the node.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn call(&self, method: &'static str, params: Vec<Value>) -> Result<Value, ChainError>;
}

/// HTTP JSON-RPC transport bound to a node URL.
pub struct JsonRpcTransport {
    client: HttpClient,
}

impl JsonRpcTransport {
    pub fn new(url: &str) -> Result<Self, ChainError> {
        let client = HttpClientBuilder::default()
            .request_timeout(REQUEST_TIMEOUT)
            .build(url)
            .map_err(|err| ChainError::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn call(&self, method: &'static str, params: Vec<Value>) -> Result<Value, ChainError> {
        let mut array = ArrayParams::new();
        for param in params {
            array
                .insert(param)
                .map_err(|err| ChainError::Transport(err.to_string()))?;
        }

        self.client
            .request(method, array)
            .await
            .map_err(|err| ChainError::Transport(err.to_string()))
    }
}
