//! Wire types shared between the HTTP surface, the peer client, and
//! bootstrap's state transfer. Kept separate from `http` since
//! `peer_client`/`bootstrap` serialize and deserialize these without
//! going through an actix-web handler.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::clock::VectorClock;

/// Body of `PUT /kvs/{k}` and `PUT /replica/kvs/{k}/{origin}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct PutRequest {
    pub value: Option<JsonValue>,
    #[serde(rename = "causal-metadata", default)]
    pub causal_metadata: Option<VectorClock>,
}

/// Body of `GET /kvs/{k}` and `DELETE /kvs/{k}` / `DELETE /replica/kvs/{k}/{origin}`.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CausalRequest {
    #[serde(rename = "causal-metadata", default)]
    pub causal_metadata: Option<VectorClock>,
}

/// Response of a successful mutating `/kvs` call.
#[derive(Debug, Serialize)]
pub struct KvsMutationResponse {
    pub result: &'static str,
    #[serde(rename = "causal-metadata")]
    pub causal_metadata: VectorClock,
}

/// Response of a successful `GET /kvs/{k}`.
#[derive(Debug, Serialize)]
pub struct KvsGetResponse {
    pub value: JsonValue,
    #[serde(rename = "causal-metadata")]
    pub causal_metadata: VectorClock,
}

/// Body of `PUT /view`, `DELETE /view`, and `/viewed`.
#[derive(Debug, Deserialize, Serialize)]
pub struct ViewRequest {
    #[serde(rename = "socket-address")]
    pub socket_address: String,
}

/// Response of `GET /view`.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: Vec<String>,
}

/// Response of `GET /vckvs`, also used as the body peer clients parse
/// during bootstrap state transfer.
#[derive(Debug, Deserialize, Serialize)]
pub struct StateSnapshot {
    pub vc: VectorClock,
    pub kvs: HashMap<String, JsonValue>,
}

/// Generic `{"result": "..."}` envelope for simple acknowledgements.
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: &'static str,
}
