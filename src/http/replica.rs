//! `/replica/kvs/{key}/{origin}` handlers: peer-to-peer delivery of
//! replicated mutations, gated by the causal-delivery predicate.

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::dto::{CausalRequest, PutRequest, ResultResponse};
use crate::engine::ReplicationEngine;
use crate::error::ApiError;
use crate::store::PutOutcome;

pub async fn put_replica_kv(
    path: web::Path<(String, String)>,
    body: web::Json<PutRequest>,
    engine: web::Data<ReplicationEngine>,
) -> Result<HttpResponse, ApiError> {
    let (key, origin) = path.into_inner();
    let PutRequest { value, causal_metadata } = body.into_inner();
    let msg_vc = causal_metadata.unwrap_or_default();
    let outcome = engine.deliver_put(key, &origin, value, msg_vc)?;
    let (status, result) = match outcome {
        PutOutcome::Created => (StatusCode::CREATED, "created"),
        PutOutcome::Replaced => (StatusCode::OK, "replaced"),
    };
    Ok(HttpResponse::build(status).json(ResultResponse { result }))
}

pub async fn delete_replica_kv(
    path: web::Path<(String, String)>,
    body: web::Json<CausalRequest>,
    engine: web::Data<ReplicationEngine>,
) -> Result<HttpResponse, ApiError> {
    let (key, origin) = path.into_inner();
    let msg_vc = body.into_inner().causal_metadata.unwrap_or_default();
    engine.deliver_delete(key, &origin, msg_vc)?;
    Ok(HttpResponse::Ok().json(ResultResponse { result: "deleted" }))
}
