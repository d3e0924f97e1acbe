//! `/kvs/{key}` handlers: the client-facing surface of the store.

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::dto::{CausalRequest, KvsGetResponse, KvsMutationResponse, PutRequest};
use crate::engine::ReplicationEngine;
use crate::error::ApiError;
use crate::store::PutOutcome;

pub async fn put_kv(
    path: web::Path<String>,
    body: web::Json<PutRequest>,
    engine: web::Data<ReplicationEngine>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let PutRequest { value, causal_metadata } = body.into_inner();
    let (outcome, causal_metadata) = engine.client_put(key, value, causal_metadata).await?;
    let (status, result) = match outcome {
        PutOutcome::Created => (StatusCode::CREATED, "created"),
        PutOutcome::Replaced => (StatusCode::OK, "replaced"),
    };
    Ok(HttpResponse::build(status).json(KvsMutationResponse { result, causal_metadata }))
}

pub async fn get_kv(
    path: web::Path<String>,
    body: web::Json<CausalRequest>,
    engine: web::Data<ReplicationEngine>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let (value, causal_metadata) = engine.client_get(&key, body.into_inner().causal_metadata)?;
    Ok(HttpResponse::Ok().json(KvsGetResponse { value, causal_metadata }))
}

pub async fn delete_kv(
    path: web::Path<String>,
    body: web::Json<CausalRequest>,
    engine: web::Data<ReplicationEngine>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let causal_metadata = engine.client_delete(key, body.into_inner().causal_metadata).await?;
    Ok(HttpResponse::Ok().json(KvsMutationResponse { result: "deleted", causal_metadata }))
}
