//! `/view` (client-facing) and `/viewed` (peer-originated, non-broadcasting)
//! handlers.

use actix_web::{web, HttpResponse};

use crate::dto::{ResultResponse, ViewRequest, ViewResponse};
use crate::engine::{ReplicationEngine, ViewPutOutcome};
use crate::error::ApiError;

pub async fn put_view(
    body: web::Json<ViewRequest>,
    engine: web::Data<ReplicationEngine>,
) -> HttpResponse {
    match engine.view_put(body.into_inner().socket_address).await {
        ViewPutOutcome::Added => HttpResponse::Created().json(ResultResponse { result: "added" }),
        ViewPutOutcome::AlreadyPresent => {
            HttpResponse::Ok().json(ResultResponse { result: "already present" })
        }
    }
}

pub async fn get_view(engine: web::Data<ReplicationEngine>) -> HttpResponse {
    HttpResponse::Ok().json(ViewResponse { view: engine.view_list() })
}

pub async fn delete_view(
    body: web::Json<ViewRequest>,
    engine: web::Data<ReplicationEngine>,
) -> Result<HttpResponse, ApiError> {
    engine.view_delete(&body.into_inner().socket_address).await?;
    Ok(HttpResponse::Ok().json(ResultResponse { result: "deleted" }))
}

pub async fn put_viewed(
    body: web::Json<ViewRequest>,
    engine: web::Data<ReplicationEngine>,
) -> HttpResponse {
    match engine.viewed_put(body.into_inner().socket_address) {
        ViewPutOutcome::Added => HttpResponse::Created().json(ResultResponse { result: "added" }),
        ViewPutOutcome::AlreadyPresent => {
            HttpResponse::Ok().json(ResultResponse { result: "already present" })
        }
    }
}

pub async fn delete_viewed(
    body: web::Json<ViewRequest>,
    engine: web::Data<ReplicationEngine>,
) -> Result<HttpResponse, ApiError> {
    engine.viewed_delete(&body.into_inner().socket_address)?;
    Ok(HttpResponse::Ok().json(ResultResponse { result: "deleted" }))
}
