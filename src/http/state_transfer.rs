//! `GET /vckvs`: the bootstrap state-transfer endpoint. Serialization is
//! self-consistent with respect to concurrent mutation because
//! [`ReplicationEngine::snapshot`] takes the replica mutex for the
//! duration of the clone.

use actix_web::{web, HttpResponse};

use crate::engine::ReplicationEngine;

pub async fn get_vckvs(engine: web::Data<ReplicationEngine>) -> HttpResponse {
    HttpResponse::Ok().json(engine.snapshot())
}
