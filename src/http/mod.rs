//! The HTTP surface: route registration, JSON decoding via extractors,
//! dispatch to [`crate::engine::ReplicationEngine`], and response
//! encoding. Modeled on `src/checker/explorer.rs`'s
//! `App::new().route(path, web::method().to(handler))` shape, upgraded
//! from that file's pre-4.0 synchronous handlers to `actix-web` 4's
//! async handler convention.

mod kvs;
mod replica;
mod state_transfer;
mod view_handlers;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/kvs/{key}", web::put().to(kvs::put_kv))
        .route("/kvs/{key}", web::get().to(kvs::get_kv))
        .route("/kvs/{key}", web::delete().to(kvs::delete_kv))
        .route("/replica/kvs/{key}/{origin}", web::put().to(replica::put_replica_kv))
        .route("/replica/kvs/{key}/{origin}", web::delete().to(replica::delete_replica_kv))
        .route("/view", web::put().to(view_handlers::put_view))
        .route("/view", web::get().to(view_handlers::get_view))
        .route("/view", web::delete().to(view_handlers::delete_view))
        .route("/viewed", web::put().to(view_handlers::put_viewed))
        .route("/viewed", web::delete().to(view_handlers::delete_viewed))
        .route("/vckvs", web::get().to(state_transfer::get_vckvs));
}

#[cfg(test)]
mod test {
    use actix_web::{test, App};
    use serde_json::json;

    use crate::engine::ReplicationEngine;
    use crate::peer_client::PeerClient;

    fn test_engine() -> web::Data<ReplicationEngine> {
        let engine = ReplicationEngine::new("A".to_owned(), PeerClient::new());
        engine.seed_view(vec!["A".to_owned()]);
        web::Data::new(engine)
    }

    #[actix_web::test]
    async fn put_then_get_round_trip_over_http() {
        let engine = test_engine();
        let app = test::init_service(
            App::new().app_data(engine.clone()).configure(super::configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/kvs/x")
            .set_json(json!({ "value": "1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let req = test::TestRequest::get().uri("/kvs/x").set_json(json!({})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["value"], json!("1"));
    }

    #[actix_web::test]
    async fn put_without_value_returns_400() {
        let engine = test_engine();
        let app = test::init_service(
            App::new().app_data(engine.clone()).configure(super::configure),
        )
        .await;
        let req = test::TestRequest::put().uri("/kvs/x").set_json(json!({})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn get_of_missing_key_returns_404() {
        let engine = test_engine();
        let app = test::init_service(
            App::new().app_data(engine.clone()).configure(super::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/kvs/missing").set_json(json!({})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn get_view_reflects_seeded_membership() {
        let engine = test_engine();
        let app = test::init_service(
            App::new().app_data(engine.clone()).configure(super::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/view").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["view"], json!(["A"]));
    }

    #[actix_web::test]
    async fn delete_of_unknown_view_member_returns_404() {
        let engine = test_engine();
        let app = test::init_service(
            App::new().app_data(engine.clone()).configure(super::configure),
        )
        .await;
        let req = test::TestRequest::delete()
            .uri("/view")
            .set_json(json!({ "socket-address": "ghost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn vckvs_reflects_the_current_snapshot() {
        let engine = test_engine();
        let app = test::init_service(
            App::new().app_data(engine.clone()).configure(super::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/vckvs").to_request();
        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["vc"], json!({ "A": 0 }));
        assert_eq!(body["kvs"], json!({}));
    }
}
