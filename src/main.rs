//! Process entrypoint. Wires configuration, logging, bootstrap, and the
//! HTTP listener together; contains no causal-consistency, retry, or
//! view-management logic of its own — all of that lives in
//! `causal_kvs::{engine, peer_client, bootstrap}`.

use actix_web::{web, App, HttpServer};

use causal_kvs::bootstrap;
use causal_kvs::config::Config;
use causal_kvs::engine::ReplicationEngine;
use causal_kvs::http;
use causal_kvs::peer_client::PeerClient;

const LISTEN_ADDRESS: &str = "0.0.0.0:8090";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("fatal configuration error: {err}");
            std::process::exit(1);
        }
    };

    let engine = web::Data::new(ReplicationEngine::new(config.self_addr.clone(), PeerClient::new()));
    bootstrap::run(&engine, &config.self_addr, &config.seeds).await;

    log::info!("listening on {LISTEN_ADDRESS} as replica {}", config.self_addr);
    HttpServer::new(move || App::new().app_data(engine.clone()).configure(http::configure))
        .bind(LISTEN_ADDRESS)?
        .run()
        .await
}
