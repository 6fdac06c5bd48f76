mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::Config;
use network::HttpChainFetcher;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let state = web::Data::new(AppState::new(&config));

    info!(
        "⛓️ Starting ledger node {} at http://{}:{} (difficulty {})",
        state.node_id, config.host, config.port, config.difficulty
    );

    let peer_timeout = config.peer_timeout;
    HttpServer::new(move || {
        // awc clients are per worker
        App::new()
            .app_data(state.clone())
            .app_data(web::Data::new(HttpChainFetcher::new(peer_timeout)))
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
