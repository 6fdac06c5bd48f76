mod balance;
mod chain;
mod health;
mod mining;
pub mod models;
mod nodes;
mod stats;
mod tx;

use actix_web::web::{self, ServiceConfig};
use actix_web::{HttpResponse, error};
use log::warn;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| {
        warn!("{} {} - bad JSON body: {}", req.method(), req.path(), err);
        let resp = HttpResponse::BadRequest().body(err.to_string());
        error::InternalError::from_response(err, resp).into()
    }))
    .service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(mining::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_mempool)
            .service(balance::get_balance)
            .service(nodes::connect_nodes)
            .service(nodes::list_nodes)
            .service(nodes::resolve_chain)
            .service(stats::get_stats),
    );
}
