use actix_web::{HttpResponse, Responder, get};

/// Liveness probe; does not touch the ledger lock.
#[get("/health/")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("ledger node up ⛓️")
}
