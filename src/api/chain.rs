use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, ValidateResponse};
use crate::blockchain::is_valid_chain;

/// Get the full chain. This is also what peers fetch during consensus.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Validate the whole local chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let valid = is_valid_chain(ledger.chain(), &state.pow);
    HttpResponse::Ok().json(ValidateResponse {
        valid,
        length: ledger.len(),
        message: if valid {
            "The chain is valid."
        } else {
            "The chain is not valid."
        },
    })
}
