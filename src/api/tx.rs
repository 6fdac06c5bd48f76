use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{AppState, MempoolResponse, NewTxResponse};
use crate::error::LedgerError;
use crate::transaction::{Transaction, TransactionRequest};

/// Submit a new transaction into the pending pool.
#[post("/tx/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<TransactionRequest>,
) -> Result<HttpResponse, LedgerError> {
    let tx = Transaction::try_from(body.into_inner()).inspect_err(|e| {
        warn!("POST /tx/ - rejected: {e}");
    })?;

    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let index = ledger.add_transaction(tx.clone())?;
        debug!("POST /tx/ - pending pool size now {}", ledger.pending().len());
        index
    };

    info!(
        "POST /tx/ - {} -> {} ({}) queued for block {}",
        tx.sender, tx.receiver, tx.amount, index
    );
    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("This transaction will be added to block {index}"),
        index,
    }))
}

/// List the pending pool.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(MempoolResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
