use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    // short, separate locks
    let (height, last_proof, mempool_size) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (
            ledger.len(),
            ledger.previous_block().ok().map(|b| b.proof),
            ledger.pending().len(),
        )
    };
    let peers = {
        let nodes = state.nodes.lock().expect("mutex poisoned");
        nodes.len()
    };

    HttpResponse::Ok().json(StatsResponse {
        node_id: state.node_id.clone(),
        height,
        difficulty: state.pow.difficulty(),
        last_proof,
        mempool_size,
        peers,
    })
}
