use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, ConnectRequest, NodesResponse, ResolveResponse};
use crate::error::LedgerError;
use crate::network::{HttpChainFetcher, ReplacementOutcome, resolve};

/// Register peers. Every address is checked before any is inserted, so a bad
/// entry leaves the registry untouched.
#[post("/nodes/")]
pub async fn connect_nodes(
    state: web::Data<AppState>,
    body: web::Json<ConnectRequest>,
) -> Result<HttpResponse, LedgerError> {
    let Some(addresses) = body.into_inner().nodes else {
        return Ok(HttpResponse::BadRequest().body("no nodes supplied"));
    };

    let total_nodes = {
        let mut nodes = state.nodes.lock().expect("mutex poisoned");
        let mut staged = nodes.clone();
        for address in &addresses {
            staged.add_node(address)?;
        }
        *nodes = staged;
        nodes.list_nodes()
    };
    info!("NODES - {} peer(s) known", total_nodes.len());

    Ok(HttpResponse::Created().json(NodesResponse {
        message: "All the nodes are now connected.",
        total_nodes,
    }))
}

#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let nodes = state.nodes.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        message: "Known peers.",
        total_nodes: nodes.list_nodes(),
    })
}

/// Reconcile with every known peer using the longest-valid-chain rule.
#[post("/nodes/resolve/")]
pub async fn resolve_chain(
    state: web::Data<AppState>,
    fetcher: web::Data<HttpChainFetcher>,
) -> impl Responder {
    let peers = state.nodes.lock().expect("mutex poisoned").list_nodes();
    let outcome = resolve(&state.ledger, &peers, fetcher.get_ref(), &state.pow).await;

    let ledger = state.ledger.lock().expect("mutex poisoned");
    let (replaced, message) = match outcome {
        ReplacementOutcome::Replaced => (
            true,
            "The local chain was replaced by the longest valid peer chain.",
        ),
        ReplacementOutcome::Unchanged => (false, "The local chain is already the longest one."),
    };
    HttpResponse::Ok().json(ResolveResponse {
        replaced,
        message,
        chain: ledger.chain(),
    })
}
