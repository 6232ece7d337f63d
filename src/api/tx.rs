use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::error::ChainError;

/// Submit a new transaction into the pending ledger.
/// Returns the index of the block it will be included in.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, ChainError> {
    let sender = body.sender.as_deref().unwrap_or_default();
    let recipient = body.recipient.as_deref().unwrap_or_default();

    let block_index = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.new_transaction(sender, recipient, body.amount)
            .inspect_err(|e| warn!("POST /transactions/ - rejected: {e}"))?
    };

    info!("POST /transactions/ - {sender} -> {recipient}, queued for block {block_index}");
    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to block {block_index}"),
        block_index,
    }))
}

/// List the pending ledger.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let transactions = bc.pending().iter().cloned().collect::<Vec<_>>();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
