use actix_web::{HttpResponse, Responder, error, get, post, web};
use log::{debug, info, warn};

use super::models::{
    AppState, ForgedResponse, MineLocalRequest, MineLocalResponse, MineTargetResponse,
    SubmitProofRequest,
};
use crate::blockchain::pow::{self, CancelFlag};

/// Hand external miners the head snapshot they need: its index, canonical
/// serialization and the difficulty a winning proof must meet.
#[get("/mine-target/")]
pub async fn mine_target(state: web::Data<AppState>) -> impl Responder {
    let (index, block, difficulty) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        bc.mine_target()
    };
    HttpResponse::Ok().json(MineTargetResponse {
        index,
        block,
        difficulty,
    })
}

/// Accept a mined proof. The chain re-validates against the live head and
/// difficulty, so slow miners get a stale/invalid rejection instead of
/// forking the chain.
#[post("/mine/")]
pub async fn submit_proof(
    state: web::Data<AppState>,
    body: web::Json<SubmitProofRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let miner_id = body
        .miner_id
        .clone()
        .unwrap_or_else(|| state.node_id.clone());

    let response = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        let block = bc
            .submit_proof(body.proof, body.base_index, &miner_id)
            .inspect_err(|e| warn!("POST /mine/ - rejected proof {}: {e}", body.proof))?
            .clone();
        ForgedResponse::new(&block, bc.difficulty())
    };

    // The head moved; whatever search is running is now wasted work.
    state.cancel_active_search();

    info!(
        "POST /mine/ - accepted proof {} from {miner_id}, chain at block {}",
        body.proof, response.index
    );
    Ok(HttpResponse::Ok().json(response))
}

/// Mine on the node itself: snapshot the head, search on the blocking pool
/// (cancellable the moment a competing append lands), then submit the proof
/// through the same re-validation path external miners use.
#[post("/mine/local/")]
pub async fn mine_local(
    state: web::Data<AppState>,
    body: Option<web::Json<MineLocalRequest>>,
) -> Result<HttpResponse, actix_web::Error> {
    let miner_id = body
        .and_then(|b| b.miner_id.clone())
        .unwrap_or_else(|| state.node_id.clone());

    let (base_index, block_json, difficulty) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        bc.mine_target()
    };

    let cancel = CancelFlag::new();
    state.register_search(cancel.clone());
    debug!("mine/local - searching over block {base_index} at difficulty {difficulty}");

    let found = web::block(move || pow::find_proof(&block_json, difficulty, &cancel))
        .await
        .map_err(error::ErrorInternalServerError)?;

    let Some(search) = found else {
        warn!("mine/local - search over block {base_index} cancelled: chain advanced");
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "success": false,
            "error": "mining cancelled: chain advanced past the base block",
        })));
    };

    let (block_index, hash, new_difficulty) = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        let (index, hash) = {
            let block = bc
                .submit_proof(search.proof, Some(base_index), &miner_id)
                .inspect_err(|e| warn!("mine/local - rejected own proof {}: {e}", search.proof))?;
            (block.index, block.hash.clone())
        };
        (index, hash, bc.difficulty())
    };
    state.cancel_active_search();

    info!(
        "mine/local - forged block {block_index} after {} attempts in {:.3}s",
        search.attempts,
        search.elapsed.as_secs_f64()
    );
    Ok(HttpResponse::Ok().json(MineLocalResponse {
        success: true,
        message: "New block forged!".to_string(),
        index: block_index,
        proof: search.proof,
        hash,
        attempts: search.attempts,
        elapsed_secs: search.elapsed.as_secs_f64(),
        difficulty: new_difficulty,
    }))
}
