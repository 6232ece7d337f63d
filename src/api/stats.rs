use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let params = *bc.retarget_params();
    let blocks = bc.blocks();
    let height = blocks.len();

    let last_interval = if height >= 2 {
        Some((blocks[height - 1].timestamp - blocks[height - 2].timestamp).max(0.0))
    } else {
        None
    };

    // Same trailing-window average the retarget controller sees.
    let avg_interval = if height >= params.window && params.window >= 2 {
        let window = &blocks[height - params.window..];
        let span = window[window.len() - 1].timestamp - window[0].timestamp;
        Some(span.max(0.0) / (params.window - 1) as f64)
    } else {
        None
    };

    HttpResponse::Ok().json(StatsResponse {
        height,
        difficulty: bc.difficulty(),
        target_block_time_secs: params.target_secs,
        retarget_window: params.window,
        retarget_margin: params.margin,
        difficulty_floor: params.floor,
        last_interval_secs: last_interval,
        avg_interval_secs: avg_interval,
        pending_transactions: bc.pending().len(),
    })
}
