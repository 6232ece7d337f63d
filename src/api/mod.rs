mod chain;
mod health;
mod mining;
pub mod models;
mod stats;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::get_last_block)
            .service(chain::validate_chain)
            .service(chain::get_difficulty)
            .service(tx::post_transaction)
            .service(tx::get_pending)
            .service(mining::mine_target)
            .service(mining::submit_proof)
            .service(mining::mine_local)
            .service(stats::get_stats),
    );
}
