mod api;
mod blockchain;
mod error;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use std::env;
use uuid::Uuid;

use api::AppState;
use blockchain::{INITIAL_DIFFICULTY, MINING_REWARD};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let difficulty: u32 = env::var("INITIAL_DIFFICULTY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(INITIAL_DIFFICULTY);
    let reward: f64 = env::var("MINING_REWARD")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(MINING_REWARD);

    let node_id = Uuid::new_v4().simple().to_string();
    println!("⛏️ Node {node_id} starting ledger API at http://{host}:{port} (difficulty {difficulty})");

    let state = web::Data::new(AppState::new(node_id, difficulty, reward));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
