use actix_web::{web, App, HttpServer};
use judgement::config::{GameConfig, ServerConfig};
use judgement::middleware::cors::cors_middleware;
use judgement::middleware::structured_logger::StructuredLogger;
use judgement::routes;
use judgement::state::app_state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: docker-compose env_file or docker run --env-file
    // - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
    let server = match ServerConfig::from_env() {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    let game = match GameConfig::from_env() {
        Ok(game) => game,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Judgement Backend on http://{}:{} ({} rounds, {} cards each)",
        server.host, server.port, game.max_rounds, game.cards_per_player
    );

    let host = server.host.clone();
    let port = server.port;
    let origins = server.allowed_origins.clone();
    let data = web::Data::new(AppState::new(server, game));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
