use actix_web::{web, App, HttpServer};
use duel_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger};
use duel_backend::{routes, telemetry, AppState, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);

    let app_state = match AppState::build(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("🚀 Starting Duel Backend on http://{}:{}", host, port);
    tracing::info!(
        host = %host,
        port,
        round_timeout = ?app_state.config.round_timeout,
        fighters = app_state.arena.catalog().fighters.len(),
        "server starting"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
