use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use madrassa_server::{app_state::AppState, config::Config, db::Database, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let database = Database::connect(&config)
        .await
        .unwrap_or_else(|err| panic!("failed to connect to MongoDB: {}", err));

    let state = AppState::new(database)
        .await
        .unwrap_or_else(|err| panic!("failed to initialise application state: {}", err));
    let state = web::Data::new(state);

    log::info!(
        "Starting HTTP server on {}:{}",
        config.web_server_host,
        config.web_server_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(handlers::configure)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}
