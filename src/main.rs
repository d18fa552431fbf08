use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use hitomlb_podcast::cache::FeedSnapshot;
use hitomlb_podcast::{episodes, recommended_keywords, AppState, Args};
use tokio::sync::Mutex;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.log_to_stdout().start())
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Logger initialization failed: {}", e),
            )
        })?;

    let args = Args::parse();
    let address = format!("{}:{}", args.ip, args.port);

    let app_state = web::Data::new(AppState {
        config: args,
        snapshot: Mutex::new(FeedSnapshot::empty()),
    });

    log::info!("Server running at http://{}", address);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .service(episodes)
            .service(recommended_keywords)
    })
    .bind(&address)?
    .run()
    .await
}
