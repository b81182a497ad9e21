use casedeck::{
    config::Settings, infrastructure::AppContainer, logging::init_tracing,
    presentation::http::HttpServer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    tracing::info!(port = settings.port, "Starting casedeck");

    let container = AppContainer::new(&settings).await?;

    let server = HttpServer::new(
        container.case_study_handler.clone(),
        container.webhook_handler.clone(),
        settings.max_body_bytes,
        settings.port,
    );
    server.run().await
}
