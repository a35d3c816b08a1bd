use std::sync::Arc;

use taxiluxe::config::Config;
use taxiluxe::engine::Engine;
use taxiluxe::server::serve;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let engine = Engine::from_config(&config).await?;

    serve(Arc::new(engine), config.port).await?;

    Ok(())
}
