//! Service entry point: load config, build the app, and serve until ctrl-c.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nextword::app::App;
use nextword::config::Config;
use nextword::llm::ChatClient;
use nextword::predict::Predictor;
use nextword::server::Server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nextword=info")),
        )
        .init();

    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = %config.provider.name,
        model = %config.provider.model,
        key_present = config.provider.api_key.is_some(),
        "starting nextword"
    );
    if config.provider.api_key.is_none() {
        warn!(
            "{} is not set; /predict will return errors until it is",
            config.provider.key_env
        );
    }

    let client = ChatClient::new(&config.provider)?;
    let predictor = Arc::new(Predictor::new(Arc::new(client), config.provider.clone()));
    let app = Arc::new(App::new(predictor));

    let server = Server::bind(config.listen_addr.to_string()).await?;

    tokio::select! {
        result = server.run(move |req| {
            let app = Arc::clone(&app);
            async move { app.handle(req).await }
        }) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    Ok(())
}
