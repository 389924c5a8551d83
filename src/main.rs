use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fabric_mockup_api::{
    api,
    config,
    GeminiClient,
    MockupGenerator,
    PromptCatalog,
    PromptConstructor,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    config::Config::dotenv_load();
    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    config.print_env_vars();

    let gemini = match GeminiClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to create Gemini client: {}", e);
            std::process::exit(1);
        }
    };

    // A missing catalog is not fatal; /health reports it as degraded.
    let catalog = PromptCatalog::load_or_empty(&config.prompts_csv);

    let state = Arc::new(api::AppState {
        catalog: Arc::new(catalog),
        generator: MockupGenerator::new(Arc::new(gemini)),
        prompt_constructor: PromptConstructor::try_on(),
        prompts_csv: config.prompts_csv.clone(),
        strict_status: config.strict_status,
    });

    let app = api::create_app(state, config.max_upload_bytes);

    // Run our application with safe parsing
    let ip: std::net::IpAddr = config.api_host.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_HOST '{}', falling back to 127.0.0.1", config.api_host);
        std::net::IpAddr::from([127, 0, 0, 1])
    });
    let port: u16 = config.api_port.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_PORT '{}', falling back to 8000", config.api_port);
        8000
    });
    let socket_address = SocketAddr::new(ip, port);
    tracing::info!("listening on {}", socket_address);
    if let Err(e) = axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
